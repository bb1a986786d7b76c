//! Errors raised by the value types and by the poll lifecycle rules.

use thiserror::Error;

/// Parsing / construction failures for the value types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    #[error("usermail must not be empty")]
    EmptyUsermail,

    #[error("invalid contract address: {0}")]
    InvalidContractAddress(String),

    #[error("invalid credential: {0}")]
    InvalidCredential(String),

    #[error("invalid poll id: {0}")]
    InvalidPollId(String),
}

/// A poll lifecycle rule that an operation would break.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollRuleError {
    #[error("poll has already ended")]
    AlreadyEnded,

    #[error("the creator of a poll cannot vote in it")]
    SelfVote,

    #[error("actor has already voted in this poll")]
    DuplicateVote,
}
