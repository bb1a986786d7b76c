use pollgate_identity::IdentityError;
use pollgate_ledger::LedgerError;
use pollgate_store::StoreError;
use pollgate_types::{ContractAddress, PollId, PollRuleError, Usermail};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Stable, machine-readable error classes. Callers branch on these, never
/// on message text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    NotFoundError,
    AlreadyEndedError,
    SelfVoteError,
    DuplicateVoteError,
    IdentityError,
    LedgerError,
    StoreError,
    InvalidRequest,
    SweepInProgress,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFoundError => "NotFoundError",
            Self::AlreadyEndedError => "AlreadyEndedError",
            Self::SelfVoteError => "SelfVoteError",
            Self::DuplicateVoteError => "DuplicateVoteError",
            Self::IdentityError => "IdentityError",
            Self::LedgerError => "LedgerError",
            Self::StoreError => "StoreError",
            Self::InvalidRequest => "InvalidRequest",
            Self::SweepInProgress => "SweepInProgress",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum PollError {
    #[error("poll {0} not found")]
    NotFound(PollId),

    #[error("poll {0} has already ended")]
    AlreadyEnded(PollId),

    #[error("{actor} created poll {poll_id} and cannot vote in it")]
    SelfVote { poll_id: PollId, actor: Usermail },

    #[error("{actor} has already voted in poll {poll_id}")]
    DuplicateVote { poll_id: PollId, actor: Usermail },

    #[error("identity error: {0}")]
    Identity(#[from] IdentityError),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The contract was deployed but no index record points at it.
    #[error("contract {contract_address} was deployed but could not be indexed: {source}")]
    OrphanedContract {
        contract_address: ContractAddress,
        #[source]
        source: StoreError,
    },

    /// The ledger accepted the vote but the voter list was not updated.
    #[error("vote by {voter} on poll {poll_id} is on the ledger but was not recorded: {source}")]
    VoteNotRecorded {
        poll_id: PollId,
        voter: Usermail,
        #[source]
        source: StoreError,
    },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("an expiry sweep is already running")]
    SweepInProgress,
}

impl PollError {
    pub(crate) fn from_rule(poll_id: PollId, actor: &Usermail, rule: PollRuleError) -> Self {
        match rule {
            PollRuleError::AlreadyEnded => Self::AlreadyEnded(poll_id),
            PollRuleError::SelfVote => Self::SelfVote {
                poll_id,
                actor: actor.clone(),
            },
            PollRuleError::DuplicateVote => Self::DuplicateVote {
                poll_id,
                actor: actor.clone(),
            },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFoundError,
            Self::AlreadyEnded(_) => ErrorKind::AlreadyEndedError,
            Self::SelfVote { .. } => ErrorKind::SelfVoteError,
            Self::DuplicateVote { .. } => ErrorKind::DuplicateVoteError,
            Self::Identity(_) => ErrorKind::IdentityError,
            Self::Ledger(_) => ErrorKind::LedgerError,
            Self::Store(_) | Self::OrphanedContract { .. } | Self::VoteNotRecorded { .. } => {
                ErrorKind::StoreError
            }
            Self::InvalidRequest(_) => ErrorKind::InvalidRequest,
            Self::SweepInProgress => ErrorKind::SweepInProgress,
        }
    }

    /// The deployed-but-unindexed contract, if this is an orphaned create.
    pub fn orphaned_contract(&self) -> Option<&ContractAddress> {
        match self {
            Self::OrphanedContract {
                contract_address, ..
            } => Some(contract_address),
            _ => None,
        }
    }

    /// True when a ledger mutation may have happened despite the error.
    pub fn outcome_unknown(&self) -> bool {
        matches!(self, Self::Ledger(e) if e.outcome_unknown())
    }
}

/// Failures while wiring the orchestrator up (config, index, logging).
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("config error: {0}")]
    Config(String),

    #[error("poll index error: {0}")]
    Index(#[from] pollgate_store_lmdb::LmdbError),

    #[error("logging error: {0}")]
    Logging(String),
}
