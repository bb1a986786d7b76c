//! Poll lifecycle state.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::CandidateId;

/// The lifecycle state of a poll.
///
/// `Polling → Ended` is the only transition. The winning candidate lives
/// inside `Ended`, so a result exists exactly when the poll has ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PollState {
    /// Open for votes.
    Polling,
    /// Closed; the result was announced.
    Ended { result: CandidateId },
}

impl PollState {
    pub fn kind(&self) -> PollStateKind {
        match self {
            Self::Polling => PollStateKind::Polling,
            Self::Ended { .. } => PollStateKind::Ended,
        }
    }

    pub fn is_polling(&self) -> bool {
        matches!(self, Self::Polling)
    }

    pub fn result(&self) -> Option<&CandidateId> {
        match self {
            Self::Polling => None,
            Self::Ended { result } => Some(result),
        }
    }
}

/// State discriminant, used by store filters and read models.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PollStateKind {
    Polling,
    Ended,
}

impl PollStateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Polling => "Polling",
            Self::Ended => "Ended",
        }
    }
}

impl fmt::Display for PollStateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
