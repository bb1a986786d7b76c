use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Which ledger capability a call exercised.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LedgerOp {
    Deploy,
    Connect,
    Statement,
    Candidates,
    Vote,
    Tally,
}

impl LedgerOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deploy => "deploy",
            Self::Connect => "connect",
            Self::Statement => "statement",
            Self::Candidates => "candidates",
            Self::Vote => "vote",
            Self::Tally => "tally",
        }
    }

    /// Whether the call mutates ledger state.
    pub fn is_mutating(&self) -> bool {
        matches!(self, Self::Deploy | Self::Vote)
    }
}

impl fmt::Display for LedgerOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error)]
pub enum LedgerError {
    /// The node or contract rejected the call; no state change happened.
    #[error("{op} reverted: {reason}")]
    Reverted { op: LedgerOp, reason: String },

    /// The call could not be delivered to the ledger node.
    #[error("{op} transport failure: {reason}")]
    Transport { op: LedgerOp, reason: String },

    /// No answer within the deadline. The call may or may not have taken
    /// effect on the ledger.
    #[error("{op} timed out after {after:?}; outcome unknown")]
    Timeout { op: LedgerOp, after: Duration },

    /// The contract answered with something that cannot be used.
    #[error("{op} returned an invalid response: {reason}")]
    InvalidResponse { op: LedgerOp, reason: String },
}

impl LedgerError {
    pub fn op(&self) -> LedgerOp {
        match self {
            Self::Reverted { op, .. }
            | Self::Transport { op, .. }
            | Self::Timeout { op, .. }
            | Self::InvalidResponse { op, .. } => *op,
        }
    }

    /// True when a mutating call may have taken effect despite the error.
    /// Such calls must be reconciled against ledger state, never retried.
    pub fn outcome_unknown(&self) -> bool {
        matches!(self, Self::Timeout { op, .. } if op.is_mutating())
    }
}
