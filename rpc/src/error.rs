//! RPC error types and the error envelope.

use pollgate_orchestrator::{ErrorKind, PollError};
use pollgate_types::ContractAddress;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("unknown action: {0}")]
    UnknownAction(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Poll(#[from] PollError),
}

impl RpcError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownAction(_) | Self::InvalidRequest(_) => ErrorKind::InvalidRequest,
            Self::Poll(e) => e.kind(),
        }
    }
}

impl From<serde_json::Error> for RpcError {
    fn from(e: serde_json::Error) -> Self {
        RpcError::InvalidRequest(e.to_string())
    }
}

impl From<pollgate_types::TypesError> for RpcError {
    fn from(e: pollgate_types::TypesError) -> Self {
        RpcError::InvalidRequest(e.to_string())
    }
}

/// `{error, detail}` body returned for every failed action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub error: ErrorKind,
    pub detail: String,
    /// Set when a contract was deployed but never indexed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<ContractAddress>,
    /// Set when a ledger mutation may have gone through despite the error.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub outcome_unknown: bool,
}

impl From<&RpcError> for ErrorEnvelope {
    fn from(e: &RpcError) -> Self {
        let (contract_address, outcome_unknown) = match e {
            RpcError::Poll(poll) => (poll.orphaned_contract().cloned(), poll.outcome_unknown()),
            _ => (None, false),
        };
        Self {
            error: e.kind(),
            detail: e.to_string(),
            contract_address,
            outcome_unknown,
        }
    }
}
