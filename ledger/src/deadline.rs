//! Deadline wrapper for ledger calls.

use std::future::Future;
use std::time::Duration;

use crate::{LedgerError, LedgerOp};

/// Run a ledger call with a deadline.
///
/// On expiry the in-flight future is dropped and [`LedgerError::Timeout`]
/// is returned. For mutating calls that means the outcome is unknown; the
/// caller must not resubmit without first checking ledger state.
pub async fn with_deadline<T, F>(op: LedgerOp, after: Duration, call: F) -> Result<T, LedgerError>
where
    F: Future<Output = Result<T, LedgerError>>,
{
    match tokio::time::timeout(after, call).await {
        Ok(result) => result,
        Err(_) => {
            if op.is_mutating() {
                tracing::error!(%op, ?after, "ledger call timed out, outcome unknown");
            } else {
                tracing::warn!(%op, ?after, "ledger read timed out");
            }
            Err(LedgerError::Timeout { op, after })
        }
    }
}
