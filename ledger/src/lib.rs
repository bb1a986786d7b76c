//! Voting-contract client abstraction.
//!
//! The ledger is an external, append-only system of record. Every call here
//! is a remote call that may block for confirmation and may fail
//! independently of local state. `vote` and `deploy` are not idempotent:
//! a failed or timed-out call may already have taken effect, so callers
//! must never retry them blindly.

pub mod client;
pub mod deadline;
pub mod error;
pub mod tally;

pub use client::{LedgerClient, LedgerConnector};
pub use deadline::with_deadline;
pub use error::{LedgerError, LedgerOp};
pub use tally::{select_winner, Tally, Winner};
