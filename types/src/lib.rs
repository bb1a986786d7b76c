//! Fundamental types for pollgate.
//!
//! This crate defines the value types shared across every other crate in the
//! workspace: poll identifiers, actor identities, ledger contract handles,
//! signing credentials, timestamps and the `Poll` record itself.

pub mod address;
pub mod error;
pub mod keys;
pub mod poll;
pub mod state;
pub mod time;

pub use address::{CandidateId, ContractAddress, RoleId, Usermail};
pub use error::{PollRuleError, TypesError};
pub use keys::Credential;
pub use poll::{NewPoll, Poll, PollId};
pub use state::{PollState, PollStateKind};
pub use time::{Clock, SystemClock, Timestamp};
