//! Nullable infrastructure for deterministic testing.
//!
//! All external collaborators of the orchestrator (clock, ledger, poll
//! index, role lookup) are abstracted behind traits. This crate provides
//! test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically, including injected failures
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod ledger;
pub mod roles;
pub mod store;

pub use clock::NullClock;
pub use ledger::{ContractSnapshot, NullLedger};
pub use roles::NullRoleLookup;
pub use store::NullPollStore;
