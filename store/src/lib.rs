//! Abstract storage traits for the off-chain poll index.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The rest of the codebase depends only on the traits.
//!
//! Writes are single-record and last-writer-wins: there is no multi-record
//! transaction and no optimistic concurrency token. Callers that need
//! read-check-act atomicity on one poll must serialize access themselves.

pub mod error;
pub mod poll;

pub use error::StoreError;
pub use poll::{check_immutable_fields, PollFilter, PollStore};
