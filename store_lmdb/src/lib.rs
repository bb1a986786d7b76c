//! LMDB storage backend for the poll index.
//!
//! Implements [`pollgate_store::PollStore`] using the `heed` LMDB bindings.
//! Poll records are bincode-encoded under their big-endian id; the id
//! sequence lives in a separate meta database and is advanced in the same
//! write transaction that inserts the record.

pub mod environment;
pub mod error;
pub mod poll;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use poll::LmdbPollStore;
