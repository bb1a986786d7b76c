use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// `put_poll` was called for an id the index has never assigned.
    #[error("poll {0} not found")]
    NotFound(String),

    #[error("duplicate poll id: {0}")]
    Duplicate(String),

    /// An update tried to rewrite a write-once field.
    #[error("poll {poll_id}: field `{field}` is immutable")]
    ImmutableField { poll_id: String, field: &'static str },

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("index is corrupted: {0}")]
    Corruption(String),
}
