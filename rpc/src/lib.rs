//! JSON request/response surface for the poll orchestrator.
//!
//! Provides actions for:
//! - Poll creation, voting and closing
//! - The expiry sweep
//! - Poll details, open polls per actor, closed polls
//! - Per-candidate vote counts and role lookup
//!
//! Every action yields either its success payload or an
//! `{"error": <kind>, "detail": <message>}` envelope. Transport is left to
//! the embedding service.

pub mod dispatcher;
pub mod error;
pub mod handlers;

pub use dispatcher::{RpcAction, RpcHandler};
pub use error::{ErrorEnvelope, RpcError};
