//! Actor identity resolution.
//!
//! Turns an actor descriptor into the signing credential used to build a
//! ledger client. The operator's default credential is injected at
//! construction; nothing here reads process state, and credentials are
//! never persisted.

pub mod actor;
pub mod error;
pub mod resolver;
pub mod role;

pub use actor::Actor;
pub use error::IdentityError;
pub use resolver::{CredentialSource, IdentityPolicy, IdentityResolver, ResolvedIdentity};
pub use role::RoleLookup;
