//! Permission role lookup, owned by the external identity subsystem.

use async_trait::async_trait;
use pollgate_types::{RoleId, Usermail};

use crate::IdentityError;

/// Maps an actor to its permission role.
#[async_trait]
pub trait RoleLookup: Send + Sync {
    /// `Ok(None)` when the actor is unknown to the identity subsystem.
    async fn role_of(&self, usermail: &Usermail) -> Result<Option<RoleId>, IdentityError>;
}
