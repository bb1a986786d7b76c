//! Nullable role lookup.

use async_trait::async_trait;
use pollgate_identity::{IdentityError, RoleLookup};
use pollgate_types::{RoleId, Usermail};
use std::collections::HashMap;
use std::sync::Mutex;

/// An in-memory role table.
#[derive(Default)]
pub struct NullRoleLookup {
    roles: Mutex<HashMap<Usermail, RoleId>>,
    unavailable: Mutex<bool>,
}

impl NullRoleLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_role(self, usermail: &Usermail, role: RoleId) -> Self {
        self.roles.lock().unwrap().insert(usermail.clone(), role);
        self
    }

    /// Make every lookup fail until called again with `false`.
    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.lock().unwrap() = unavailable;
    }
}

#[async_trait]
impl RoleLookup for NullRoleLookup {
    async fn role_of(&self, usermail: &Usermail) -> Result<Option<RoleId>, IdentityError> {
        if *self.unavailable.lock().unwrap() {
            return Err(IdentityError::RoleLookup("role service unavailable".into()));
        }
        Ok(self.roles.lock().unwrap().get(usermail).copied())
    }
}
