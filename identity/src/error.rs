use pollgate_types::Usermail;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum IdentityError {
    #[error("actor {usermail} supplied an unusable credential: {reason}")]
    InvalidCredential { usermail: Usermail, reason: String },

    #[error("actor {0} has no credential and operator fallback is disabled")]
    MissingCredential(Usermail),

    #[error("role lookup failed: {0}")]
    RoleLookup(String),
}
