//! Credential resolution for actors.

use pollgate_types::{Credential, Usermail};
use serde::{Deserialize, Serialize};

use crate::{Actor, IdentityError};

/// What to do when an actor arrives without a credential of its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityPolicy {
    /// Sign with the operator's default credential.
    OperatorFallback,
    /// Reject with [`IdentityError::MissingCredential`] unless the actor
    /// is the operator.
    RequireOwnCredential,
}

/// Where a resolved credential came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CredentialSource {
    Actor,
    OperatorDefault,
}

/// An actor bound to the credential it will sign with.
#[derive(Clone, Debug)]
pub struct ResolvedIdentity {
    pub usermail: Usermail,
    pub credential: Credential,
    pub source: CredentialSource,
}

/// Resolves actors to signing credentials.
pub struct IdentityResolver {
    operator: Usermail,
    default_credential: Credential,
    policy: IdentityPolicy,
}

impl IdentityResolver {
    pub fn new(operator: Usermail, default_credential: Credential, policy: IdentityPolicy) -> Self {
        Self {
            operator,
            default_credential,
            policy,
        }
    }

    pub fn policy(&self) -> IdentityPolicy {
        self.policy
    }

    /// The operator as an actor, for system-initiated operations such as the
    /// expiry sweep.
    pub fn operator(&self) -> Actor {
        Actor::new(self.operator.clone())
    }

    /// Resolve `actor` to a credential.
    ///
    /// A supplied key must parse; it never silently degrades to the
    /// operator key.
    pub fn resolve(&self, actor: &Actor) -> Result<ResolvedIdentity, IdentityError> {
        if let Some(raw) = actor.private_key() {
            let credential =
                Credential::from_hex(raw).map_err(|e| IdentityError::InvalidCredential {
                    usermail: actor.usermail().clone(),
                    reason: e.to_string(),
                })?;
            return Ok(ResolvedIdentity {
                usermail: actor.usermail().clone(),
                credential,
                source: CredentialSource::Actor,
            });
        }

        let is_operator = actor.usermail() == &self.operator;
        if !is_operator && self.policy == IdentityPolicy::RequireOwnCredential {
            return Err(IdentityError::MissingCredential(actor.usermail().clone()));
        }
        tracing::debug!(actor = %actor.usermail(), "signing with operator default credential");
        Ok(ResolvedIdentity {
            usermail: actor.usermail().clone(),
            credential: self.default_credential.clone(),
            source: CredentialSource::OperatorDefault,
        })
    }
}
