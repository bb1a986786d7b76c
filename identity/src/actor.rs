//! Actor descriptors.

use pollgate_types::Usermail;
use std::fmt;
use zeroize::Zeroizing;

/// An identity performing an operation: a mail address plus, optionally,
/// the raw private key the actor wants to sign with.
///
/// The key is kept as supplied and only parsed during resolution, so a
/// malformed key surfaces as an identity error on the operation that uses
/// it. It is wiped from memory on drop.
#[derive(Clone)]
pub struct Actor {
    usermail: Usermail,
    private_key: Option<Zeroizing<String>>,
}

impl Actor {
    /// An actor without its own credential.
    pub fn new(usermail: Usermail) -> Self {
        Self {
            usermail,
            private_key: None,
        }
    }

    /// Attach the actor's own signing key (hex).
    pub fn with_private_key(mut self, key: impl Into<String>) -> Self {
        self.private_key = Some(Zeroizing::new(key.into()));
        self
    }

    pub fn usermail(&self) -> &Usermail {
        &self.usermail
    }

    pub fn private_key(&self) -> Option<&str> {
        self.private_key.as_deref().map(String::as_str)
    }

    pub fn has_credential(&self) -> bool {
        self.private_key.is_some()
    }
}

impl fmt::Debug for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Actor")
            .field("usermail", &self.usermail)
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
