//! Signing credential used to build a ledger connection.

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::TypesError;

/// A 32-byte secp256k1 secret key.
///
/// This type intentionally does not implement `Serialize`, and its `Debug`
/// output is redacted. Key bytes are zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Credential([u8; 32]);

impl Credential {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse a hex-encoded key, with or without a `0x` prefix.
    pub fn from_hex(raw: &str) -> Result<Self, TypesError> {
        let digits = raw.trim();
        let digits = digits.strip_prefix("0x").unwrap_or(digits);
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| TypesError::InvalidCredential(e.to_string()))?;
        if bytes.iter().all(|b| *b == 0) {
            bytes.zeroize();
            return Err(TypesError::InvalidCredential("key is all zeroes".into()));
        }
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

impl PartialEq for Credential {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Credential {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_prefixed_and_bare_hex() {
        let bare = "11".repeat(32);
        let a = Credential::from_hex(&bare).unwrap();
        let b = Credential::from_hex(&format!("0x{bare}")).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_bytes(), &[0x11; 32]);
    }

    #[test]
    fn rejects_wrong_length_and_zero_key() {
        assert!(Credential::from_hex("abcd").is_err());
        assert!(Credential::from_hex(&"00".repeat(32)).is_err());
        assert!(Credential::from_hex(&"zz".repeat(32)).is_err());
    }

    #[test]
    fn debug_output_is_redacted() {
        let key = Credential::from_bytes([7; 32]);
        assert_eq!(format!("{key:?}"), "Credential(<redacted>)");
    }
}
