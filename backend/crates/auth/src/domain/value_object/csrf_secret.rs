//! CSRF Secret Value Object
//!
//! 128 random bits minted with each session and echoed in every CSRF token the
//! session requests. Encoded as padded base64url.

use platform::crypto;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Secret length in bytes
pub const CSRF_SECRET_BYTES: usize = 16;

#[derive(Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CsrfSecret(String);

impl CsrfSecret {
    /// Fresh secret from the OS RNG
    pub fn generate() -> Self {
        Self(crypto::to_base64url(&crypto::random_bytes(CSRF_SECRET_BYTES)))
    }

    /// Wrap an encoded value taken from a token
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Compares decoded bytes in constant time; undecodable values never match.
impl PartialEq for CsrfSecret {
    fn eq(&self, other: &Self) -> bool {
        crypto::constant_time_eq_b64url(&self.0, &other.0)
    }
}

impl fmt::Debug for CsrfSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CsrfSecret").field(&"[REDACTED]").finish()
    }
}
