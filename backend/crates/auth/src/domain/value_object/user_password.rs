//! User Password Value Object
//!
//! Domain wrappers over `platform::password`:
//! - [`RawPassword`]: validated user input, zeroized on drop
//! - [`UserPassword`]: Argon2id PHC string as stored in `users.pw_hash`
//!
//! Hashing and verification are async and run on the blocking pool.

use platform::password::{self, ClearTextPassword, HashedPassword, PasswordPolicyError};
use std::fmt;

use crate::error::{AuthError, AuthResult};

// ============================================================================
// Raw Password (User Input)
// ============================================================================

/// Raw password from user input
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// NFKC-normalized, 1 to 72 characters
    pub fn new(raw: String) -> AuthResult<Self> {
        let clear_text = ClearTextPassword::new(raw).map_err(|e| match e {
            PasswordPolicyError::Empty => AuthError::Validation("password is required".into()),
            PasswordPolicyError::TooLong { max, .. } => {
                AuthError::Validation(format!("password must be at most {max} characters"))
            }
        })?;

        Ok(Self(clear_text))
    }

    fn into_inner(self) -> ClearTextPassword {
        self.0
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// User Password (Hashed, for storage)
// ============================================================================

/// Stored password hash
///
/// Kept as the raw column value. A malformed hash is not rejected on load;
/// it simply never verifies.
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(String);

impl UserPassword {
    /// Hash a raw password for storage
    pub async fn hash(raw: RawPassword) -> AuthResult<Self> {
        let hashed = password::hash_password(raw.into_inner())
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        Ok(Self(hashed.into_phc_string()))
    }

    /// Wrap a PHC string loaded from the database
    pub fn from_db(phc_string: impl Into<String>) -> Self {
        Self(phc_string.into())
    }

    pub fn as_phc_string(&self) -> &str {
        &self.0
    }

    /// Whether the stored string parses as a PHC hash
    pub fn is_well_formed(&self) -> bool {
        HashedPassword::from_phc_string(self.0.as_str()).is_ok()
    }

    /// `true` iff `raw` matches this hash
    pub async fn verify(&self, raw: RawPassword) -> bool {
        password::verify_password(raw.into_inner(), self.0.clone()).await
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}
