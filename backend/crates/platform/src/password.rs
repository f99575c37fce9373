//! Password Hashing and Verification
//!
//! Argon2id password handling:
//! - PHC self-describing hash strings (algorithm, parameters and salt inline)
//! - Zeroization of cleartext on drop
//! - Hashing and verification on tokio's blocking pool
//!
//! Verification never errors: a mismatch, a malformed stored hash or a failed
//! worker all read as "does not match".

use std::fmt;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Constants
// ============================================================================

/// Minimum password length in characters
pub const MIN_PASSWORD_LENGTH: usize = 1;

/// Maximum password length in characters
pub const MAX_PASSWORD_LENGTH: usize = 72;

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("password must not be empty")]
    Empty,

    #[error("password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },
}

/// Password hashing errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("password hashing failed: {0}")]
    HashingFailed(String),

    #[error("invalid password hash format")]
    InvalidHashFormat,

    #[error("password worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// - Does not implement `Clone`
/// - Debug output is redacted
///
/// ## Examples
/// ```rust
/// use platform::password::ClearTextPassword;
///
/// let password = ClearTextPassword::new("correct horse".to_string()).unwrap();
/// assert_eq!(format!("{password:?}"), "ClearTextPassword(\"[REDACTED]\")");
/// ```
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Create a new clear text password with validation
    ///
    /// The length limit (1..=72 code points) applies to the input as typed;
    /// the stored form is NFKC-normalized and may be longer.
    pub fn new(mut raw: String) -> Result<Self, PasswordPolicyError> {
        let char_count = raw.chars().count();
        if char_count < MIN_PASSWORD_LENGTH {
            raw.zeroize();
            return Err(PasswordPolicyError::Empty);
        }
        if char_count > MAX_PASSWORD_LENGTH {
            raw.zeroize();
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        let normalized: String = raw.nfkc().collect();
        raw.zeroize();
        Ok(Self(normalized))
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Hash the password using Argon2id on the calling thread
    ///
    /// Prefer [`hash_password`] from async code.
    pub fn hash(&self) -> Result<HashedPassword, PasswordHashError> {
        // 128-bit random salt
        let salt = SaltString::generate(OsRng);

        let hash = Argon2::default()
            .hash_password(self.as_bytes(), &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(HashedPassword {
            hash: hash.to_string(),
        })
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Hashed password in PHC string format
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Create from PHC string (e.g., from database)
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();
        PasswordHash::new(&hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;
        Ok(Self { hash })
    }

    /// Get the PHC string for storage
    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }

    pub fn into_phc_string(self) -> String {
        self.hash
    }

    /// Verify a password against this hash on the calling thread
    pub fn verify(&self, password: &ClearTextPassword) -> bool {
        verify_phc(password, &self.hash)
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Async API
// ============================================================================

/// Hash a password on the blocking pool
pub async fn hash_password(password: ClearTextPassword) -> Result<HashedPassword, PasswordHashError> {
    tokio::task::spawn_blocking(move || password.hash()).await?
}

/// Verify a password against a stored PHC string on the blocking pool.
///
/// Returns `true` only on a match. A stored hash that cannot be parsed is
/// logged and treated as a mismatch.
pub async fn verify_password(password: ClearTextPassword, phc: String) -> bool {
    match tokio::task::spawn_blocking(move || verify_phc(&password, &phc)).await {
        Ok(matched) => matched,
        Err(e) => {
            tracing::error!(error = %e, "password verification worker failed");
            false
        }
    }
}

fn verify_phc(password: &ClearTextPassword, phc: &str) -> bool {
    let parsed_hash = match PasswordHash::new(phc) {
        Ok(h) => h,
        Err(e) => {
            tracing::warn!(error = %e, "stored password hash is malformed");
            return false;
        }
    };

    // Argon2 compares digests in constant time
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

// ============================================================================
// Tests
// ============================================================================
