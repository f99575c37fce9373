//! Signed Token Codec
//!
//! Compact JWS (HS256) encoding and decoding of claim sets.
//!
//! Decoding checks, in order:
//! 1. signature (HS256 only, any other `alg` is rejected)
//! 2. audience against the accepted set; `aud` is always required
//! 3. presence of every other required claim
//! 4. `nbf <= now <= exp` against the caller's `now`
//!
//! Time checks use the `now` handed in rather than the system clock, so a
//! single verification never observes two different instants.

use std::collections::HashSet;
use std::fmt;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use thiserror::Error;

/// Token decoding/encoding errors
///
/// Internal detail for logs. Callers collapse these into a single outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature is invalid")]
    BadSignature,

    #[error("token audience is not accepted")]
    Audience,

    #[error("token is missing required claim `{0}`")]
    MissingClaim(String),

    #[error("token has expired")]
    Expired,

    #[error("token is not yet valid")]
    Immature,

    #[error("token signing failed: {0}")]
    Signing(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::BadSignature,
            ErrorKind::InvalidAudience => TokenError::Audience,
            ErrorKind::MissingRequiredClaim(claim) => TokenError::MissingClaim(claim.clone()),
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::ImmatureSignature => TokenError::Immature,
            _ => TokenError::Malformed,
        }
    }
}

// ============================================================================
// Keys
// ============================================================================

/// Signing and verification keys derived from the configured secret
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

impl fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenKeys").finish_non_exhaustive()
    }
}

// ============================================================================
// Validation
// ============================================================================

/// Acceptance rules for [`decode`]
///
/// Always carries exactly one audience.
#[derive(Debug, Clone)]
pub struct TokenValidation {
    audience: String,
    required: Vec<String>,
}

impl TokenValidation {
    pub fn new(audience: impl Into<String>) -> Self {
        Self {
            audience: audience.into(),
            required: Vec::new(),
        }
    }

    /// Claims that must be present in the token
    pub fn require(mut self, claims: &[&str]) -> Self {
        self.required.extend(claims.iter().map(|c| c.to_string()));
        self
    }

    fn to_jwt_validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims = HashSet::from(["aud".to_string()]);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation.set_audience(&[self.audience.as_str()]);
        validation
    }
}

// ============================================================================
// Codec
// ============================================================================

/// Sign a claim set
pub fn encode<C: Serialize>(claims: &C, keys: &TokenKeys) -> Result<String, TokenError> {
    jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &keys.encoding)
        .map_err(|e| TokenError::Signing(e.to_string()))
}

/// Verify and decode a token at instant `now` (Unix seconds)
pub fn decode<C: DeserializeOwned>(
    token: &str,
    keys: &TokenKeys,
    validation: &TokenValidation,
    now: i64,
) -> Result<C, TokenError> {
    // Signature first, then audience
    let data = jsonwebtoken::decode::<Map<String, Value>>(
        token,
        &keys.decoding,
        &validation.to_jwt_validation(),
    )?;
    let claims = data.claims;

    if claims.get("aud").is_none_or(Value::is_null) {
        return Err(TokenError::MissingClaim("aud".to_string()));
    }
    for name in &validation.required {
        if claims.get(name).is_none_or(Value::is_null) {
            return Err(TokenError::MissingClaim(name.clone()));
        }
    }

    if let Some(exp) = numeric_claim(&claims, "exp")? {
        if now > exp {
            return Err(TokenError::Expired);
        }
    }
    if let Some(nbf) = numeric_claim(&claims, "nbf")? {
        if nbf > now {
            return Err(TokenError::Immature);
        }
    }

    serde_json::from_value(Value::Object(claims)).map_err(|_| TokenError::Malformed)
}

fn numeric_claim(claims: &Map<String, Value>, name: &str) -> Result<Option<i64>, TokenError> {
    match claims.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_i64()
            .or_else(|| v.as_f64().map(|f| f as i64))
            .map(Some)
            .ok_or(TokenError::Malformed),
    }
}
