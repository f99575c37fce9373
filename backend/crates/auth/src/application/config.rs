//! Application Configuration
//!
//! `[login]` section of the service configuration: token secret, session
//! lifetime and session cookie attributes.

use chrono::{DateTime, Utc};
use platform::cookie::CookieDirective;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Minimum secret length in bytes
pub const MIN_SECRET_LENGTH: usize = 32;

/// Smallest accepted `login_ttl` is one second more than this
pub const MIN_LOGIN_TTL_SECS: i64 = 60;

/// Largest accepted `login_ttl` (10 years)
pub const MAX_LOGIN_TTL_SECS: i64 = 10 * 365 * 24 * 3600;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("login.secret must be at least {min} bytes")]
    SecretTooShort { min: usize },

    #[error("login.login_ttl must be greater than {min} seconds (got {actual})")]
    TtlTooShort { min: i64, actual: i64 },

    #[error("login.login_ttl must be at most {max} seconds (got {actual})")]
    TtlTooLong { max: i64, actual: i64 },

    #[error("login.cookie_name must not be empty")]
    EmptyCookieName,
}

/// Login configuration
#[derive(Debug, Deserialize)]
pub struct LoginConfig {
    /// Signs session and CSRF tokens
    #[serde(deserialize_with = "deserialize_secret")]
    pub secret: SecretString,
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Empty leaves `Domain` off the cookie
    #[serde(default)]
    pub cookie_domain: String,
    /// Empty leaves `Path` off the cookie
    #[serde(default = "default_cookie_path")]
    pub cookie_path: String,
    #[serde(default = "default_true")]
    pub cookie_secure: bool,
    #[serde(default = "default_true")]
    pub cookie_http_only: bool,
    #[serde(default)]
    pub cookie_same_site: SameSite,
    /// Session lifetime in seconds
    #[serde(default = "default_login_ttl")]
    pub login_ttl: i64,
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

fn default_cookie_name() -> String {
    "forums_session".to_string()
}

fn default_cookie_path() -> String {
    "/".to_string()
}

fn default_true() -> bool {
    true
}

fn default_login_ttl() -> i64 {
    7 * 24 * 3600 // 1 week
}

impl LoginConfig {
    /// Config with the given secret and default cookie settings
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: SecretString::from(secret.into()),
            cookie_name: default_cookie_name(),
            cookie_domain: String::new(),
            cookie_path: default_cookie_path(),
            cookie_secure: true,
            cookie_http_only: true,
            cookie_same_site: SameSite::Lax,
            login_ttl: default_login_ttl(),
        }
    }

    /// Create config with a random secret (for development)
    pub fn with_random_secret() -> Self {
        Self::with_secret(platform::crypto::to_base64url(&platform::crypto::random_bytes(
            MIN_SECRET_LENGTH,
        )))
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    /// Startup checks
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.expose_secret().len() < MIN_SECRET_LENGTH {
            return Err(ConfigError::SecretTooShort {
                min: MIN_SECRET_LENGTH,
            });
        }
        if self.login_ttl <= MIN_LOGIN_TTL_SECS {
            return Err(ConfigError::TtlTooShort {
                min: MIN_LOGIN_TTL_SECS,
                actual: self.login_ttl,
            });
        }
        if self.login_ttl > MAX_LOGIN_TTL_SECS {
            return Err(ConfigError::TtlTooLong {
                max: MAX_LOGIN_TTL_SECS,
                actual: self.login_ttl,
            });
        }
        if self.cookie_name.is_empty() {
            return Err(ConfigError::EmptyCookieName);
        }
        Ok(())
    }

    pub(crate) fn secret_bytes(&self) -> &[u8] {
        self.secret.expose_secret().as_bytes()
    }

    /// Session cookie carrying `token` until `expires`
    pub fn session_cookie(&self, token: String, expires: DateTime<Utc>) -> CookieDirective {
        CookieDirective {
            name: self.cookie_name.clone(),
            value: token,
            domain: self.cookie_domain.clone(),
            path: self.cookie_path.clone(),
            secure: self.cookie_secure,
            http_only: self.cookie_http_only,
            same_site: self.cookie_same_site,
            expires,
        }
    }

    /// Overwrites the session cookie with an empty, already expired value
    pub fn clear_session_cookie(&self) -> CookieDirective {
        self.session_cookie(String::new(), DateTime::UNIX_EPOCH)
    }
}
