//! Token Claims
//!
//! Claim sets carried by the two signed token kinds, and the caller
//! [`Identity`] derived from the session cookie.
//!
//! Both kinds are signed with the same secret; the audience claim is what
//! keeps one from being accepted as the other.

use serde::{Deserialize, Serialize};

use crate::domain::value_object::{csrf_secret::CsrfSecret, user_name::UserName};

/// Audience of session tokens
pub const SESSION_AUDIENCE: &str = "forums.auth.session";

/// Audience of CSRF tokens
pub const CSRF_AUDIENCE: &str = "forums.auth.csrf_token";

/// CSRF token lifetime in seconds
pub const CSRF_TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

/// Claims of the session cookie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub exp: i64,
    pub nbf: i64,
    pub aud: String,
    pub csrf_secret: CsrfSecret,
}

/// Claims of a CSRF token
///
/// `sub` and `csrf_secret` are both present (authenticated issuer) or both
/// absent (anonymous issuer). Absent fields are left out of the token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsrfClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    pub exp: i64,
    pub nbf: i64,
    pub aud: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csrf_secret: Option<CsrfSecret>,
}

/// Who is making the request, as far as the session cookie says
#[derive(Debug, Clone, PartialEq)]
pub enum Identity {
    Anonymous,
    Authenticated {
        user_name: UserName,
        csrf_secret: CsrfSecret,
    },
}

impl Identity {
    pub fn user_name(&self) -> Option<&UserName> {
        match self {
            Identity::Anonymous => None,
            Identity::Authenticated { user_name, .. } => Some(user_name),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Identity::Authenticated { .. })
    }
}
