//! Session Manager
//!
//! Issues and verifies the signed session token carried in the session cookie.
//! Nothing is stored server-side; a session ends when its token expires or the
//! cookie is overwritten.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use platform::clock::Clock;
use platform::token::{self, TokenError, TokenKeys, TokenValidation};

use crate::application::config::LoginConfig;
use crate::domain::entity::claims::{Identity, SESSION_AUDIENCE, SessionClaims};
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{csrf_secret::CsrfSecret, user_name::UserName};
use crate::error::{AuthError, AuthResult};

/// Freshly minted session
#[derive(Debug)]
pub struct IssuedSession {
    pub token: String,
    pub csrf_secret: CsrfSecret,
    pub expires_at: DateTime<Utc>,
}

/// Outcome of checking a session cookie
#[derive(Debug)]
pub enum SessionStatus {
    Authenticated { user: User, csrf_secret: CsrfSecret },
    Unauthenticated,
}

pub struct SessionManager {
    keys: Arc<TokenKeys>,
    clock: Arc<dyn Clock>,
    config: Arc<LoginConfig>,
    validation: TokenValidation,
}

impl SessionManager {
    pub fn new(keys: Arc<TokenKeys>, clock: Arc<dyn Clock>, config: Arc<LoginConfig>) -> Self {
        Self {
            keys,
            clock,
            config,
            validation: TokenValidation::new(SESSION_AUDIENCE).require(&["sub", "exp", "nbf", "aud"]),
        }
    }

    /// Issue a session lasting `login_ttl`
    pub fn issue(&self, user_name: &UserName) -> AuthResult<IssuedSession> {
        self.issue_with_ttl(user_name, self.config.login_ttl)
    }

    pub fn issue_with_ttl(&self, user_name: &UserName, ttl_secs: i64) -> AuthResult<IssuedSession> {
        let now = self.clock.now();
        let exp = now
            .checked_add(ttl_secs)
            .ok_or_else(|| AuthError::Internal(format!("session ttl overflows: {ttl_secs}")))?;
        let csrf_secret = CsrfSecret::generate();

        let claims = SessionClaims {
            sub: user_name.as_str().to_string(),
            exp,
            nbf: now,
            aud: SESSION_AUDIENCE.to_string(),
            csrf_secret: csrf_secret.clone(),
        };
        let token = token::encode(&claims, &self.keys)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let expires_at = DateTime::from_timestamp(exp, 0)
            .ok_or_else(|| AuthError::Internal(format!("session expiry out of range: {exp}")))?;

        tracing::debug!(user_name = %user_name, exp, "Issued session token");

        Ok(IssuedSession {
            token,
            csrf_secret,
            expires_at,
        })
    }

    /// Check the session cookie and load its user.
    ///
    /// Only repository failures are errors; every other problem reads as
    /// [`SessionStatus::Unauthenticated`].
    pub async fn verify<R: UserRepository>(
        &self,
        repo: &R,
        cookie_value: Option<&str>,
    ) -> AuthResult<SessionStatus> {
        let Some(claims) = self.decode(cookie_value) else {
            return Ok(SessionStatus::Unauthenticated);
        };

        let user_name = match UserName::new(claims.sub) {
            Ok(name) => name,
            Err(e) => {
                tracing::debug!(reason = %e, "Session subject is not a valid user name");
                return Ok(SessionStatus::Unauthenticated);
            }
        };

        match repo.find_by_user_name(&user_name).await? {
            Some(user) => Ok(SessionStatus::Authenticated {
                user,
                csrf_secret: claims.csrf_secret,
            }),
            None => {
                tracing::debug!(user_name = %user_name, "Session subject no longer exists");
                Ok(SessionStatus::Unauthenticated)
            }
        }
    }

    /// Who the cookie claims to be, without a repository lookup
    pub fn identity(&self, cookie_value: Option<&str>) -> Identity {
        self.decode(cookie_value)
            .and_then(|claims| {
                let user_name = UserName::new(claims.sub).ok()?;
                Some(Identity::Authenticated {
                    user_name,
                    csrf_secret: claims.csrf_secret,
                })
            })
            .unwrap_or(Identity::Anonymous)
    }

    fn decode(&self, cookie_value: Option<&str>) -> Option<SessionClaims> {
        let token = cookie_value.filter(|v| !v.is_empty())?;
        let now = self.clock.now();

        token::decode::<SessionClaims>(token, &self.keys, &self.validation, now)
            .inspect_err(|e: &TokenError| {
                tracing::debug!(reason = %e, "Session token rejected");
            })
            .ok()
    }
}
