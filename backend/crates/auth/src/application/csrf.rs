//! CSRF Guard
//!
//! Stateless anti-forgery tokens. A token minted for a logged-in caller names
//! the user and echoes the session's CSRF secret, so it only verifies while
//! that same session is presented. Anonymous tokens carry neither and verify
//! for anyone.

use std::sync::Arc;

use platform::clock::Clock;
use platform::token::{self, TokenKeys, TokenValidation};

use crate::domain::entity::claims::{CSRF_AUDIENCE, CSRF_TOKEN_TTL_SECS, CsrfClaims, Identity};
use crate::error::{AuthError, AuthResult};

pub struct CsrfGuard {
    keys: Arc<TokenKeys>,
    clock: Arc<dyn Clock>,
    validation: TokenValidation,
}

impl CsrfGuard {
    pub fn new(keys: Arc<TokenKeys>, clock: Arc<dyn Clock>) -> Self {
        Self {
            keys,
            clock,
            validation: TokenValidation::new(CSRF_AUDIENCE).require(&["exp", "nbf", "aud"]),
        }
    }

    /// Mint a token for a form rendered to `identity`
    pub fn issue(&self, identity: &Identity) -> AuthResult<String> {
        let now = self.clock.now();
        let (sub, csrf_secret) = match identity {
            Identity::Anonymous => (None, None),
            Identity::Authenticated {
                user_name,
                csrf_secret,
            } => (
                Some(user_name.as_str().to_string()),
                Some(csrf_secret.clone()),
            ),
        };

        let claims = CsrfClaims {
            sub,
            exp: now + CSRF_TOKEN_TTL_SECS,
            nbf: now,
            aud: CSRF_AUDIENCE.to_string(),
            csrf_secret,
        };

        token::encode(&claims, &self.keys).map_err(|e| AuthError::Internal(e.to_string()))
    }

    /// Check a submitted token against the caller's current identity
    pub fn verify(&self, token: &str, identity: &Identity) -> AuthResult<()> {
        let now = self.clock.now();
        let claims = token::decode::<CsrfClaims>(token, &self.keys, &self.validation, now)
            .map_err(|e| {
                tracing::debug!(reason = %e, "CSRF token rejected");
                AuthError::CsrfInvalid
            })?;

        match (claims.sub, claims.csrf_secret, identity) {
            (None, None, _) => Ok(()),
            (
                Some(sub),
                Some(secret),
                Identity::Authenticated {
                    user_name,
                    csrf_secret,
                },
            ) => {
                // evaluate both so the secret comparison always runs
                let same_user = sub == user_name.as_str();
                let same_secret = secret == *csrf_secret;
                if same_user & same_secret {
                    Ok(())
                } else {
                    tracing::debug!("CSRF token bound to a different session");
                    Err(AuthError::CsrfInvalid)
                }
            }
            _ => {
                tracing::debug!("CSRF token identity does not match caller");
                Err(AuthError::CsrfInvalid)
            }
        }
    }
}
