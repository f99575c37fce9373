//! Request Extractors
//!
//! [`CurrentUser`] gates routes behind a valid session. Without one the
//! visitor is redirected to the login page and the session cookie is cleared.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};

use crate::application::SessionStatus;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::csrf_secret::CsrfSecret;
use crate::presentation::handlers::{AUTH_REQUIRED, AuthAppState, see_other, with_error};

/// The logged-in user behind this request
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub csrf_secret: CsrfSecret,
}

impl<R> FromRequestParts<AuthAppState<R>> for CurrentUser
where
    R: UserRepository + Send + Sync + 'static,
{
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AuthAppState<R>,
    ) -> Result<Self, Self::Rejection> {
        match state.session_status(&parts.headers).await {
            Ok(SessionStatus::Authenticated { user, csrf_secret }) => {
                Ok(CurrentUser { user, csrf_secret })
            }
            Ok(SessionStatus::Unauthenticated) => Err(see_other(
                &with_error("/login", AUTH_REQUIRED),
                Some(&state.config.clear_session_cookie()),
            )),
            Err(e) => Err(e.into_response()),
        }
    }
}
