//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown user or wrong password; the two are never distinguished
    #[error("invalid username and/or password")]
    InvalidCredentials,

    #[error("user name already exists")]
    UserNameTaken,

    /// Form input failed validation
    #[error("{0}")]
    Validation(String),

    #[error("CSRF token validation failed")]
    CsrfInvalid,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidCredentials => ErrorKind::Unauthorized,
            AuthError::UserNameTaken => ErrorKind::Conflict,
            AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::CsrfInvalid => ErrorKind::Forbidden,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    ///
    /// Server-side failures get a generic message; details stay in the logs.
    pub fn to_app_error(&self) -> AppError {
        let kind = self.kind();
        if kind.is_server_error() {
            return AppError::internal("internal server error");
        }
        match self {
            AuthError::CsrfInvalid => AppError::forbidden(self.to_string())
                .with_action("Reload the page and submit the form again"),
            _ => AppError::new(kind, self.to_string()),
        }
    }

    /// Log the error with appropriate level
    pub(crate) fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::info!("Invalid login attempt");
            }
            AuthError::CsrfInvalid => {
                tracing::warn!("Rejected request with invalid CSRF token");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
