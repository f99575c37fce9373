//! API DTOs (Data Transfer Objects)
//!
//! Form bodies deserialize every field with a default so that a missing
//! `csrf_token` reaches CSRF verification instead of failing extraction.

use serde::{Deserialize, Serialize};

use crate::domain::entity::user::User;

// ============================================================================
// Forms
// ============================================================================

/// POST /auth/login
#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub csrf_token: String,
}

/// POST /auth/register
#[derive(Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub csrf_token: String,
}

/// POST /auth/logout
#[derive(Debug, Deserialize)]
pub struct LogoutForm {
    #[serde(default)]
    pub csrf_token: String,
}

/// `?error=` on the login and register pages
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub error: Option<String>,
}

// ============================================================================
// Responses
// ============================================================================

/// GET /auth/csrf
#[derive(Debug, Clone, Serialize)]
pub struct CsrfTokenResponse {
    pub csrf_token: String,
}

/// GET /login, GET /register
#[derive(Debug, Clone, Serialize)]
pub struct FormPageResponse {
    pub csrf_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// GET /auth/whoami
#[derive(Debug, Clone, Serialize)]
pub struct WhoAmIResponse {
    pub user_id: i64,
    pub username: String,
    pub display_name: String,
    pub is_moderator: bool,
}

impl From<&User> for WhoAmIResponse {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.user_id.get(),
            username: user.user_name.as_str().to_string(),
            display_name: user.display_name.as_str().to_string(),
            is_moderator: user.is_moderator(),
        }
    }
}
