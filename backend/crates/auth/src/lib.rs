//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Users, token claims, repository traits
//! - `application/` - Session manager, CSRF guard, login/register use cases
//! - `infra/` - PostgreSQL and in-memory user stores
//! - `presentation/` - HTTP handlers, DTOs, extractor, router
//!
//! ## Security Model
//! - Sessions are stateless HS256 tokens in a cookie; nothing is stored server-side
//! - Every session carries a random CSRF secret; CSRF tokens issued to a
//!   logged-in user echo that secret and name the user
//! - Session and CSRF tokens share one signing secret and are kept apart by
//!   their audience claim
//! - Passwords hashed with Argon2id off the async runtime

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::{ConfigError, LoginConfig};
pub use error::{AuthError, AuthResult};
pub use infra::{InMemoryUserRepository, PgUserRepository};
pub use presentation::{AuthAppState, CurrentUser, auth_router, auth_routes};

// Re-export kernel error types for unified error handling
pub use kernel::error::{app_error::AppError, kind::ErrorKind};
