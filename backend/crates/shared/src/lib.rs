//! Shared Kernel - Domain-crossing minimal core
//!
//! Vocabulary shared by every forum crate:
//! - The unified [`error::app_error::AppError`] and its [`error::kind::ErrorKind`]
//! - The HTTP rendering of those errors (behind the `axum` feature)
//!
//! Only things whose meaning is the same across all domains belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
