//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod csrf;
pub mod login;
pub mod register;
pub mod session;

// Re-exports
pub use config::{ConfigError, LoginConfig};
pub use csrf::CsrfGuard;
pub use login::{LoginInput, LoginOutput, LoginUseCase};
pub use register::{RegisterInput, RegisterOutput, RegisterUseCase};
pub use session::{IssuedSession, SessionManager, SessionStatus};
