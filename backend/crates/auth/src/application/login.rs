//! Login Use Case
//!
//! Checks a user name and password and issues a session.

use std::sync::Arc;

use crate::application::session::{IssuedSession, SessionManager};
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{user_name::UserName, user_password::RawPassword};
use crate::error::{AuthError, AuthResult};

/// Login input
pub struct LoginInput {
    pub user_name: String,
    pub password: String,
}

/// Login output
#[derive(Debug)]
pub struct LoginOutput {
    pub user: User,
    pub session: IssuedSession,
}

/// Login use case
pub struct LoginUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    sessions: Arc<SessionManager>,
}

impl<U> LoginUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, sessions: Arc<SessionManager>) -> Self {
        Self {
            user_repo,
            sessions,
        }
    }

    /// Every rejection is [`AuthError::InvalidCredentials`]; malformed input,
    /// unknown users and wrong passwords look the same to the caller.
    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        let user_name =
            UserName::new(input.user_name).map_err(|_| AuthError::InvalidCredentials)?;
        let raw_password =
            RawPassword::new(input.password).map_err(|_| AuthError::InvalidCredentials)?;

        let user = self
            .user_repo
            .find_by_user_name(&user_name)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.password.verify(raw_password).await {
            return Err(AuthError::InvalidCredentials);
        }

        let session = self.sessions.issue(&user.user_name)?;

        tracing::info!(
            user_id = %user.user_id,
            user_name = %user.user_name,
            "User logged in"
        );

        Ok(LoginOutput { user, session })
    }
}
