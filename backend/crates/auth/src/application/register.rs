//! Register Use Case
//!
//! Creates a new user account and logs it in.

use std::sync::Arc;

use crate::application::session::{IssuedSession, SessionManager};
use crate::domain::entity::user::{NewUser, User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    display_name::DisplayName,
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Register input
pub struct RegisterInput {
    pub user_name: String,
    /// Blank falls back to the user name
    pub display_name: Option<String>,
    pub password: String,
}

/// Register output
#[derive(Debug)]
pub struct RegisterOutput {
    pub user: User,
    pub session: IssuedSession,
}

/// Register use case
pub struct RegisterUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    sessions: Arc<SessionManager>,
}

impl<U> RegisterUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, sessions: Arc<SessionManager>) -> Self {
        Self {
            user_repo,
            sessions,
        }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        let user_name =
            UserName::new(input.user_name).map_err(|e| AuthError::Validation(e.to_string()))?;
        let display_name = DisplayName::new_or_default(input.display_name.as_deref(), &user_name)
            .map_err(|e| AuthError::Validation(e.to_string()))?;
        let raw_password = RawPassword::new(input.password)?;

        if self.user_repo.exists_by_user_name(&user_name).await? {
            return Err(AuthError::UserNameTaken);
        }

        let password = UserPassword::hash(raw_password).await?;

        // The store still enforces uniqueness if a concurrent registration won
        let user = self
            .user_repo
            .create(NewUser::new(user_name, display_name, password))
            .await?;

        let session = self.sessions.issue(&user.user_name)?;

        tracing::info!(
            user_id = %user.user_id,
            user_name = %user.user_name,
            "User registered"
        );

        Ok(RegisterOutput { user, session })
    }
}
