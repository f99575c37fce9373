//! PostgreSQL Repository Implementations

use sqlx::PgPool;

use crate::domain::entity::user::{NewUser, User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    display_name::DisplayName, user_flags::UserFlags, user_id::UserId, user_name::UserName,
    user_password::UserPassword,
};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed user repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgUserRepository {
    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                user_id,
                user_name,
                display_name,
                pw_hash,
                flags
            FROM users
            WHERE user_name = $1
            "#,
        )
        .bind(user_name.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE user_name = $1)")
                .bind(user_name.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn create(&self, user: NewUser) -> AuthResult<User> {
        let user_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users (
                user_name,
                display_name,
                pw_hash,
                flags
            ) VALUES ($1, $2, $3, $4)
            RETURNING user_id
            "#,
        )
        .bind(user.user_name.as_str())
        .bind(user.display_name.as_str())
        .bind(user.password.as_phc_string())
        .bind(user.flags.bits())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => AuthError::UserNameTaken,
            other => AuthError::Database(other),
        })?;

        Ok(user.into_user(UserId::new(user_id)))
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: i64,
    user_name: String,
    display_name: String,
    pw_hash: String,
    flags: i32,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let user_name = UserName::new(self.user_name)
            .map_err(|e| AuthError::Internal(format!("Invalid user_name in users table: {}", e)))?;

        // A bad hash only fails that user's logins
        let password = UserPassword::from_db(self.pw_hash);
        if !password.is_well_formed() {
            tracing::warn!(
                user_id = self.user_id,
                user_name = %user_name,
                "Stored password hash is not a PHC string"
            );
        }

        Ok(User {
            user_id: UserId::new(self.user_id),
            user_name,
            display_name: DisplayName::from_db(self.display_name),
            password,
            flags: UserFlags::from_bits(self.flags),
        })
    }
}
