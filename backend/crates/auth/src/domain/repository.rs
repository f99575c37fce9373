//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use crate::domain::entity::user::{NewUser, User};
use crate::domain::value_object::user_name::UserName;
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Find user by user name (exact, case-sensitive)
    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>>;

    /// Check if user name exists
    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool>;

    /// Insert a user; fails with `UserNameTaken` on a duplicate name
    async fn create(&self, user: NewUser) -> AuthResult<User>;
}
