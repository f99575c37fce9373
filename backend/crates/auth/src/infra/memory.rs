//! In-Memory Repository
//!
//! Process-local user store for development runs without a database, and for
//! tests. Contents are lost on restart.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::entity::user::{NewUser, User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{user_id::UserId, user_name::UserName};
use crate::error::{AuthError, AuthResult};

#[derive(Default)]
struct Store {
    next_id: i64,
    users: HashMap<String, User>,
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    store: RwLock<Store>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.store.read().map(|s| s.users.len()).unwrap_or(0)
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn poisoned() -> AuthError {
        AuthError::Internal("user store lock poisoned".to_string())
    }
}

impl UserRepository for InMemoryUserRepository {
    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>> {
        let store = self.store.read().map_err(|_| Self::poisoned())?;
        Ok(store.users.get(user_name.as_str()).cloned())
    }

    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool> {
        let store = self.store.read().map_err(|_| Self::poisoned())?;
        Ok(store.users.contains_key(user_name.as_str()))
    }

    async fn create(&self, user: NewUser) -> AuthResult<User> {
        let mut store = self.store.write().map_err(|_| Self::poisoned())?;
        if store.users.contains_key(user.user_name.as_str()) {
            return Err(AuthError::UserNameTaken);
        }

        store.next_id += 1;
        let user = user.into_user(UserId::new(store.next_id));
        store
            .users
            .insert(user.user_name.as_str().to_string(), user.clone());

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{
        display_name::DisplayName, user_password::UserPassword,
    };

    fn new_user(name: &str) -> NewUser {
        let user_name = UserName::new(name).unwrap();
        let display_name = DisplayName::new_or_default(None, &user_name).unwrap();
        NewUser::new(user_name, display_name, UserPassword::from_db("$argon2id$stub"))
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = InMemoryUserRepository::new();
        assert!(repo.is_empty());

        let alice = repo.create(new_user("alice")).await.unwrap();
        let bob = repo.create(new_user("bob")).await.unwrap();
        assert_eq!(alice.user_id, UserId::new(1));
        assert_eq!(bob.user_id, UserId::new(2));
        assert_eq!(repo.len(), 2);

        let found = repo
            .find_by_user_name(&UserName::new("alice").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.user_id, alice.user_id);
        assert_eq!(found.display_name.as_str(), "alice");
    }

    #[tokio::test]
    async fn test_duplicate_name_is_rejected() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("alice")).await.unwrap();

        let result = repo.create(new_user("alice")).await;
        assert!(matches!(result, Err(AuthError::UserNameTaken)));
        assert!(
            repo.exists_by_user_name(&UserName::new("alice").unwrap())
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_lookup_is_case_sensitive() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("alice")).await.unwrap();

        let found = repo
            .find_by_user_name(&UserName::new("Alice").unwrap())
            .await
            .unwrap();
        assert!(found.is_none());
    }
}
