//! User Entity
//!
//! Row of the `users` table as seen by authentication.

use crate::domain::value_object::{
    display_name::DisplayName, user_flags::UserFlags, user_id::UserId, user_name::UserName,
    user_password::UserPassword,
};

/// Registered user
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    /// Unique, used for login and as the session subject
    pub user_name: UserName,
    pub display_name: DisplayName,
    pub password: UserPassword,
    pub flags: UserFlags,
}

impl User {
    #[inline]
    pub fn is_moderator(&self) -> bool {
        self.flags.is_moderator()
    }
}

/// User about to be inserted; the id is assigned by the store
#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_name: UserName,
    pub display_name: DisplayName,
    pub password: UserPassword,
    pub flags: UserFlags,
}

impl NewUser {
    pub fn new(user_name: UserName, display_name: DisplayName, password: UserPassword) -> Self {
        Self {
            user_name,
            display_name,
            password,
            flags: UserFlags::default(),
        }
    }

    pub fn into_user(self, user_id: UserId) -> User {
        User {
            user_id,
            user_name: self.user_name,
            display_name: self.display_name,
            password: self.password,
            flags: self.flags,
        }
    }
}
