//! Display Name Value Object
//!
//! Free-form name shown next to posts. Trimmed, 1 to 64 characters; falls back
//! to the user name when left blank at registration.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::user_name::UserName;

pub const DISPLAY_NAME_MAX_LENGTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayNameError {
    TooLong { length: usize, max: usize },
    ControlCharacter,
}

impl fmt::Display for DisplayNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLong { length, max } => {
                write!(f, "display name is too long ({length} chars, maximum {max})")
            }
            Self::ControlCharacter => write!(f, "display name cannot contain control characters"),
        }
    }
}

impl std::error::Error for DisplayNameError {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate `input`, or derive from `user_name` when blank
    pub fn new_or_default(
        input: Option<&str>,
        user_name: &UserName,
    ) -> Result<Self, DisplayNameError> {
        let trimmed = input.map(str::trim).unwrap_or_default();
        if trimmed.is_empty() {
            return Ok(Self(user_name.as_str().to_string()));
        }

        let length = trimmed.chars().count();
        if length > DISPLAY_NAME_MAX_LENGTH {
            return Err(DisplayNameError::TooLong {
                length,
                max: DISPLAY_NAME_MAX_LENGTH,
            });
        }
        if trimmed.chars().any(char::is_control) {
            return Err(DisplayNameError::ControlCharacter);
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Loaded from the database as-is
    pub fn from_db(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
