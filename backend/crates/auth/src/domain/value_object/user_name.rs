//! User Name Value Object
//!
//! The login handle and session subject. Case is preserved and significant.
//!
//! ## Invariants
//! - Length: 1 to 64 characters
//! - Characters: ASCII letters, digits and `_` only

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Constants
// ============================================================================

/// Minimum length for user name (in characters)
pub const USER_NAME_MIN_LENGTH: usize = 1;

/// Maximum length for user name (in characters)
pub const USER_NAME_MAX_LENGTH: usize = 64;

// ============================================================================
// Error Types
// ============================================================================

/// Error returned when user name validation fails
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserNameError {
    Empty,

    TooLong { length: usize, max: usize },

    InvalidCharacter { char: char, position: usize },
}

impl fmt::Display for UserNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "user name cannot be empty"),
            Self::TooLong { length, max } => {
                write!(f, "user name is too long ({length} chars, maximum {max})")
            }
            Self::InvalidCharacter { char, position } => {
                write!(
                    f,
                    "invalid character '{char}' at position {position}. Only A-Z, a-z, 0-9 and _ are allowed"
                )
            }
        }
    }
}

impl std::error::Error for UserNameError {}

// ============================================================================
// UserName Value Object
// ============================================================================

/// Validated user name
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    pub fn new(input: impl Into<String>) -> Result<Self, UserNameError> {
        let input = input.into();
        Self::validate(&input)?;
        Ok(Self(input))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }

    fn validate(input: &str) -> Result<(), UserNameError> {
        let length = input.chars().count();
        if length < USER_NAME_MIN_LENGTH {
            return Err(UserNameError::Empty);
        }
        if length > USER_NAME_MAX_LENGTH {
            return Err(UserNameError::TooLong {
                length,
                max: USER_NAME_MAX_LENGTH,
            });
        }

        for (pos, ch) in input.chars().enumerate() {
            if !Self::is_valid_char(ch) {
                return Err(UserNameError::InvalidCharacter {
                    char: ch,
                    position: pos,
                });
            }
        }

        Ok(())
    }

    #[inline]
    fn is_valid_char(c: char) -> bool {
        c.is_ascii_alphanumeric() || c == '_'
    }
}

impl fmt::Debug for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UserName").field(&self.0).finish()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserName {
    type Error = UserNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for UserName {
    type Error = UserNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserName> for String {
    fn from(name: UserName) -> Self {
        name.0
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod length_validation {
        use super::*;

        #[test]
        fn test_empty_fails() {
            assert_eq!(UserName::new(""), Err(UserNameError::Empty));
        }

        #[test]
        fn test_single_char() {
            assert!(UserName::new("a").is_ok());
        }

        #[test]
        fn test_maximum_length() {
            assert!(UserName::new("a".repeat(USER_NAME_MAX_LENGTH)).is_ok());
        }

        #[test]
        fn test_too_long() {
            assert_eq!(
                UserName::new("a".repeat(USER_NAME_MAX_LENGTH + 1)),
                Err(UserNameError::TooLong { length: 65, max: 64 })
            );
        }
    }

    mod character_validation {
        use super::*;

        #[test]
        fn test_valid_characters() {
            assert!(UserName::new("Alice_123").is_ok());
            assert!(UserName::new("_").is_ok());
        }

        #[test]
        fn test_case_is_preserved() {
            let name = UserName::new("Alice").unwrap();
            assert_eq!(name.as_str(), "Alice");
            assert_ne!(name, UserName::new("alice").unwrap());
        }

        #[test]
        fn test_rejects_punctuation_and_space() {
            for (input, bad, pos) in [("alice.bob", '.', 5), ("a b", ' ', 1), ("bob-1", '-', 3)] {
                assert_eq!(
                    UserName::new(input),
                    Err(UserNameError::InvalidCharacter { char: bad, position: pos })
                );
            }
        }

        #[test]
        fn test_rejects_non_ascii() {
            assert!(matches!(
                UserName::new("ålice"),
                Err(UserNameError::InvalidCharacter { char: 'å', position: 0 })
            ));
        }
    }

    #[test]
    fn test_serde_validates() {
        let name: UserName = serde_json::from_str("\"alice\"").unwrap();
        assert_eq!(name.as_str(), "alice");
        assert!(serde_json::from_str::<UserName>("\"al ice\"").is_err());
        assert_eq!(serde_json::to_string(&name).unwrap(), "\"alice\"");
    }
}
