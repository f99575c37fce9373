//! User Flags
//!
//! Bit set stored in `users.flags`. Only the moderator bit is defined; other
//! bits are preserved as loaded.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserFlags(i32);

impl UserFlags {
    pub const MODERATOR: i32 = 1 << 0;

    #[inline]
    pub const fn from_bits(bits: i32) -> Self {
        Self(bits)
    }

    #[inline]
    pub const fn bits(&self) -> i32 {
        self.0
    }

    #[inline]
    pub const fn is_moderator(&self) -> bool {
        self.0 & Self::MODERATOR != 0
    }

    #[inline]
    pub const fn with_moderator(self, on: bool) -> Self {
        if on {
            Self(self.0 | Self::MODERATOR)
        } else {
            Self(self.0 & !Self::MODERATOR)
        }
    }
}
