//! Value Object Module

pub mod csrf_secret;
pub mod display_name;
pub mod user_flags;
pub mod user_id;
pub mod user_name;
pub mod user_password;
