//! Entity Module

pub mod claims;
pub mod user;
