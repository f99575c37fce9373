//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Wall clock abstraction (injectable for tests)
//! - Cryptographic utilities (random bytes, base64url, constant-time compare)
//! - Password hashing (Argon2id on the blocking pool)
//! - Signed token codec (HS256 compact JWS with audience and time checks)
//! - Cookie management (`Set-Cookie` rendering and request cookie lookup)

pub mod clock;
pub mod cookie;
pub mod crypto;
pub mod password;
pub mod token;
