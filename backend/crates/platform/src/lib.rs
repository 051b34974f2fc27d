//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (random bytes, base64url, constant-time compare)
//! - Signed cookie codec (HMAC-SHA256 over JSON claims)
//! - Password hashing (Argon2id, NIST SP 800-63B compliant)
//! - Cookie management

pub mod cookie;
pub mod crypto;
pub mod password;
pub mod signed;
