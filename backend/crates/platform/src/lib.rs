//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Credential management (Argon2id hashing with a configurable work factor)
//! - Cryptographic utilities (HMAC-SHA256 token signing, Base64)
//! - Cookie building and parsing

pub mod cookie;
pub mod crypto;
pub mod password;
