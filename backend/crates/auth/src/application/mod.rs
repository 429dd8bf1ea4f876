//! Application Layer
//!
//! Configuration shared by the session stores and the gate.

pub mod config;

// Re-exports
pub use config::AuthConfig;
