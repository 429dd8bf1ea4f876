//! Domain Layer
//!
//! Contains the session entity and the session store trait.

pub mod repository;
pub mod session;

// Re-exports
pub use repository::{LocalSessionStore, SessionStore};
pub use session::Session;
