//! Infrastructure Layer
//!
//! Session store implementations.

pub mod cookie_store;
pub mod memory;

pub use cookie_store::CookieSessionStore;
pub use memory::MemorySessionStore;
