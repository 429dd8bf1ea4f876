//! Auth (Session) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Session entity and the session store trait
//! - `application/` - Configuration
//! - `infra/` - Session store implementations (signed cookie, in-memory)
//! - `presentation/` - The gate middleware for restricted routes
//!
//! ## Session Model
//! - A session is a small key/value bag; login writes `authorId` into it
//! - The only way into the authenticated state is a successful login
//! - Cookies are HMAC-signed, HttpOnly and expire after seven days
//! - Forged or expired cookies load as an empty session

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use domain::repository::{LocalSessionStore, SessionStore};
pub use domain::session::{AUTHOR_ID_KEY, Session};
pub use error::{AuthError, AuthResult};
pub use infra::{cookie_store::CookieSessionStore, memory::MemorySessionStore};
pub use presentation::middleware::{AuthGateState, AuthenticatedAuthor, require_author_session};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
