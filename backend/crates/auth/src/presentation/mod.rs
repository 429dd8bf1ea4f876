//! Presentation Layer
//!
//! HTTP middleware for restricted routes.

pub mod middleware;

pub use middleware::{AuthGateState, AuthenticatedAuthor, require_author_session};
