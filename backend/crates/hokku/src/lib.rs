//! Hokku (Blog) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, validators, pagination, repository traits
//! - `application/` - Use cases
//! - `infra/` - Store implementations (in-memory fixture, PostgreSQL)
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Data Model
//! - Posts (hokkus) belong to one author and one theme
//! - Author emails and theme titles are unique
//! - Identities come from store sequences and are never reused
//! - A post whose owner or theme does not exist is never persisted

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::HokkuConfig;
pub use domain::repository::{HokkuStore, PostFilter, StoreError, StoreResult};
pub use error::{HokkuError, HokkuResult};
pub use infra::{memory::MemoryStore, postgres::PgStore};
pub use presentation::{HokkuAppState, hokku_router};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

#[cfg(test)]
mod tests;
