//! Domain Layer
//!
//! Contains entities, validators, pagination and repository traits.

pub mod entity;
pub mod pagination;
pub mod repository;
pub mod validation;

// Re-exports
pub use entity::{
    author::{Author, AuthorDraft, NewAuthor},
    post::{Post, PostDraft},
    theme::{Theme, ThemeDraft},
};
pub use pagination::{Page, resolve};
pub use repository::{
    AuthorRepository, HokkuStore, PostFilter, PostRepository, StoreError, StoreResult,
    ThemeRepository,
};
pub use validation::ValidationErrors;
