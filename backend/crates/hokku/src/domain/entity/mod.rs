//! Entities

pub mod author;
pub mod post;
pub mod theme;

pub use author::{Author, AuthorDraft, NewAuthor};
pub use post::{Post, PostDraft};
pub use theme::{Theme, ThemeDraft};
