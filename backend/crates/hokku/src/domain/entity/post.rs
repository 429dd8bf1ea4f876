//! Post Entity
//!
//! A short text post ("hokku") written by an author under a theme.

use chrono::{DateTime, Utc};
use kernel::id::{AuthorId, PostId, ThemeId};

use crate::domain::validation::ValidationErrors;

pub const TITLE_MIN: usize = 1;
pub const TITLE_MAX: usize = 255;
pub const CONTENT_MIN: usize = 1;

/// Stored post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    /// Set by the store on creation, never changed afterwards
    pub created: DateTime<Utc>,
    pub owner_id: AuthorId,
    pub theme_id: ThemeId,
}

/// Mutable fields of a post, as submitted for create or update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub owner_id: AuthorId,
    pub theme_id: ThemeId,
}

impl PostDraft {
    /// Field constraints only; owner and theme existence is the store's job
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check_length("title", &self.title, TITLE_MIN, TITLE_MAX);
        errors.check_min_length("content", &self.content, CONTENT_MIN);
        errors.into_result()
    }
}
