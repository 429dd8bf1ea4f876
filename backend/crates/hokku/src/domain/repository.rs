//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the
//! infrastructure layer. Every operation resolves to a value or one of the
//! [`StoreError`] outcomes; backend-specific failures are classified before
//! they leave the implementation.

use kernel::id::{AuthorId, PostId, ThemeId};
use thiserror::Error;

use crate::domain::entity::{Author, NewAuthor, Post, PostDraft, Theme, ThemeDraft};
use crate::domain::pagination::Page;

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Store outcome vocabulary
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record with the requested identity
    #[error("Record not found")]
    NotFound,

    /// A uniqueness constraint was violated (author email, theme title)
    #[error("Record already exists")]
    AlreadyExists,

    /// A referenced record does not exist, or a record is still referenced
    #[error("Foreign key constraint fails")]
    ForeignKeyViolation,

    /// Any other backend failure
    #[error("Store backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl StoreError {
    pub fn backend<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        StoreError::Backend(Box::new(err))
    }
}

/// Post listing filter, applied before pagination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostFilter {
    #[default]
    All,
    ByAuthor(AuthorId),
    ByTheme(ThemeId),
}

impl PostFilter {
    pub fn matches(&self, post: &Post) -> bool {
        match self {
            PostFilter::All => true,
            PostFilter::ByAuthor(author_id) => post.owner_id == *author_id,
            PostFilter::ByTheme(theme_id) => post.theme_id == *theme_id,
        }
    }
}

/// Post repository trait
#[trait_variant::make(PostRepository: Send)]
pub trait LocalPostRepository {
    /// Persist a post; owner and theme must exist
    async fn create_post(&self, draft: &PostDraft) -> StoreResult<PostId>;

    async fn get_post(&self, id: PostId) -> StoreResult<Post>;

    /// Posts in creation order, filtered, then windowed by `page`
    async fn list_posts(&self, filter: PostFilter, page: Page) -> StoreResult<Vec<Post>>;

    /// Replace the mutable fields; identity and creation time are kept
    async fn update_post(&self, id: PostId, draft: &PostDraft) -> StoreResult<()>;

    async fn delete_post(&self, id: PostId) -> StoreResult<()>;
}

/// Author repository trait
#[trait_variant::make(AuthorRepository: Send)]
pub trait LocalAuthorRepository {
    /// Persist an author; the email must be unused
    async fn create_author(&self, author: &NewAuthor) -> StoreResult<AuthorId>;

    async fn get_author(&self, id: AuthorId) -> StoreResult<Author>;

    /// Exact match lookup used by login
    async fn get_author_by_email(&self, email: &str) -> StoreResult<Author>;

    async fn list_authors(&self) -> StoreResult<Vec<Author>>;

    async fn update_author(&self, id: AuthorId, author: &NewAuthor) -> StoreResult<()>;

    /// Fails with `ForeignKeyViolation` while the author still owns posts
    async fn delete_author(&self, id: AuthorId) -> StoreResult<()>;
}

/// Theme repository trait
#[trait_variant::make(ThemeRepository: Send)]
pub trait LocalThemeRepository {
    /// Persist a theme; the title must be unused
    async fn create_theme(&self, draft: &ThemeDraft) -> StoreResult<ThemeId>;

    async fn get_theme(&self, id: ThemeId) -> StoreResult<Theme>;

    async fn list_themes(&self) -> StoreResult<Vec<Theme>>;

    async fn update_theme(&self, id: ThemeId, draft: &ThemeDraft) -> StoreResult<()>;

    /// Fails with `ForeignKeyViolation` while posts still use the theme
    async fn delete_theme(&self, id: ThemeId) -> StoreResult<()>;
}

/// Everything the HTTP layer needs from a store
pub trait HokkuStore:
    PostRepository + AuthorRepository + ThemeRepository + Clone + Send + Sync + 'static
{
}

impl<T> HokkuStore for T where
    T: PostRepository + AuthorRepository + ThemeRepository + Clone + Send + Sync + 'static
{
}
