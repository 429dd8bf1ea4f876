//! In-Memory Store
//!
//! Reference implementation of the repository traits. One lock serializes
//! every mutation; identity sequences live inside the locked state so ids
//! stay unique and are never reused, even after deletes.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use kernel::id::{AuthorId, PostId, ThemeId};
use platform::password::{ClearTextPassword, CredentialManager, PasswordHashError};
use tokio::sync::RwLock;

use crate::domain::entity::{Author, NewAuthor, Post, PostDraft, Theme, ThemeDraft};
use crate::domain::pagination::Page;
use crate::domain::repository::{
    AuthorRepository, PostFilter, PostRepository, StoreError, StoreResult, ThemeRepository,
};

/// Password shared by every fixture author
pub const FIXTURE_PASSWORD: &str = "password";

#[derive(Debug)]
struct State {
    posts: BTreeMap<PostId, Post>,
    authors: BTreeMap<AuthorId, Author>,
    themes: BTreeMap<ThemeId, Theme>,
    next_post_id: i64,
    next_author_id: i64,
    next_theme_id: i64,
}

impl Default for State {
    fn default() -> Self {
        Self {
            posts: BTreeMap::new(),
            authors: BTreeMap::new(),
            themes: BTreeMap::new(),
            next_post_id: 1,
            next_author_id: 1,
            next_theme_id: 1,
        }
    }
}

impl State {
    fn check_references(&self, draft: &PostDraft) -> StoreResult<()> {
        if !self.authors.contains_key(&draft.owner_id) || !self.themes.contains_key(&draft.theme_id)
        {
            return Err(StoreError::ForeignKeyViolation);
        }
        Ok(())
    }

    fn email_taken(&self, email: &str, except: Option<AuthorId>) -> bool {
        self.authors
            .values()
            .any(|a| a.email == email && Some(a.id) != except)
    }

    fn title_taken(&self, title: &str, except: Option<ThemeId>) -> bool {
        self.themes
            .values()
            .any(|t| t.title == title && Some(t.id) != except)
    }

    fn insert_author(&mut self, author: &NewAuthor) -> AuthorId {
        let id = AuthorId::new(self.next_author_id);
        self.next_author_id += 1;
        self.authors.insert(
            id,
            Author {
                id,
                email: author.email.clone(),
                name: author.name.clone(),
                password_hash: author.password_hash.clone(),
                created: Utc::now(),
            },
        );
        id
    }

    fn insert_theme(&mut self, draft: &ThemeDraft) -> ThemeId {
        let id = ThemeId::new(self.next_theme_id);
        self.next_theme_id += 1;
        self.themes.insert(
            id,
            Theme {
                id,
                title: draft.title.clone(),
            },
        );
        id
    }

    fn insert_post(&mut self, draft: &PostDraft) -> PostId {
        let id = PostId::new(self.next_post_id);
        self.next_post_id += 1;
        self.posts.insert(
            id,
            Post {
                id,
                title: draft.title.clone(),
                content: draft.content.clone(),
                created: Utc::now(),
                owner_id: draft.owner_id,
                theme_id: draft.theme_id,
            },
        );
        id
    }
}

/// Store holding everything in process memory
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with three authors, two themes and five posts
    ///
    /// Authors are `example{N}@email.com` / `Example{N}` with
    /// [`FIXTURE_PASSWORD`]. Posts `Title1..Title5` alternate owners
    /// 1,2,3,1,2 and themes 1,2,1,2,1.
    pub fn with_fixtures(credentials: &CredentialManager) -> Result<Self, PasswordHashError> {
        let mut state = State::default();
        let password_hash = credentials.hash(&ClearTextPassword::new(FIXTURE_PASSWORD))?;

        for n in 1..=3 {
            state.insert_author(&NewAuthor {
                email: format!("example{}@email.com", n),
                name: format!("Example{}", n),
                password_hash: password_hash.clone(),
            });
        }
        for n in 1..=2 {
            state.insert_theme(&ThemeDraft::new(format!("exampleTheme{}", n)));
        }

        let layout = [(1, 1), (2, 2), (3, 1), (1, 2), (2, 1)];
        for (n, (owner, theme)) in layout.into_iter().enumerate() {
            state.insert_post(&PostDraft {
                title: format!("Title{}", n + 1),
                content: "Content".to_string(),
                owner_id: AuthorId::new(owner),
                theme_id: ThemeId::new(theme),
            });
        }

        Ok(Self {
            state: Arc::new(RwLock::new(state)),
        })
    }

    /// Number of stored posts
    pub async fn post_count(&self) -> usize {
        self.state.read().await.posts.len()
    }
}

// ============================================================================
// Post Repository Implementation
// ============================================================================

impl PostRepository for MemoryStore {
    async fn create_post(&self, draft: &PostDraft) -> StoreResult<PostId> {
        let mut state = self.state.write().await;
        state.check_references(draft)?;
        Ok(state.insert_post(draft))
    }

    async fn get_post(&self, id: PostId) -> StoreResult<Post> {
        self.state
            .read()
            .await
            .posts
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list_posts(&self, filter: PostFilter, page: Page) -> StoreResult<Vec<Post>> {
        let state = self.state.read().await;
        let matching: Vec<Post> = state
            .posts
            .values()
            .filter(|post| filter.matches(post))
            .cloned()
            .collect();
        Ok(page.apply(matching))
    }

    async fn update_post(&self, id: PostId, draft: &PostDraft) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if !state.posts.contains_key(&id) {
            return Err(StoreError::NotFound);
        }
        state.check_references(draft)?;

        let post = state.posts.get_mut(&id).ok_or(StoreError::NotFound)?;
        post.title = draft.title.clone();
        post.content = draft.content.clone();
        post.owner_id = draft.owner_id;
        post.theme_id = draft.theme_id;
        Ok(())
    }

    async fn delete_post(&self, id: PostId) -> StoreResult<()> {
        self.state
            .write()
            .await
            .posts
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

// ============================================================================
// Author Repository Implementation
// ============================================================================

impl AuthorRepository for MemoryStore {
    async fn create_author(&self, author: &NewAuthor) -> StoreResult<AuthorId> {
        let mut state = self.state.write().await;
        if state.email_taken(&author.email, None) {
            return Err(StoreError::AlreadyExists);
        }
        Ok(state.insert_author(author))
    }

    async fn get_author(&self, id: AuthorId) -> StoreResult<Author> {
        self.state
            .read()
            .await
            .authors
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn get_author_by_email(&self, email: &str) -> StoreResult<Author> {
        self.state
            .read()
            .await
            .authors
            .values()
            .find(|a| a.email == email)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list_authors(&self) -> StoreResult<Vec<Author>> {
        Ok(self.state.read().await.authors.values().cloned().collect())
    }

    async fn update_author(&self, id: AuthorId, author: &NewAuthor) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if !state.authors.contains_key(&id) {
            return Err(StoreError::NotFound);
        }
        if state.email_taken(&author.email, Some(id)) {
            return Err(StoreError::AlreadyExists);
        }

        let stored = state.authors.get_mut(&id).ok_or(StoreError::NotFound)?;
        stored.email = author.email.clone();
        stored.name = author.name.clone();
        stored.password_hash = author.password_hash.clone();
        Ok(())
    }

    async fn delete_author(&self, id: AuthorId) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if !state.authors.contains_key(&id) {
            return Err(StoreError::NotFound);
        }
        if state.posts.values().any(|p| p.owner_id == id) {
            return Err(StoreError::ForeignKeyViolation);
        }
        state.authors.remove(&id);
        Ok(())
    }
}

// ============================================================================
// Theme Repository Implementation
// ============================================================================

impl ThemeRepository for MemoryStore {
    async fn create_theme(&self, draft: &ThemeDraft) -> StoreResult<ThemeId> {
        let mut state = self.state.write().await;
        if state.title_taken(&draft.title, None) {
            return Err(StoreError::AlreadyExists);
        }
        Ok(state.insert_theme(draft))
    }

    async fn get_theme(&self, id: ThemeId) -> StoreResult<Theme> {
        self.state
            .read()
            .await
            .themes
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list_themes(&self) -> StoreResult<Vec<Theme>> {
        Ok(self.state.read().await.themes.values().cloned().collect())
    }

    async fn update_theme(&self, id: ThemeId, draft: &ThemeDraft) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if !state.themes.contains_key(&id) {
            return Err(StoreError::NotFound);
        }
        if state.title_taken(&draft.title, Some(id)) {
            return Err(StoreError::AlreadyExists);
        }

        let stored = state.themes.get_mut(&id).ok_or(StoreError::NotFound)?;
        stored.title = draft.title.clone();
        Ok(())
    }

    async fn delete_theme(&self, id: ThemeId) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if !state.themes.contains_key(&id) {
            return Err(StoreError::NotFound);
        }
        if state.posts.values().any(|p| p.theme_id == id) {
            return Err(StoreError::ForeignKeyViolation);
        }
        state.themes.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::password::PasswordCost;
    use std::collections::HashSet;

    fn fixtures() -> MemoryStore {
        let credentials = CredentialManager::new(PasswordCost::low()).unwrap();
        MemoryStore::with_fixtures(&credentials).unwrap()
    }

    fn draft(owner: i64, theme: i64) -> PostDraft {
        PostDraft {
            title: "T".to_string(),
            content: "C".to_string(),
            owner_id: AuthorId::new(owner),
            theme_id: ThemeId::new(theme),
        }
    }

    #[tokio::test]
    async fn test_fixture_layout() {
        let store = fixtures();
        assert_eq!(store.post_count().await, 5);
        assert_eq!(store.list_authors().await.unwrap().len(), 3);
        assert_eq!(store.list_themes().await.unwrap().len(), 2);

        let post = store.get_post(PostId::new(4)).await.unwrap();
        assert_eq!(post.title, "Title4");
        assert_eq!(post.owner_id, AuthorId::new(1));
        assert_eq!(post.theme_id, ThemeId::new(2));
    }

    #[tokio::test]
    async fn test_get_post_is_idempotent() {
        let store = fixtures();
        let first = store.get_post(PostId::new(2)).await.unwrap();
        let second = store.get_post(PostId::new(2)).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_create_post_checks_references() {
        let store = fixtures();

        assert!(matches!(
            store.create_post(&draft(1, 99)).await,
            Err(StoreError::ForeignKeyViolation)
        ));
        assert!(matches!(
            store.create_post(&draft(99, 1)).await,
            Err(StoreError::ForeignKeyViolation)
        ));
        assert_eq!(store.post_count().await, 5);

        let id = store.create_post(&draft(3, 2)).await.unwrap();
        assert_eq!(id, PostId::new(6));
    }

    #[tokio::test]
    async fn test_ids_are_not_reused() {
        let store = fixtures();
        store.delete_post(PostId::new(5)).await.unwrap();
        let id = store.create_post(&draft(1, 1)).await.unwrap();
        assert_eq!(id, PostId::new(6));
    }

    #[tokio::test]
    async fn test_list_posts_filters_then_pages() {
        let store = fixtures();

        let by_theme = store
            .list_posts(PostFilter::ByTheme(ThemeId::new(1)), Page::new(2, 1))
            .await
            .unwrap();
        let ids: Vec<i64> = by_theme.iter().map(|p| p.id.get()).collect();
        assert_eq!(ids, vec![3, 5]);

        let by_author = store
            .list_posts(PostFilter::ByAuthor(AuthorId::new(2)), Page::new(0, 0))
            .await
            .unwrap();
        let ids: Vec<i64> = by_author.iter().map(|p| p.id.get()).collect();
        assert_eq!(ids, vec![2, 5]);

        let beyond = store
            .list_posts(PostFilter::All, Page::new(1, 5))
            .await
            .unwrap();
        assert!(beyond.is_empty());
    }

    #[tokio::test]
    async fn test_update_and_delete_missing() {
        let store = fixtures();
        assert!(matches!(
            store.update_post(PostId::new(42), &draft(1, 1)).await,
            Err(StoreError::NotFound)
        ));
        assert!(matches!(
            store.delete_post(PostId::new(42)).await,
            Err(StoreError::NotFound)
        ));
        assert_eq!(store.post_count().await, 5);
    }

    #[tokio::test]
    async fn test_update_post_keeps_identity() {
        let store = fixtures();
        let before = store.get_post(PostId::new(1)).await.unwrap();

        let mut changed = draft(2, 2);
        changed.title = "Renamed".to_string();
        store.update_post(PostId::new(1), &changed).await.unwrap();

        let after = store.get_post(PostId::new(1)).await.unwrap();
        assert_eq!(after.id, before.id);
        assert_eq!(after.created, before.created);
        assert_eq!(after.title, "Renamed");
        assert_eq!(after.owner_id, AuthorId::new(2));
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let store = fixtures();
        let existing = store
            .get_author_by_email("example1@email.com")
            .await
            .unwrap();

        let duplicate = NewAuthor {
            email: existing.email.clone(),
            name: "Someone".to_string(),
            password_hash: existing.password_hash.clone(),
        };
        assert!(matches!(
            store.create_author(&duplicate).await,
            Err(StoreError::AlreadyExists)
        ));
        assert!(matches!(
            store.update_author(AuthorId::new(2), &duplicate).await,
            Err(StoreError::AlreadyExists)
        ));
        // Keeping one's own email is not a conflict
        store
            .update_author(AuthorId::new(1), &duplicate)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_referenced_rows_cannot_be_deleted() {
        let store = fixtures();
        assert!(matches!(
            store.delete_author(AuthorId::new(3)).await,
            Err(StoreError::ForeignKeyViolation)
        ));
        assert!(matches!(
            store.delete_theme(ThemeId::new(2)).await,
            Err(StoreError::ForeignKeyViolation)
        ));

        store.delete_post(PostId::new(3)).await.unwrap();
        store.delete_author(AuthorId::new(3)).await.unwrap();
        assert!(matches!(
            store.get_author(AuthorId::new(3)).await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_theme_titles_are_unique() {
        let store = fixtures();
        assert!(matches!(
            store
                .create_theme(&ThemeDraft::new("exampleTheme1"))
                .await,
            Err(StoreError::AlreadyExists)
        ));

        let id = store.create_theme(&ThemeDraft::new("Autumn")).await.unwrap();
        assert_eq!(id, ThemeId::new(3));
        assert!(matches!(
            store
                .update_theme(id, &ThemeDraft::new("exampleTheme2"))
                .await,
            Err(StoreError::AlreadyExists)
        ));
        store.delete_theme(id).await.unwrap();
    }

    #[tokio::test]
    async fn test_concurrent_creates_get_distinct_ids() {
        let store = fixtures();
        let template = store.get_author(AuthorId::new(1)).await.unwrap();

        let mut handles = Vec::new();
        for n in 0..50 {
            let store = store.clone();
            let author = NewAuthor {
                email: format!("writer{}@email.com", n),
                name: format!("Writer{}", n),
                password_hash: template.password_hash.clone(),
            };
            handles.push(tokio::spawn(async move {
                let post_id = store.create_post(&draft(1, 1)).await.unwrap();
                let author_id = store.create_author(&author).await.unwrap();
                (post_id, author_id)
            }));
        }

        let mut post_ids = HashSet::new();
        let mut author_ids = HashSet::new();
        for handle in handles {
            let (post_id, author_id) = handle.await.unwrap();
            post_ids.insert(post_id);
            author_ids.insert(author_id);
        }
        assert_eq!(post_ids.len(), 50);
        assert_eq!(author_ids.len(), 50);
        assert_eq!(store.post_count().await, 55);
        assert_eq!(store.list_authors().await.unwrap().len(), 53);
    }
}
