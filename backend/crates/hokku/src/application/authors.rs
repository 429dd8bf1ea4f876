//! Author Use Cases
//!
//! Account creation and replacement hash the secret before the store sees
//! it. Hashing is CPU-bound and runs on the blocking pool.

use std::sync::Arc;

use kernel::id::AuthorId;
use platform::password::CredentialManager;

use crate::domain::entity::{Author, AuthorDraft, NewAuthor};
use crate::domain::repository::AuthorRepository;
use crate::error::{HokkuError, HokkuResult, Resource};

/// Author use cases
pub struct AuthorUseCases<R>
where
    R: AuthorRepository,
{
    repo: Arc<R>,
    credentials: Arc<CredentialManager>,
}

impl<R> AuthorUseCases<R>
where
    R: AuthorRepository,
{
    pub fn new(repo: Arc<R>, credentials: Arc<CredentialManager>) -> Self {
        Self { repo, credentials }
    }

    /// Validate, then replace the clear text secret with its hash
    async fn seal(&self, draft: AuthorDraft) -> HokkuResult<NewAuthor> {
        draft.validate()?;

        let credentials = self.credentials.clone();
        let sealed = tokio::task::spawn_blocking(move || draft.seal(&credentials))
            .await
            .map_err(|e| HokkuError::Internal(format!("password hashing task failed: {}", e)))??;

        Ok(sealed)
    }

    pub async fn register(&self, draft: AuthorDraft) -> HokkuResult<AuthorId> {
        let author = self.seal(draft).await?;

        let id = self
            .repo
            .create_author(&author)
            .await
            .map_err(|e| HokkuError::from_store(e, Resource::Author))?;

        tracing::info!(author_id = %id, "Registered author");
        Ok(id)
    }

    pub async fn get(&self, id: AuthorId) -> HokkuResult<Author> {
        self.repo
            .get_author(id)
            .await
            .map_err(|e| HokkuError::from_store(e, Resource::Author))
    }

    pub async fn list(&self) -> HokkuResult<Vec<Author>> {
        self.repo
            .list_authors()
            .await
            .map_err(|e| HokkuError::from_store(e, Resource::Author))
    }

    /// Replace email, name and password
    pub async fn update(&self, id: AuthorId, draft: AuthorDraft) -> HokkuResult<()> {
        let author = self.seal(draft).await?;

        self.repo
            .update_author(id, &author)
            .await
            .map_err(|e| HokkuError::from_store(e, Resource::Author))?;

        tracing::info!(author_id = %id, "Updated author");
        Ok(())
    }

    pub async fn delete(&self, id: AuthorId) -> HokkuResult<()> {
        self.repo
            .delete_author(id)
            .await
            .map_err(|e| HokkuError::from_store(e, Resource::Author))?;

        tracing::info!(author_id = %id, "Deleted author");
        Ok(())
    }
}
