//! Post Use Cases

use std::sync::Arc;

use kernel::id::PostId;

use crate::domain::entity::{Post, PostDraft};
use crate::domain::pagination::Page;
use crate::domain::repository::{PostFilter, PostRepository};
use crate::error::{HokkuError, HokkuResult, Resource};

/// Post use cases
pub struct PostUseCases<R>
where
    R: PostRepository,
{
    repo: Arc<R>,
}

impl<R> PostUseCases<R>
where
    R: PostRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Validate and persist a post
    ///
    /// Validation failures never reach the store.
    pub async fn create(&self, draft: PostDraft) -> HokkuResult<PostId> {
        draft.validate()?;

        let id = self
            .repo
            .create_post(&draft)
            .await
            .map_err(|e| HokkuError::from_store(e, Resource::Post))?;

        tracing::info!(
            post_id = %id,
            owner_id = %draft.owner_id,
            theme_id = %draft.theme_id,
            "Created post"
        );

        Ok(id)
    }

    pub async fn get(&self, id: PostId) -> HokkuResult<Post> {
        self.repo
            .get_post(id)
            .await
            .map_err(|e| HokkuError::from_store(e, Resource::Post))
    }

    pub async fn list(&self, filter: PostFilter, page: Page) -> HokkuResult<Vec<Post>> {
        self.repo
            .list_posts(filter, page)
            .await
            .map_err(|e| HokkuError::from_store(e, Resource::Post))
    }

    pub async fn update(&self, id: PostId, draft: PostDraft) -> HokkuResult<()> {
        draft.validate()?;

        self.repo
            .update_post(id, &draft)
            .await
            .map_err(|e| HokkuError::from_store(e, Resource::Post))?;

        tracing::info!(post_id = %id, "Updated post");
        Ok(())
    }

    pub async fn delete(&self, id: PostId) -> HokkuResult<()> {
        self.repo
            .delete_post(id)
            .await
            .map_err(|e| HokkuError::from_store(e, Resource::Post))?;

        tracing::info!(post_id = %id, "Deleted post");
        Ok(())
    }
}
