//! Theme Use Cases

use std::sync::Arc;

use kernel::id::ThemeId;

use crate::domain::entity::{Theme, ThemeDraft};
use crate::domain::repository::ThemeRepository;
use crate::error::{HokkuError, HokkuResult, Resource};

/// Theme use cases
pub struct ThemeUseCases<R>
where
    R: ThemeRepository,
{
    repo: Arc<R>,
}

impl<R> ThemeUseCases<R>
where
    R: ThemeRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, draft: ThemeDraft) -> HokkuResult<ThemeId> {
        draft.validate()?;

        let id = self
            .repo
            .create_theme(&draft)
            .await
            .map_err(|e| HokkuError::from_store(e, Resource::Theme))?;

        tracing::info!(theme_id = %id, title = %draft.title, "Created theme");
        Ok(id)
    }

    pub async fn get(&self, id: ThemeId) -> HokkuResult<Theme> {
        self.repo
            .get_theme(id)
            .await
            .map_err(|e| HokkuError::from_store(e, Resource::Theme))
    }

    pub async fn list(&self) -> HokkuResult<Vec<Theme>> {
        self.repo
            .list_themes()
            .await
            .map_err(|e| HokkuError::from_store(e, Resource::Theme))
    }

    pub async fn update(&self, id: ThemeId, draft: ThemeDraft) -> HokkuResult<()> {
        draft.validate()?;

        self.repo
            .update_theme(id, &draft)
            .await
            .map_err(|e| HokkuError::from_store(e, Resource::Theme))?;

        tracing::info!(theme_id = %id, "Updated theme");
        Ok(())
    }

    pub async fn delete(&self, id: ThemeId) -> HokkuResult<()> {
        self.repo
            .delete_theme(id)
            .await
            .map_err(|e| HokkuError::from_store(e, Resource::Theme))?;

        tracing::info!(theme_id = %id, "Deleted theme");
        Ok(())
    }
}
