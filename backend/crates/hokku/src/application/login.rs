//! Login Use Case
//!
//! Resolves email/password to an author id. Writing the id into the session
//! is the handler's job.

use std::sync::Arc;

use kernel::id::AuthorId;
use platform::password::{ClearTextPassword, CredentialManager};

use crate::domain::repository::{AuthorRepository, StoreError};
use crate::error::{HokkuError, HokkuResult, Resource};

/// Login use case
pub struct LoginUseCase<R>
where
    R: AuthorRepository,
{
    repo: Arc<R>,
    credentials: Arc<CredentialManager>,
}

impl<R> LoginUseCase<R>
where
    R: AuthorRepository,
{
    pub fn new(repo: Arc<R>, credentials: Arc<CredentialManager>) -> Self {
        Self { repo, credentials }
    }

    /// Unknown email is `EmailNotFound`, a wrong secret `WrongCredentials`
    pub async fn execute(&self, email: &str, password: ClearTextPassword) -> HokkuResult<AuthorId> {
        let author = match self.repo.get_author_by_email(email.trim()).await {
            Ok(author) => author,
            Err(StoreError::NotFound) => return Err(HokkuError::EmailNotFound),
            Err(e) => return Err(HokkuError::from_store(e, Resource::Author)),
        };

        let credentials = self.credentials.clone();
        let digest = author.password_hash.clone();
        let matches =
            tokio::task::spawn_blocking(move || credentials.verify(&digest, &password))
                .await
                .map_err(|e| {
                    HokkuError::Internal(format!("password verification task failed: {}", e))
                })?;

        if !matches {
            return Err(HokkuError::WrongCredentials);
        }

        tracing::info!(author_id = %author.id, "Author logged in");
        Ok(author.id)
    }
}
