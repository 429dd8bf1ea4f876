//! Data Transfer Objects
//!
//! JSON bodies are camelCase. Missing text fields decode as empty strings so
//! they surface as validation violations rather than decode errors.

use chrono::{DateTime, Utc};
use kernel::id::{AuthorId, PostId, ThemeId};
use platform::password::ClearTextPassword;
use serde::{Deserialize, Serialize};

use crate::domain::entity::{Author, AuthorDraft, Post, PostDraft, Theme, ThemeDraft};

// ============================================================================
// Requests
// ============================================================================

/// POST /posts, PUT /posts/{id}
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub owner_id: AuthorId,
    pub theme_id: ThemeId,
}

impl From<PostRequest> for PostDraft {
    fn from(req: PostRequest) -> Self {
        PostDraft {
            title: req.title,
            content: req.content,
            owner_id: req.owner_id,
            theme_id: req.theme_id,
        }
    }
}

/// POST /authors, PUT /authors/{id}
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub password: String,
}

impl From<AuthorRequest> for AuthorDraft {
    fn from(req: AuthorRequest) -> Self {
        AuthorDraft::new(req.email, req.name, ClearTextPassword::from(req.password))
    }
}

/// POST /login
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// POST /themes, PUT /themes/{id}
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeRequest {
    #[serde(default)]
    pub title: String,
}

impl From<ThemeRequest> for ThemeDraft {
    fn from(req: ThemeRequest) -> Self {
        ThemeDraft::new(req.title)
    }
}

/// `limit`/`offset` as received; parsed by the handler
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub created: DateTime<Utc>,
    pub owner_id: AuthorId,
    pub theme_id: ThemeId,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            created: post.created,
            owner_id: post.owner_id,
            theme_id: post.theme_id,
        }
    }
}

/// Author as exposed over HTTP; password material is never serialized
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorResponse {
    pub id: AuthorId,
    pub email: String,
    pub name: String,
    pub created: DateTime<Utc>,
}

impl From<Author> for AuthorResponse {
    fn from(author: Author) -> Self {
        Self {
            id: author.id,
            email: author.email,
            name: author.name,
            created: author.created,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeResponse {
    pub id: ThemeId,
    pub title: String,
}

impl From<Theme> for ThemeResponse {
    fn from(theme: Theme) -> Self {
        Self {
            id: theme.id,
            title: theme.title,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub data: &'static str,
}
