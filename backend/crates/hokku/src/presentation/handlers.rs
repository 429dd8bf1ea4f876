//! HTTP Handlers
//!
//! Decode path, query and body; run the use case; map the outcome.
//! Bodies are taken as raw bytes so malformed JSON is reported through
//! [`HokkuError::Decode`] like every other error.

use std::sync::Arc;

use auth::{AuthenticatedAuthor, Session, SessionStore};
use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use kernel::id::{AuthorId, Id, PostId, ThemeId};
use platform::password::{ClearTextPassword, CredentialManager};
use serde::de::DeserializeOwned;

use crate::application::config::HokkuConfig;
use crate::application::{AuthorUseCases, LoginUseCase, PostUseCases, ThemeUseCases};
use crate::domain::pagination::Page;
use crate::domain::repository::{HokkuStore, PostFilter};
use crate::error::{HokkuError, HokkuResult};
use crate::presentation::dto::{
    AuthorRequest, AuthorResponse, HealthResponse, ListQuery, LoginRequest, PostRequest,
    PostResponse, ThemeRequest, ThemeResponse,
};

/// Shared state for hokku handlers
pub struct HokkuAppState<R, S>
where
    R: HokkuStore,
    S: SessionStore + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub sessions: Arc<S>,
    pub credentials: Arc<CredentialManager>,
    pub config: Arc<HokkuConfig>,
}

// Manual impl: the store itself need not be `Clone`
impl<R, S> Clone for HokkuAppState<R, S>
where
    R: HokkuStore,
    S: SessionStore + Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            sessions: self.sessions.clone(),
            credentials: self.credentials.clone(),
            config: self.config.clone(),
        }
    }
}

impl<R, S> HokkuAppState<R, S>
where
    R: HokkuStore,
    S: SessionStore + Clone + Send + Sync + 'static,
{
    pub fn new(repo: R, sessions: S, config: HokkuConfig) -> HokkuResult<Self> {
        let credentials = CredentialManager::new(config.password_cost)?;
        Ok(Self {
            repo: Arc::new(repo),
            sessions: Arc::new(sessions),
            credentials: Arc::new(credentials),
            config: Arc::new(config),
        })
    }

    fn posts(&self) -> PostUseCases<R> {
        PostUseCases::new(self.repo.clone())
    }

    fn authors(&self) -> AuthorUseCases<R> {
        AuthorUseCases::new(self.repo.clone(), self.credentials.clone())
    }

    fn themes(&self) -> ThemeUseCases<R> {
        ThemeUseCases::new(self.repo.clone())
    }
}

// ============================================================================
// Input helpers
// ============================================================================

fn parse_id<T>(raw: &str, message: &'static str) -> HokkuResult<Id<T>> {
    raw.parse().map_err(|_| HokkuError::InvalidInput(message))
}

fn parse_param(raw: Option<&str>, message: &'static str) -> HokkuResult<Option<usize>> {
    match raw {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<usize>()
            .map(Some)
            .map_err(|_| HokkuError::InvalidInput(message)),
    }
}

/// Absent or zero `limit` falls back to the configured page size
fn parse_page(
    query: Result<Query<ListQuery>, QueryRejection>,
    default_limit: usize,
) -> HokkuResult<Page> {
    let Query(query) = query.map_err(|_| HokkuError::InvalidInput("Bad query parameters"))?;

    let limit = match parse_param(query.limit.as_deref(), "Limit must be a number")? {
        None | Some(0) => default_limit,
        Some(limit) => limit,
    };
    let offset = parse_param(query.offset.as_deref(), "Offset must be a number")?.unwrap_or(0);

    Ok(Page::new(limit, offset))
}

fn decode_body<T: DeserializeOwned>(body: &Bytes) -> HokkuResult<T> {
    serde_json::from_slice(body).map_err(HokkuError::Decode)
}

const ID_MESSAGE: &str = "Bad request. Id must be an integer";

// ============================================================================
// Health
// ============================================================================

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        data: "It`s alive!",
    })
}

// ============================================================================
// Posts
// ============================================================================

async fn list_filtered<R, S>(
    state: &HokkuAppState<R, S>,
    filter: PostFilter,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> HokkuResult<Json<Vec<PostResponse>>>
where
    R: HokkuStore,
    S: SessionStore + Clone + Send + Sync + 'static,
{
    let page = parse_page(query, state.config.default_limit)?;
    let posts = state.posts().list(filter, page).await?;
    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

/// GET /posts
pub async fn list_posts<R, S>(
    State(state): State<HokkuAppState<R, S>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> HokkuResult<Json<Vec<PostResponse>>>
where
    R: HokkuStore,
    S: SessionStore + Clone + Send + Sync + 'static,
{
    list_filtered(&state, PostFilter::All, query).await
}

/// GET /posts/byTheme/{themeId}
pub async fn list_posts_by_theme<R, S>(
    State(state): State<HokkuAppState<R, S>>,
    Path(theme_id): Path<String>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> HokkuResult<Json<Vec<PostResponse>>>
where
    R: HokkuStore,
    S: SessionStore + Clone + Send + Sync + 'static,
{
    let theme_id: ThemeId = parse_id(&theme_id, "Bad request. ThemeId must be an integer")?;
    list_filtered(&state, PostFilter::ByTheme(theme_id), query).await
}

/// GET /posts/byAuthor/{authorId}
pub async fn list_posts_by_author<R, S>(
    State(state): State<HokkuAppState<R, S>>,
    Path(author_id): Path<String>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> HokkuResult<Json<Vec<PostResponse>>>
where
    R: HokkuStore,
    S: SessionStore + Clone + Send + Sync + 'static,
{
    let author_id: AuthorId = parse_id(&author_id, "Bad request. AuthorId must be an integer")?;
    list_filtered(&state, PostFilter::ByAuthor(author_id), query).await
}

/// GET /posts/{id}
pub async fn get_post<R, S>(
    State(state): State<HokkuAppState<R, S>>,
    Path(id): Path<String>,
) -> HokkuResult<Json<PostResponse>>
where
    R: HokkuStore,
    S: SessionStore + Clone + Send + Sync + 'static,
{
    let id: PostId = parse_id(&id, ID_MESSAGE)?;
    let post = state.posts().get(id).await?;
    Ok(Json(post.into()))
}

/// POST /posts
pub async fn create_post<R, S>(
    State(state): State<HokkuAppState<R, S>>,
    AuthenticatedAuthor(actor): AuthenticatedAuthor,
    body: Bytes,
) -> HokkuResult<impl IntoResponse>
where
    R: HokkuStore,
    S: SessionStore + Clone + Send + Sync + 'static,
{
    let req: PostRequest = decode_body(&body)?;
    let id = state.posts().create(req.into()).await?;

    tracing::debug!(actor = %actor, post_id = %id, "Post created by session author");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/posts/{}", id))],
    ))
}

/// PUT /posts/{id}
pub async fn update_post<R, S>(
    State(state): State<HokkuAppState<R, S>>,
    AuthenticatedAuthor(actor): AuthenticatedAuthor,
    Path(id): Path<String>,
    body: Bytes,
) -> HokkuResult<StatusCode>
where
    R: HokkuStore,
    S: SessionStore + Clone + Send + Sync + 'static,
{
    let id: PostId = parse_id(&id, ID_MESSAGE)?;
    let req: PostRequest = decode_body(&body)?;
    state.posts().update(id, req.into()).await?;

    tracing::debug!(actor = %actor, post_id = %id, "Post updated by session author");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /posts/{id}
pub async fn delete_post<R, S>(
    State(state): State<HokkuAppState<R, S>>,
    AuthenticatedAuthor(actor): AuthenticatedAuthor,
    Path(id): Path<String>,
) -> HokkuResult<StatusCode>
where
    R: HokkuStore,
    S: SessionStore + Clone + Send + Sync + 'static,
{
    let id: PostId = parse_id(&id, ID_MESSAGE)?;
    state.posts().delete(id).await?;

    tracing::debug!(actor = %actor, post_id = %id, "Post deleted by session author");
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Authors
// ============================================================================

/// GET /authors
pub async fn list_authors<R, S>(
    State(state): State<HokkuAppState<R, S>>,
) -> HokkuResult<Json<Vec<AuthorResponse>>>
where
    R: HokkuStore,
    S: SessionStore + Clone + Send + Sync + 'static,
{
    let authors = state.authors().list().await?;
    Ok(Json(authors.into_iter().map(AuthorResponse::from).collect()))
}

/// GET /authors/{id}
pub async fn get_author<R, S>(
    State(state): State<HokkuAppState<R, S>>,
    Path(id): Path<String>,
) -> HokkuResult<Json<AuthorResponse>>
where
    R: HokkuStore,
    S: SessionStore + Clone + Send + Sync + 'static,
{
    let id: AuthorId = parse_id(&id, ID_MESSAGE)?;
    let author = state.authors().get(id).await?;
    Ok(Json(author.into()))
}

/// POST /authors
pub async fn create_author<R, S>(
    State(state): State<HokkuAppState<R, S>>,
    body: Bytes,
) -> HokkuResult<impl IntoResponse>
where
    R: HokkuStore,
    S: SessionStore + Clone + Send + Sync + 'static,
{
    let req: AuthorRequest = decode_body(&body)?;
    let id = state.authors().register(req.into()).await?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/authors/{}", id))],
    ))
}

/// PUT /authors/{id}
pub async fn update_author<R, S>(
    State(state): State<HokkuAppState<R, S>>,
    AuthenticatedAuthor(actor): AuthenticatedAuthor,
    Path(id): Path<String>,
    body: Bytes,
) -> HokkuResult<StatusCode>
where
    R: HokkuStore,
    S: SessionStore + Clone + Send + Sync + 'static,
{
    let id: AuthorId = parse_id(&id, ID_MESSAGE)?;
    let req: AuthorRequest = decode_body(&body)?;
    state.authors().update(id, req.into()).await?;

    tracing::debug!(actor = %actor, author_id = %id, "Author updated by session author");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /authors/{id}
pub async fn delete_author<R, S>(
    State(state): State<HokkuAppState<R, S>>,
    AuthenticatedAuthor(actor): AuthenticatedAuthor,
    Path(id): Path<String>,
) -> HokkuResult<StatusCode>
where
    R: HokkuStore,
    S: SessionStore + Clone + Send + Sync + 'static,
{
    let id: AuthorId = parse_id(&id, ID_MESSAGE)?;
    state.authors().delete(id).await?;

    tracing::debug!(actor = %actor, author_id = %id, "Author deleted by session author");
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Themes
// ============================================================================

/// GET /themes
pub async fn list_themes<R, S>(
    State(state): State<HokkuAppState<R, S>>,
) -> HokkuResult<Json<Vec<ThemeResponse>>>
where
    R: HokkuStore,
    S: SessionStore + Clone + Send + Sync + 'static,
{
    let themes = state.themes().list().await?;
    Ok(Json(themes.into_iter().map(ThemeResponse::from).collect()))
}

/// GET /themes/{id}
pub async fn get_theme<R, S>(
    State(state): State<HokkuAppState<R, S>>,
    Path(id): Path<String>,
) -> HokkuResult<Json<ThemeResponse>>
where
    R: HokkuStore,
    S: SessionStore + Clone + Send + Sync + 'static,
{
    let id: ThemeId = parse_id(&id, ID_MESSAGE)?;
    let theme = state.themes().get(id).await?;
    Ok(Json(theme.into()))
}

/// POST /themes
pub async fn create_theme<R, S>(
    State(state): State<HokkuAppState<R, S>>,
    AuthenticatedAuthor(actor): AuthenticatedAuthor,
    body: Bytes,
) -> HokkuResult<impl IntoResponse>
where
    R: HokkuStore,
    S: SessionStore + Clone + Send + Sync + 'static,
{
    let req: ThemeRequest = decode_body(&body)?;
    let id = state.themes().create(req.into()).await?;

    tracing::debug!(actor = %actor, theme_id = %id, "Theme created by session author");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/themes/{}", id))],
    ))
}

/// PUT /themes/{id}
pub async fn update_theme<R, S>(
    State(state): State<HokkuAppState<R, S>>,
    AuthenticatedAuthor(actor): AuthenticatedAuthor,
    Path(id): Path<String>,
    body: Bytes,
) -> HokkuResult<StatusCode>
where
    R: HokkuStore,
    S: SessionStore + Clone + Send + Sync + 'static,
{
    let id: ThemeId = parse_id(&id, ID_MESSAGE)?;
    let req: ThemeRequest = decode_body(&body)?;
    state.themes().update(id, req.into()).await?;

    tracing::debug!(actor = %actor, theme_id = %id, "Theme updated by session author");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /themes/{id}
pub async fn delete_theme<R, S>(
    State(state): State<HokkuAppState<R, S>>,
    AuthenticatedAuthor(actor): AuthenticatedAuthor,
    Path(id): Path<String>,
) -> HokkuResult<StatusCode>
where
    R: HokkuStore,
    S: SessionStore + Clone + Send + Sync + 'static,
{
    let id: ThemeId = parse_id(&id, ID_MESSAGE)?;
    state.themes().delete(id).await?;

    tracing::debug!(actor = %actor, theme_id = %id, "Theme deleted by session author");
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Login / Logout
// ============================================================================

/// POST /login
pub async fn login<R, S>(
    State(state): State<HokkuAppState<R, S>>,
    headers: HeaderMap,
    body: Bytes,
) -> HokkuResult<impl IntoResponse>
where
    R: HokkuStore,
    S: SessionStore + Clone + Send + Sync + 'static,
{
    let req: LoginRequest = decode_body(&body)?;

    let use_case = LoginUseCase::new(state.repo.clone(), state.credentials.clone());
    let author_id = use_case
        .execute(&req.email, ClearTextPassword::from(req.password))
        .await?;

    // Never promote the caller's pre-login session id
    let previous = state.sessions.load(&headers).await?;
    state.sessions.destroy(&previous).await?;

    let mut session = Session::new();
    session.set_author_id(author_id);
    let cookie = state.sessions.save(&session).await?;

    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)]))
}

/// POST /logout
pub async fn logout<R, S>(
    State(state): State<HokkuAppState<R, S>>,
    headers: HeaderMap,
) -> HokkuResult<impl IntoResponse>
where
    R: HokkuStore,
    S: SessionStore + Clone + Send + Sync + 'static,
{
    let session = state.sessions.load(&headers).await?;
    let cookie = state.sessions.destroy(&session).await?;

    if let Some(author_id) = session.author_id() {
        tracing::info!(author_id = %author_id, "Author logged out");
    }

    Ok((StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)]))
}
