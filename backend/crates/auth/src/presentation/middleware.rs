//! Auth Middleware
//!
//! Gate for restricted routes. A request passes only when its session
//! carries `authorId`; otherwise it is answered with 401 before any handler
//! or store access.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{FromRequestParts, State};
use axum::http::Request;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use kernel::id::AuthorId;

use crate::domain::repository::SessionStore;
use crate::error::AuthError;

/// Middleware state
#[derive(Clone)]
pub struct AuthGateState<S>
where
    S: SessionStore + Clone + Send + Sync + 'static,
{
    pub sessions: Arc<S>,
}

impl<S> AuthGateState<S>
where
    S: SessionStore + Clone + Send + Sync + 'static,
{
    pub fn new(sessions: Arc<S>) -> Self {
        Self { sessions }
    }
}

/// The author a gated request acts as, stored in request extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedAuthor(pub AuthorId);

impl<St> FromRequestParts<St> for AuthenticatedAuthor
where
    St: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &St) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedAuthor>()
            .copied()
            .ok_or(AuthError::Unauthenticated)
    }
}

/// Middleware that requires an authenticated author session
pub async fn require_author_session<S>(
    State(state): State<AuthGateState<S>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError>
where
    S: SessionStore + Clone + Send + Sync + 'static,
{
    let session = state.sessions.load(req.headers()).await?;

    let Some(author_id) = session.author_id() else {
        return Err(AuthError::Unauthenticated);
    };

    tracing::debug!(author_id = %author_id, "Authenticated request");
    req.extensions_mut().insert(AuthenticatedAuthor(author_id));

    Ok(next.run(req).await)
}
