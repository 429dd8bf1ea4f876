//! Hokku Router
//!
//! Reads, registration and login are open. Every other mutation passes the
//! session gate first.

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};

use auth::{AuthGateState, SessionStore, require_author_session};

use crate::domain::repository::HokkuStore;
use crate::presentation::handlers::{self, HokkuAppState};

/// Create the Hokku router for any store and session backend
pub fn hokku_router<R, S>(state: HokkuAppState<R, S>) -> Router
where
    R: HokkuStore,
    S: SessionStore + Clone + Send + Sync + 'static,
{
    let gate = AuthGateState::new(state.sessions.clone());

    let open = Router::new()
        .route("/health", get(handlers::health))
        .route("/posts", get(handlers::list_posts::<R, S>))
        .route(
            "/posts/byTheme/{theme_id}",
            get(handlers::list_posts_by_theme::<R, S>),
        )
        .route(
            "/posts/byAuthor/{author_id}",
            get(handlers::list_posts_by_author::<R, S>),
        )
        .route("/posts/{id}", get(handlers::get_post::<R, S>))
        .route(
            "/authors",
            get(handlers::list_authors::<R, S>).post(handlers::create_author::<R, S>),
        )
        .route("/authors/{id}", get(handlers::get_author::<R, S>))
        .route("/themes", get(handlers::list_themes::<R, S>))
        .route("/themes/{id}", get(handlers::get_theme::<R, S>))
        .route("/login", post(handlers::login::<R, S>))
        .route("/logout", post(handlers::logout::<R, S>));

    let restricted = Router::new()
        .route("/posts", post(handlers::create_post::<R, S>))
        .route(
            "/posts/{id}",
            axum::routing::put(handlers::update_post::<R, S>)
                .delete(handlers::delete_post::<R, S>),
        )
        .route(
            "/authors/{id}",
            axum::routing::put(handlers::update_author::<R, S>)
                .delete(handlers::delete_author::<R, S>),
        )
        .route("/themes", post(handlers::create_theme::<R, S>))
        .route(
            "/themes/{id}",
            axum::routing::put(handlers::update_theme::<R, S>)
                .delete(handlers::delete_theme::<R, S>),
        )
        .route_layer(from_fn_with_state(gate, require_author_session::<S>));

    open.merge(restricted).with_state(state)
}
