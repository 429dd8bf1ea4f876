//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request errors render through
//! `kernel::error::AppError` inside the crates.

mod config;

use auth::{CookieSessionStore, MemorySessionStore, SessionStore};
use axum::{
    Router, http,
    http::{Method, header},
};
use hokku::{HokkuAppState, HokkuStore, MemoryStore, PgStore, hokku_router};
use platform::password::CredentialManager;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{ApiConfig, SessionBackend};

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,hokku=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env()?;

    let app = match config.database_url.as_deref() {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .acquire_timeout(config.request_timeout)
                .connect(database_url)
                .await?;

            tracing::info!("Connected to database");

            // Run migrations
            sqlx::migrate!("../../../database/migrations")
                .run(&pool)
                .await?;

            tracing::info!("Migrations completed");

            with_sessions(PgStore::new(pool), &config)?
        }
        None => {
            let store = if config.seed_fixtures {
                let credentials = CredentialManager::new(config.password_cost)?;
                MemoryStore::with_fixtures(&credentials)?
            } else {
                MemoryStore::new()
            };

            tracing::warn!(
                seeded = config.seed_fixtures,
                "DATABASE_URL not set, data is kept in memory only"
            );

            with_sessions(store, &config)?
        }
    };

    // Start server
    tracing::info!("Listening on {}", config.addr);

    let listener = TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn with_sessions<R>(store: R, config: &ApiConfig) -> anyhow::Result<Router>
where
    R: HokkuStore,
{
    tracing::info!(backend = ?config.session_backend, "Session store selected");

    match config.session_backend {
        SessionBackend::Cookie => {
            build_app(store, CookieSessionStore::new(config.auth_config()), config)
        }
        SessionBackend::Memory => {
            let sessions = MemorySessionStore::new(config.auth_config());

            // Expired entries are otherwise only dropped when their cookie comes back
            let sweeper = sessions.clone();
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
                loop {
                    interval.tick().await;
                    sweeper.purge_expired().await;
                }
            });

            build_app(store, sessions, config)
        }
    }
}

fn build_app<R, S>(store: R, sessions: S, config: &ApiConfig) -> anyhow::Result<Router>
where
    R: HokkuStore,
    S: SessionStore + Clone + Send + Sync + 'static,
{
    let state = HokkuAppState::new(store, sessions, config.hokku_config())?;

    // CORS configuration
    let allowed_origins: Vec<http::HeaderValue> = config
        .frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([header::CONTENT_TYPE, header::ACCEPT]))
        .allow_credentials(true);

    #[allow(deprecated)]
    let timeout = TimeoutLayer::new(config.request_timeout);

    Ok(hokku_router(state)
        .layer(timeout)
        .layer(TraceLayer::new_for_http())
        .layer(cors))
}
