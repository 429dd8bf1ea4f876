//! Server Configuration
//!
//! Read once at startup from the process environment (after `.env`).

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, bail};
use auth::AuthConfig;
use base64::Engine;
use base64::engine::general_purpose;
use hokku::HokkuConfig;
use platform::crypto::{KEY_LEN, random_key};
use platform::password::PasswordCost;

const DEFAULT_ADDR: &str = "0.0.0.0:1323";
const DEFAULT_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

/// Where sessions live
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionBackend {
    /// Signed cookie carries the session itself
    Cookie,
    /// Cookie carries a signed id; values stay in process memory
    Memory,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub addr: SocketAddr,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    /// Seed the in-memory store with demo data
    pub seed_fixtures: bool,
    pub session_backend: SessionBackend,
    pub session_secret: [u8; KEY_LEN],
    pub session_cookie_name: String,
    pub cookie_secure: bool,
    pub password_cost: PasswordCost,
    pub request_timeout: Duration,
    pub frontend_origins: Vec<String>,
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as absent
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let addr = var("HOKKU_ADDR")
            .unwrap_or_else(|| DEFAULT_ADDR.to_string())
            .parse()
            .context("HOKKU_ADDR must be a socket address")?;

        let session_secret = match var("SESSION_SECRET") {
            Some(encoded) => decode_secret(&encoded)?,
            None if cfg!(debug_assertions) => random_key(),
            None => bail!("SESSION_SECRET must be set in production"),
        };

        let session_backend = match var("SESSION_BACKEND").as_deref() {
            None | Some("cookie") => SessionBackend::Cookie,
            Some("memory") => SessionBackend::Memory,
            Some(other) => bail!("SESSION_BACKEND must be `cookie` or `memory`, got `{}`", other),
        };

        let defaults = PasswordCost::default();
        let password_cost = PasswordCost {
            memory_kib: parse_or(&var, "PASSWORD_MEMORY_KIB", defaults.memory_kib)?,
            iterations: parse_or(&var, "PASSWORD_ITERATIONS", defaults.iterations)?,
            parallelism: parse_or(&var, "PASSWORD_PARALLELISM", defaults.parallelism)?,
        };

        let frontend_origins = var("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            addr,
            database_url: var("DATABASE_URL"),
            database_max_connections: parse_or(&var, "DATABASE_MAX_CONNECTIONS", 5)?,
            seed_fixtures: parse_or(&var, "SEED_FIXTURES", false)?,
            session_backend,
            session_secret,
            session_cookie_name: var("SESSION_COOKIE_NAME").unwrap_or_else(|| "session".to_string()),
            cookie_secure: parse_or(&var, "COOKIE_SECURE", !cfg!(debug_assertions))?,
            password_cost,
            request_timeout: Duration::from_secs(parse_or(&var, "REQUEST_TIMEOUT_SECS", 30)?),
            frontend_origins,
        })
    }

    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig {
            session_cookie_name: self.session_cookie_name.clone(),
            session_secret: self.session_secret,
            cookie_secure: self.cookie_secure,
            ..AuthConfig::default()
        }
    }

    pub fn hokku_config(&self) -> HokkuConfig {
        HokkuConfig {
            password_cost: self.password_cost,
            ..HokkuConfig::default()
        }
    }
}

fn parse_or<T, F>(var: &F, key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value `{}`", key, raw)),
        None => Ok(default),
    }
}

fn decode_secret(encoded: &str) -> anyhow::Result<[u8; KEY_LEN]> {
    let bytes = general_purpose::STANDARD
        .decode(encoded.trim())
        .context("SESSION_SECRET must be base64")?;
    bytes
        .try_into()
        .map_err(|_| anyhow::anyhow!("SESSION_SECRET must decode to {} bytes", KEY_LEN))
}
