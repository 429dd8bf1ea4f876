//! In-Memory Session Store
//!
//! Server-side sessions keyed by id. The cookie only carries the signed id,
//! so `destroy` revokes the session even if the client keeps the cookie.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use http::HeaderMap;
use platform::cookie::extract_cookie;
use platform::crypto::{sign, verify_signed};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::domain::repository::SessionStore;
use crate::domain::session::Session;
use crate::error::{AuthError, AuthResult};

/// Session store backed by a process-local map
#[derive(Clone)]
pub struct MemorySessionStore {
    config: Arc<AuthConfig>,
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl MemorySessionStore {
    pub fn new(config: AuthConfig) -> Self {
        Self {
            config: Arc::new(config),
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of live sessions
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Clean up expired sessions
    pub async fn purge_expired(&self) -> usize {
        let ttl_ms = self.config.session_ttl_ms();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(ttl_ms));
        let deleted = before - sessions.len();

        tracing::info!(sessions_deleted = deleted, "Cleaned up expired sessions");

        deleted
    }

    fn session_id(&self, token: &str) -> Option<Uuid> {
        let Some(payload) = verify_signed(&self.config.session_secret, token) else {
            tracing::warn!("Session cookie failed signature check");
            return None;
        };
        let raw = String::from_utf8(payload).ok()?;
        raw.parse().ok()
    }
}

impl SessionStore for MemorySessionStore {
    async fn load(&self, headers: &HeaderMap) -> AuthResult<Session> {
        let Some(id) = extract_cookie(headers, &self.config.session_cookie_name)
            .and_then(|token| self.session_id(&token))
        else {
            return Ok(Session::new());
        };

        let ttl_ms = self.config.session_ttl_ms();
        let mut sessions = self.sessions.write().await;

        match sessions.get(&id) {
            Some(session) if !session.is_expired(ttl_ms) => return Ok(session.clone()),
            Some(_) => {}
            None => return Ok(Session::new()),
        }

        sessions.remove(&id);
        tracing::debug!(session_id = %id, "Session expired");
        Ok(Session::new())
    }

    async fn save(&self, session: &Session) -> AuthResult<String> {
        let mut stamped = session.clone();
        stamped.issued_at_ms = Utc::now().timestamp_millis();

        self.sessions.write().await.insert(stamped.id, stamped);

        let token = sign(&self.config.session_secret, session.id.to_string().as_bytes())
            .map_err(|e| AuthError::Internal(format!("session signing failed: {}", e)))?;
        Ok(self.config.cookie_config().build_set_cookie(&token))
    }

    async fn destroy(&self, session: &Session) -> AuthResult<String> {
        self.sessions.write().await.remove(&session.id);
        Ok(self.config.cookie_config().build_delete_cookie())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{HeaderValue, header};
    use kernel::id::AuthorId;

    fn request_headers(set_cookie: &str) -> HeaderMap {
        let pair = set_cookie.split(';').next().unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(pair).unwrap());
        headers
    }

    #[tokio::test]
    async fn test_save_load_destroy() {
        let store = MemorySessionStore::new(AuthConfig::development());
        let mut session = Session::new();
        session.set_author_id(AuthorId::new(5));

        let set_cookie = store.save(&session).await.unwrap();
        assert_eq!(store.len().await, 1);

        let headers = request_headers(&set_cookie);
        let loaded = store.load(&headers).await.unwrap();
        assert_eq!(loaded.author_id(), Some(AuthorId::new(5)));

        store.destroy(&loaded).await.unwrap();
        assert!(store.is_empty().await);

        // The old cookie no longer resolves
        let after = store.load(&headers).await.unwrap();
        assert_eq!(after.author_id(), None);
    }

    #[tokio::test]
    async fn test_unsigned_id_is_ignored() {
        let store = MemorySessionStore::new(AuthConfig::development());
        let session = Session::new();
        store.save(&session).await.unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("session={}", session.id)).unwrap(),
        );
        let loaded = store.load(&headers).await.unwrap();
        assert_ne!(loaded.id, session.id);
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let mut config = AuthConfig::development();
        config.session_ttl = std::time::Duration::from_secs(60);
        let store = MemorySessionStore::new(config);

        store.save(&Session::new()).await.unwrap();
        let stale = Session::new();
        store.save(&stale).await.unwrap();
        store
            .sessions
            .write()
            .await
            .entry(stale.id)
            .and_modify(|s| s.issued_at_ms -= 120_000);

        assert_eq!(store.purge_expired().await, 1);
        assert_eq!(store.len().await, 1);
    }
}
