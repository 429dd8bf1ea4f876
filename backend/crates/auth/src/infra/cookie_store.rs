//! Signed Cookie Session Store
//!
//! Stateless: the whole session travels in the cookie as
//! `base64(json).base64(hmac)`. Nothing is kept server-side, so `destroy`
//! can only clear the cookie.

use std::sync::Arc;

use chrono::Utc;
use http::HeaderMap;
use platform::cookie::extract_cookie;
use platform::crypto::{sign, verify_signed};

use crate::application::config::AuthConfig;
use crate::domain::repository::SessionStore;
use crate::domain::session::Session;
use crate::error::{AuthError, AuthResult};

/// Session store keeping everything in an HMAC-signed cookie
#[derive(Clone)]
pub struct CookieSessionStore {
    config: Arc<AuthConfig>,
}

impl CookieSessionStore {
    pub fn new(config: AuthConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    fn decode(&self, token: &str) -> Option<Session> {
        let Some(payload) = verify_signed(&self.config.session_secret, token) else {
            tracing::warn!("Session cookie failed signature check");
            return None;
        };

        let session: Session = match serde_json::from_slice(&payload) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "Signed session cookie has an unreadable payload");
                return None;
            }
        };

        if session.is_expired(self.config.session_ttl_ms()) {
            tracing::debug!(session_id = %session.id, "Session cookie expired");
            return None;
        }

        Some(session)
    }
}

impl SessionStore for CookieSessionStore {
    async fn load(&self, headers: &HeaderMap) -> AuthResult<Session> {
        let session = extract_cookie(headers, &self.config.session_cookie_name)
            .and_then(|token| self.decode(&token))
            .unwrap_or_default();

        Ok(session)
    }

    async fn save(&self, session: &Session) -> AuthResult<String> {
        let mut stamped = session.clone();
        stamped.issued_at_ms = Utc::now().timestamp_millis();

        let payload = serde_json::to_vec(&stamped)?;
        let token = sign(&self.config.session_secret, &payload)
            .map_err(|e| AuthError::Internal(format!("session signing failed: {}", e)))?;

        Ok(self.config.cookie_config().build_set_cookie(&token))
    }

    async fn destroy(&self, _session: &Session) -> AuthResult<String> {
        Ok(self.config.cookie_config().build_delete_cookie())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{HeaderValue, header};
    use kernel::id::AuthorId;

    fn store() -> CookieSessionStore {
        CookieSessionStore::new(AuthConfig::development())
    }

    /// Turn a Set-Cookie value into the Cookie header a browser would send
    fn request_headers(set_cookie: &str) -> HeaderMap {
        let pair = set_cookie.split(';').next().unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(pair).unwrap());
        headers
    }

    #[tokio::test]
    async fn test_missing_cookie_is_empty_session() {
        let session = store().load(&HeaderMap::new()).await.unwrap();
        assert_eq!(session.author_id(), None);
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let store = store();
        let mut session = Session::new();
        session.set_author_id(AuthorId::new(2));

        let set_cookie = store.save(&session).await.unwrap();
        assert!(set_cookie.starts_with("session="));
        assert!(set_cookie.contains("Max-Age=604800"));
        assert!(set_cookie.contains("HttpOnly"));

        let loaded = store.load(&request_headers(&set_cookie)).await.unwrap();
        assert_eq!(loaded.author_id(), Some(AuthorId::new(2)));
        assert_eq!(loaded.id, session.id);
    }

    #[tokio::test]
    async fn test_other_secret_is_rejected() {
        let mut session = Session::new();
        session.set_author_id(AuthorId::new(1));
        let set_cookie = store().save(&session).await.unwrap();

        let loaded = store().load(&request_headers(&set_cookie)).await.unwrap();
        assert_eq!(loaded.author_id(), None);
    }

    #[tokio::test]
    async fn test_expired_cookie_is_rejected() {
        let mut config = AuthConfig::development();
        config.session_ttl = std::time::Duration::from_secs(60);
        let store = CookieSessionStore::new(config);

        let mut session = Session::new();
        session.set_author_id(AuthorId::new(1));
        session.issued_at_ms -= 120_000;
        let payload = serde_json::to_vec(&session).unwrap();
        let token = sign(&store.config().session_secret, &payload).unwrap();

        let loaded = store
            .load(&request_headers(&format!("session={}", token)))
            .await
            .unwrap();
        assert_eq!(loaded.author_id(), None);
    }

    #[tokio::test]
    async fn test_destroy_clears_cookie() {
        let cookie = store().destroy(&Session::new()).await.unwrap();
        assert!(cookie.starts_with("session=;"));
        assert!(cookie.contains("Max-Age=0"));
    }
}
