//! Session Entity
//!
//! A per-client key/value bag carried between requests.

use std::collections::BTreeMap;

use chrono::Utc;
use kernel::id::AuthorId;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Key under which login stores the authenticated author
pub const AUTHOR_ID_KEY: &str = "authorId";

/// Session entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Session ID (UUID v4)
    pub id: Uuid,
    /// Stored values
    pub values: BTreeMap<String, Value>,
    /// Issue time (Unix timestamp ms)
    pub issued_at_ms: i64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create an empty, unauthenticated session
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            values: BTreeMap::new(),
            issued_at_ms: Utc::now().timestamp_millis(),
        }
    }

    /// Read a value, `None` when absent or of another type
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.values.get(key)?;
        serde_json::from_value(value.clone()).ok()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The authenticated author, if login succeeded in this session
    pub fn author_id(&self) -> Option<AuthorId> {
        self.get::<i64>(AUTHOR_ID_KEY).map(AuthorId::new)
    }

    /// Mark the session as authenticated
    pub fn set_author_id(&mut self, author_id: AuthorId) {
        self.set(AUTHOR_ID_KEY, author_id.get());
    }

    /// Whether the session is older than `ttl_ms`
    pub fn is_expired(&self, ttl_ms: i64) -> bool {
        Utc::now().timestamp_millis() - self.issued_at_ms > ttl_ms
    }
}
