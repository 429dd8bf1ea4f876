//! Repository Traits
//!
//! Session persistence. Implementations are in the infrastructure layer.

use http::HeaderMap;

use crate::domain::session::Session;
use crate::error::AuthResult;

/// Session store trait
///
/// `save` and `destroy` return the `Set-Cookie` value the response must carry.
#[trait_variant::make(SessionStore: Send)]
pub trait LocalSessionStore {
    /// Load the session for a request
    ///
    /// A missing, forged or expired cookie yields a fresh empty session.
    async fn load(&self, headers: &HeaderMap) -> AuthResult<Session>;

    /// Persist the session and render its cookie
    async fn save(&self, session: &Session) -> AuthResult<String>;

    /// Forget the session and render a clearing cookie
    async fn destroy(&self, session: &Session) -> AuthResult<String>;
}
