use std::fmt;

use async_trait::async_trait;
use uuid::Uuid;

use crate::services::cache::CacheError;

/// Opaque session id taken from the session cookie.
///
/// `Debug` is redacted so the id never ends up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionHandle(String);

impl SessionHandle {
    /// Empty cookie values are not a session.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionHandle(..)")
    }
}

/// Session store as seen by the auth core: read the principal, drop the record.
///
/// - `Ok(None)`: no live session (missing, expired, or not bound to a user)
/// - `Err(_)`: backend failure
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get_session_principal(
        &self,
        handle: &SessionHandle,
    ) -> Result<Option<Uuid>, CacheError>;

    async fn clear_session(&self, handle: &SessionHandle) -> Result<(), CacheError>;
}
