//! Authentication strategies tried in order by the identity resolver.
//!
//! A strategy that finds no credential of its kind answers `NoMatch`; only a
//! failing collaborator produces an error.

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::HeaderName;

use crate::auth::error::LookupError;
use crate::context::RequestHead;
use crate::identity::{AuthSource, Identity};
use crate::repos::UserLookup;
use crate::services::session::{SessionHandle, SessionStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrategyOutcome {
    Matched(Identity),
    NoMatch,
}

impl From<Option<Identity>> for StrategyOutcome {
    fn from(found: Option<Identity>) -> Self {
        found.map_or(StrategyOutcome::NoMatch, StrategyOutcome::Matched)
    }
}

#[async_trait]
pub trait AuthStrategy: Send + Sync {
    /// Short name used in logs and errors.
    fn name(&self) -> &'static str;

    fn source(&self) -> AuthSource;

    async fn attempt(&self, head: &RequestHead) -> Result<StrategyOutcome, LookupError>;
}

/// Extracts the token from `Bearer <token>`. Anything else is not a bearer credential.
pub fn parse_bearer(value: &str) -> Option<&str> {
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

/// `Authentication: Bearer <api key>` → user lookup by credential.
pub struct BearerStrategy {
    header: HeaderName,
    users: Arc<dyn UserLookup>,
}

impl BearerStrategy {
    pub fn new(header: HeaderName, users: Arc<dyn UserLookup>) -> Self {
        Self { header, users }
    }
}

#[async_trait]
impl AuthStrategy for BearerStrategy {
    fn name(&self) -> &'static str {
        "bearer"
    }

    fn source(&self) -> AuthSource {
        AuthSource::Bearer
    }

    async fn attempt(&self, head: &RequestHead) -> Result<StrategyOutcome, LookupError> {
        let Some(value) = head.header(self.header.as_str()) else {
            return Ok(StrategyOutcome::NoMatch);
        };

        let Some(token) = parse_bearer(value) else {
            tracing::debug!(header = %self.header, "malformed bearer credential ignored");
            return Ok(StrategyOutcome::NoMatch);
        };

        Ok(self.users.find_by_credential(token).await?.into())
    }
}

/// Session cookie → session store principal → user lookup by principal.
pub struct SessionStrategy {
    cookie_name: String,
    sessions: Arc<dyn SessionStore>,
    users: Arc<dyn UserLookup>,
}

impl SessionStrategy {
    pub fn new(
        cookie_name: impl Into<String>,
        sessions: Arc<dyn SessionStore>,
        users: Arc<dyn UserLookup>,
    ) -> Self {
        Self {
            cookie_name: cookie_name.into(),
            sessions,
            users,
        }
    }
}

#[async_trait]
impl AuthStrategy for SessionStrategy {
    fn name(&self) -> &'static str {
        "session"
    }

    fn source(&self) -> AuthSource {
        AuthSource::Session
    }

    async fn attempt(&self, head: &RequestHead) -> Result<StrategyOutcome, LookupError> {
        let Some(handle) = head.cookie(&self.cookie_name).and_then(SessionHandle::new) else {
            return Ok(StrategyOutcome::NoMatch);
        };

        let Some(principal) = self.sessions.get_session_principal(&handle).await? else {
            return Ok(StrategyOutcome::NoMatch);
        };

        // The session may outlive the user it points at.
        Ok(self.users.find_by_principal(principal).await?.into())
    }
}
