use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::services::{
    cache::{CacheClient, CacheError},
    session::store::{SessionHandle, SessionStore},
};

/// Persisted session record, as written by the login flow.
///
/// Only the fields the auth core reads are modelled; anything else is ignored.
#[derive(Debug, Deserialize)]
struct SessionRecord {
    #[serde(rename = "userId")]
    user_id: Option<Uuid>,
    // Absolute expiry in epoch milliseconds.
    #[serde(rename = "_expire")]
    expire: Option<i64>,
}

impl SessionRecord {
    fn principal_at(&self, now: DateTime<Utc>) -> Option<Uuid> {
        match self.expire {
            Some(expire) if expire <= now.timestamp_millis() => None,
            _ => self.user_id,
        }
    }
}

/// Cache-backed session store (Valkey in production).
#[derive(Clone)]
pub struct CacheSessionStore<C: CacheClient> {
    cache: Arc<C>,
    // Key prefix shared with the login flow, e.g. `koa:sess:`
    prefix: String,
}

impl<C: CacheClient> CacheSessionStore<C> {
    pub fn new(cache: Arc<C>, prefix: impl Into<String>) -> Self {
        Self {
            cache,
            prefix: prefix.into(),
        }
    }

    pub fn key(&self, handle: &SessionHandle) -> String {
        format!("{}{}", self.prefix, handle.as_str())
    }
}

#[async_trait]
impl<C: CacheClient> SessionStore for CacheSessionStore<C> {
    async fn get_session_principal(
        &self,
        handle: &SessionHandle,
    ) -> Result<Option<Uuid>, CacheError> {
        let Some(raw) = self.cache.get_string(&self.key(handle)).await? else {
            return Ok(None);
        };

        // A record we cannot read is treated like a missing one.
        let record: SessionRecord = match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(err) => {
                tracing::debug!(
                    backend = self.cache.backend_name(),
                    error = %err,
                    "unreadable session record"
                );
                return Ok(None);
            }
        };

        Ok(record.principal_at(Utc::now()))
    }

    async fn clear_session(&self, handle: &SessionHandle) -> Result<(), CacheError> {
        let removed = self.cache.del(&self.key(handle)).await?;
        tracing::debug!(
            backend = self.cache.backend_name(),
            removed,
            "session record cleared"
        );
        Ok(())
    }
}
