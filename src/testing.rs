//! In-process collaborator doubles shared by the unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::http::{HeaderMap, HeaderValue, Method, Uri};
use uuid::Uuid;

use crate::context::RequestHead;
use crate::identity::Identity;
use crate::repos::{RepoError, UserLookup};
use crate::services::cache::{CacheClient, CacheError, CacheResult};
use crate::services::session::{SessionHandle, SessionStore};

pub fn head(headers: &[(&'static str, &'static str)]) -> RequestHead {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        map.append(*name, HeaderValue::from_static(*value));
    }
    RequestHead::new(Method::POST, Uri::from_static("/api/graphql"), map)
}

#[derive(Default)]
pub struct FakeUsers {
    by_token: HashMap<String, Identity>,
    by_principal: HashMap<Uuid, Identity>,
    fail_credential: bool,
    delay: Option<Duration>,
    yielding: bool,
    credential_calls: AtomicUsize,
    principal_calls: AtomicUsize,
}

impl FakeUsers {
    pub fn with_token(mut self, token: &str, identity: Identity) -> Self {
        self.by_token.insert(token.to_string(), identity);
        self
    }

    pub fn with_principal(mut self, identity: Identity) -> Self {
        self.by_principal.insert(identity.id(), identity);
        self
    }

    pub fn failing_credential(mut self) -> Self {
        self.fail_credential = true;
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn yielding(mut self) -> Self {
        self.yielding = true;
        self
    }

    pub fn credential_calls(&self) -> usize {
        self.credential_calls.load(Ordering::SeqCst)
    }

    pub fn principal_calls(&self) -> usize {
        self.principal_calls.load(Ordering::SeqCst)
    }

    async fn suspend(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.yielding {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl UserLookup for FakeUsers {
    async fn find_by_credential(&self, token: &str) -> Result<Option<Identity>, RepoError> {
        self.credential_calls.fetch_add(1, Ordering::SeqCst);
        self.suspend().await;
        if self.fail_credential {
            return Err(RepoError::Db(sqlx::Error::PoolTimedOut));
        }
        Ok(self.by_token.get(token).cloned())
    }

    async fn find_by_principal(&self, principal: Uuid) -> Result<Option<Identity>, RepoError> {
        self.principal_calls.fetch_add(1, Ordering::SeqCst);
        self.suspend().await;
        Ok(self.by_principal.get(&principal).cloned())
    }
}

#[derive(Default)]
pub struct FakeSessions {
    sessions: HashMap<String, Uuid>,
    fail_get: bool,
    fail_clear: bool,
    hang_clear: bool,
    get_calls: AtomicUsize,
    clear_calls: AtomicUsize,
}

impl FakeSessions {
    pub fn with_session(mut self, sid: &str, principal: Uuid) -> Self {
        self.sessions.insert(sid.to_string(), principal);
        self
    }

    pub fn failing_get(mut self) -> Self {
        self.fail_get = true;
        self
    }

    pub fn failing_clear(mut self) -> Self {
        self.fail_clear = true;
        self
    }

    pub fn hanging_clear(mut self) -> Self {
        self.hang_clear = true;
        self
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn clear_calls(&self) -> usize {
        self.clear_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionStore for FakeSessions {
    async fn get_session_principal(
        &self,
        handle: &SessionHandle,
    ) -> Result<Option<Uuid>, CacheError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_get {
            return Err(CacheError::BackendConnection("connection refused".into()));
        }
        Ok(self.sessions.get(handle.as_str()).copied())
    }

    async fn clear_session(&self, _handle: &SessionHandle) -> Result<(), CacheError> {
        self.clear_calls.fetch_add(1, Ordering::SeqCst);
        if self.hang_clear {
            std::future::pending::<()>().await;
        }
        if self.fail_clear {
            return Err(CacheError::BackendCommand("READONLY".into()));
        }
        Ok(())
    }
}

/// HashMap-backed `CacheClient`.
#[derive(Clone, Default)]
pub struct MemoryCache {
    entries: Arc<Mutex<HashMap<String, String>>>,
    failing: Arc<AtomicBool>,
}

impl MemoryCache {
    pub fn insert(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().unwrap().contains_key(key)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> CacheResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(CacheError::BackendCommand("LOADING".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CacheClient for MemoryCache {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn get_string(&self, key: &str) -> CacheResult<Option<String>> {
        self.check()?;
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn del(&self, key: &str) -> CacheResult<u64> {
        self.check()?;
        Ok(self.entries.lock().unwrap().remove(key).map_or(0, |_| 1))
    }
}
