/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - resolver: IdentityResolver, users: UserLookup, session_cookie: SessionCookieConfig
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::auth::IdentityResolver;
use crate::config::Config;
use crate::repos::UserLookup;
use crate::services::session::{SessionCookieConfig, SessionStore};

#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<IdentityResolver>,
    pub users: Arc<dyn UserLookup>,
    pub session_cookie: Arc<SessionCookieConfig>,
}

impl AppState {
    pub fn new(
        config: &Config,
        users: Arc<dyn UserLookup>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        let resolver =
            IdentityResolver::standard(users.clone(), sessions, &config.resolver_settings());

        Self {
            resolver: Arc::new(resolver),
            users,
            session_cookie: Arc::new(config.session_cookie()),
        }
    }
}
