//! Identity resolution for one request.
//!
//! Strategies run in a fixed order and the first match wins:
//! 1. bearer credential (`Authentication: Bearer <token>`)
//! 2. persisted session (session cookie → session store → user)
//! 3. anonymous, after which the session is invalidated
//!
//! The result is written once into the request's `RequestContext`; later calls
//! return it without touching the collaborators again.

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderName;

use crate::auth::error::{AuthError, LookupError};
use crate::auth::invalidator::SessionInvalidator;
use crate::auth::strategy::{AuthStrategy, BearerStrategy, SessionStrategy, StrategyOutcome};
use crate::context::{self, RequestContext};
use crate::identity::Resolution;
use crate::repos::UserLookup;
use crate::services::session::SessionStore;

/// Knobs for the standard strategy chain.
#[derive(Debug, Clone)]
pub struct ResolverSettings {
    pub auth_header: HeaderName,
    pub session_cookie_name: String,
    pub lookup_timeout: Duration,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            auth_header: HeaderName::from_static("authentication"),
            session_cookie_name: "koa.sess".to_string(),
            lookup_timeout: Duration::from_secs(3),
        }
    }
}

pub struct IdentityResolver {
    strategies: Vec<Arc<dyn AuthStrategy>>,
    invalidator: SessionInvalidator,
    lookup_timeout: Duration,
}

impl IdentityResolver {
    pub fn new(
        strategies: Vec<Arc<dyn AuthStrategy>>,
        invalidator: SessionInvalidator,
        lookup_timeout: Duration,
    ) -> Self {
        Self {
            strategies,
            invalidator,
            lookup_timeout,
        }
    }

    /// Bearer first, then session.
    pub fn standard(
        users: Arc<dyn UserLookup>,
        sessions: Arc<dyn SessionStore>,
        settings: &ResolverSettings,
    ) -> Self {
        let bearer = BearerStrategy::new(settings.auth_header.clone(), users.clone());
        let session =
            SessionStrategy::new(&settings.session_cookie_name, sessions.clone(), users);
        let invalidator = SessionInvalidator::new(
            sessions,
            &settings.session_cookie_name,
            settings.lookup_timeout,
        );

        Self::new(
            vec![Arc::new(bearer), Arc::new(session)],
            invalidator,
            settings.lookup_timeout,
        )
    }

    /// Resolves the identity of `ctx`, at most once per context.
    ///
    /// A lookup failure leaves the context unresolved and is returned to the
    /// caller; it is never turned into `Anonymous`.
    pub async fn resolve<'c>(
        &self,
        ctx: &'c RequestContext,
    ) -> Result<&'c Resolution, AuthError> {
        ctx.resolution_cell()
            .get_or_try_init(|| self.run_strategies(ctx))
            .await
    }

    /// `resolve` for the request of the current scope.
    pub async fn resolve_current(&self) -> Result<Resolution, AuthError> {
        let ctx = context::current()?;
        let resolution = self.resolve(&ctx).await?;
        Ok(resolution.clone())
    }

    async fn run_strategies(&self, ctx: &RequestContext) -> Result<Resolution, AuthError> {
        for strategy in &self.strategies {
            let attempt = tokio::time::timeout(self.lookup_timeout, strategy.attempt(ctx.head()));
            let outcome = match attempt.await {
                Ok(outcome) => outcome,
                Err(_) => Err(LookupError::Timeout(self.lookup_timeout)),
            };

            match outcome {
                Ok(StrategyOutcome::Matched(identity)) => {
                    tracing::debug!(
                        request_context = %ctx.id(),
                        strategy = strategy.name(),
                        user_id = %identity.id(),
                        grant_type = %identity.grant_type(),
                        "identity resolved"
                    );
                    return Ok(Resolution::Authenticated {
                        identity,
                        source: strategy.source(),
                    });
                }
                Ok(StrategyOutcome::NoMatch) => {
                    tracing::debug!(
                        request_context = %ctx.id(),
                        strategy = strategy.name(),
                        "no match"
                    );
                }
                Err(source) => {
                    tracing::warn!(
                        request_context = %ctx.id(),
                        strategy = strategy.name(),
                        error = %source,
                        "identity lookup failed"
                    );
                    return Err(AuthError::LookupFailure {
                        strategy: strategy.name(),
                        source,
                    });
                }
            }
        }

        tracing::info!(
            request_context = %ctx.id(),
            "no credential resolved; continuing as anonymous"
        );
        self.invalidator.invalidate(ctx).await;
        Ok(Resolution::Anonymous)
    }
}
