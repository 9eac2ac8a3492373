/*
 * Responsibility
 * - anonymous になった request の session cookie を消す (response 側への指示)
 * - backing の session record も best-effort で削除する
 *
 * Notes
 * - 失敗しても request は anonymous として有効なので、log に残すだけで伝播させない
 * - store の削除は clear_timeout で打ち切る (応答を待たせない)
 */
use std::sync::Arc;
use std::time::Duration;

use crate::context::{self, ContextError, RequestContext};
use crate::services::session::{SessionHandle, SessionStore};

#[derive(Clone)]
pub struct SessionInvalidator {
    sessions: Arc<dyn SessionStore>,
    cookie_name: String,
    clear_timeout: Duration,
}

impl SessionInvalidator {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        cookie_name: impl Into<String>,
        clear_timeout: Duration,
    ) -> Self {
        Self {
            sessions,
            cookie_name: cookie_name.into(),
            clear_timeout,
        }
    }

    /// Idempotent per request: only the first call has any effect.
    pub async fn invalidate(&self, ctx: &RequestContext) {
        if !ctx.request_session_cookie_clear() {
            return;
        }

        let Some(handle) = ctx.head().cookie(&self.cookie_name).and_then(SessionHandle::new)
        else {
            return;
        };

        let clear = self.sessions.clear_session(&handle);
        match tokio::time::timeout(self.clear_timeout, clear).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                tracing::warn!(
                    request_context = %ctx.id(),
                    error = %err,
                    "failed to clear session record"
                );
            }
            Err(_) => {
                tracing::warn!(
                    request_context = %ctx.id(),
                    timeout_ms = self.clear_timeout.as_millis() as u64,
                    "session record clear timed out"
                );
            }
        }
    }

    /// `invalidate` for the request of the current scope.
    pub async fn invalidate_current(&self) -> Result<(), ContextError> {
        let ctx = context::current()?;
        self.invalidate(&ctx).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeSessions, head};
    use uuid::Uuid;

    fn invalidator(sessions: Arc<FakeSessions>) -> SessionInvalidator {
        SessionInvalidator::new(sessions, "koa.sess", Duration::from_secs(3))
    }

    #[tokio::test]
    async fn invalidate_sets_directive_and_clears_record_once() {
        let sessions = Arc::new(FakeSessions::default().with_session("sid", Uuid::new_v4()));
        let invalidator = invalidator(sessions.clone());
        let ctx = RequestContext::new(head(&[("cookie", "koa.sess=sid")]));

        invalidator.invalidate(&ctx).await;
        invalidator.invalidate(&ctx).await;

        assert!(ctx.clears_session_cookie());
        assert_eq!(sessions.clear_calls(), 1);
    }

    #[tokio::test]
    async fn invalidate_without_cookie_only_sets_directive() {
        let sessions = Arc::new(FakeSessions::default());
        let invalidator = invalidator(sessions.clone());
        let ctx = RequestContext::new(head(&[]));

        invalidator.invalidate(&ctx).await;

        assert!(ctx.clears_session_cookie());
        assert_eq!(sessions.clear_calls(), 0);
    }

    #[tokio::test]
    async fn store_failure_is_swallowed() {
        let sessions = Arc::new(FakeSessions::default().failing_clear());
        let invalidator = invalidator(sessions.clone());
        let ctx = RequestContext::new(head(&[("cookie", "koa.sess=sid")]));

        invalidator.invalidate(&ctx).await;

        assert!(ctx.clears_session_cookie());
        assert_eq!(sessions.clear_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_store_does_not_hold_up_the_request() {
        let sessions = Arc::new(FakeSessions::default().hanging_clear());
        let invalidator = invalidator(sessions.clone());
        let ctx = RequestContext::new(head(&[("cookie", "koa.sess=stale")]));

        let finished =
            tokio::time::timeout(Duration::from_secs(600), invalidator.invalidate(&ctx)).await;

        assert!(finished.is_ok());
        assert!(ctx.clears_session_cookie());
        assert_eq!(sessions.clear_calls(), 1);
    }

    #[tokio::test]
    async fn invalidate_current_requires_a_scope() {
        let invalidator = invalidator(Arc::new(FakeSessions::default()));
        assert_eq!(
            invalidator.invalidate_current().await,
            Err(ContextError::NoActiveContext)
        );

        let cleared = context::enter_scope(head(&[]), async {
            invalidator.invalidate_current().await.unwrap();
            context::current().unwrap().clears_session_cookie()
        })
        .await;
        assert!(cleared);
    }
}
