use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::Stream;
use tokio::task::JoinHandle;
use tokio::task::futures::TaskLocalFuture;

use super::{ContextError, RequestContext, RequestHead};

tokio::task_local! {
    static CURRENT: Arc<RequestContext>;
}

/// Creates a fresh `RequestContext` for `head` and runs `continuation` with it
/// as the current context. Nested scopes shadow outer ones for their extent.
pub fn enter_scope<F>(
    head: RequestHead,
    continuation: F,
) -> TaskLocalFuture<Arc<RequestContext>, F>
where
    F: Future,
{
    let ctx = Arc::new(RequestContext::new(head));
    tracing::trace!(request_context = %ctx.id(), "entering request scope");
    CURRENT.scope(ctx, continuation)
}

impl RequestContext {
    /// Runs `fut` with this existing context as the current one.
    pub fn scope<F>(self: Arc<Self>, fut: F) -> TaskLocalFuture<Arc<RequestContext>, F>
    where
        F: Future,
    {
        CURRENT.scope(self, fut)
    }
}

/// Returns the context of the innermost active scope on this logical task.
pub fn current() -> Result<Arc<RequestContext>, ContextError> {
    CURRENT
        .try_with(Arc::clone)
        .map_err(|_| ContextError::NoActiveContext)
}

/// Spawns `fut` onto the runtime, carrying the current context into the new task.
///
/// The context stays alive until the spawned task finishes, even if the
/// originating request has already produced its response.
pub fn spawn<F>(fut: F) -> Result<JoinHandle<F::Output>, ContextError>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    let ctx = current()?;
    Ok(tokio::spawn(ctx.scope(fut)))
}

/// Binds a long-lived stream (e.g. subscription events) to the current context.
pub fn scope_stream<S>(inner: S) -> Result<ScopedStream<S>, ContextError>
where
    S: Stream + Unpin,
{
    Ok(ScopedStream {
        ctx: current()?,
        inner,
    })
}

/// Stream adapter that polls its inner stream inside the originating request scope.
pub struct ScopedStream<S> {
    ctx: Arc<RequestContext>,
    inner: S,
}

impl<S> ScopedStream<S> {
    pub fn context(&self) -> &Arc<RequestContext> {
        &self.ctx
    }
}

impl<S> Stream for ScopedStream<S>
where
    S: Stream + Unpin,
{
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        let ctx = Arc::clone(&this.ctx);
        let inner = &mut this.inner;
        CURRENT.sync_scope(ctx, || Pin::new(inner).poll_next(cx))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
