use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::context;
use crate::error::AppError;
use crate::identity::Resolution;

/// Handler で、現在の request の Resolution を受け取るための extractor
///
/// identity middleware が ambient context に Resolution を書き込み済みである前提。
/// 未解決の場合は配線ミスなので 500 を返す。
pub struct Caller(pub Resolution);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(_parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = context::current()?;
        let resolution = ctx.resolution().cloned().ok_or_else(|| {
            tracing::error!(
                request_context = %ctx.id(),
                "handler ran before identity resolution"
            );
            AppError::Internal
        })?;

        Ok(Caller(resolution))
    }
}
