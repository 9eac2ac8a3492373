//! Identity resolution stage.
//!
//! Runs once per request, before routing, inside the request scope. A lookup
//! failure stops the request here; "no credential" continues as anonymous.

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};

use crate::error::AppError;
use crate::state::AppState;

pub async fn identity_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let resolution = state.resolver.resolve_current().await?;

    tracing::debug!(
        anonymous = resolution.is_anonymous(),
        source = ?resolution.source(),
        "request identity ready"
    );

    Ok(next.run(req).await)
}
