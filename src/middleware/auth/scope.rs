//! Enters the ambient request context for the lifetime of the request.
//!
//! After the inner service returns, directives recorded on the context
//! (session cookie clearing) are applied to the outgoing response.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, Request, header},
    middleware::Next,
    response::Response,
};

use crate::context::{self, RequestHead};
use crate::services::session::SessionCookieConfig;
use crate::state::AppState;

pub async fn scope_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let (parts, body) = req.into_parts();
    let head = RequestHead::from_parts(&parts);
    let req = Request::from_parts(parts, body);

    context::enter_scope(head, async move {
        let mut response = next.run(req).await;

        match context::current() {
            Ok(ctx) if ctx.clears_session_cookie() => {
                clear_session_cookie(&mut response, &state.session_cookie);
            }
            Ok(_) => {}
            Err(err) => tracing::error!(error = %err, "request scope lost before response"),
        }

        response
    })
    .await
}

// Best-effort: an unencodable cookie is logged and skipped.
fn clear_session_cookie(response: &mut Response, config: &SessionCookieConfig) {
    for cookie in config.removal_cookies() {
        match HeaderValue::from_str(&cookie.to_string()) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(err) => {
                tracing::warn!(
                    cookie = cookie.name(),
                    error = %err,
                    "failed to clear session cookie"
                );
            }
        }
    }
}
