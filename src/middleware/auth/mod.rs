//! Request scope + identity resolution for the API routes.
//!
//! Layer order (outermost first):
//! 1. `scope` enters the ambient request context and applies its response directives
//! 2. `identity` resolves the caller before any route runs

use axum::{Router, middleware};

use crate::state::AppState;

pub mod identity;
pub mod scope;

/// Apply scope entry and identity resolution to `router`.
///
/// ```ignore
/// let v1 = api::v1::routes();
/// let v1 = middleware::auth::apply(v1, state.clone());
/// app = app.nest("/api/v1", v1);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum: the layer added last runs first, so scope is added after identity.
    router
        .layer(middleware::from_fn_with_state(
            state.clone(),
            identity::identity_middleware,
        ))
        .layer(middleware::from_fn_with_state(state, scope::scope_middleware))
}
