/*
 * Responsibility
 * - GET /users/{user_id}: admin / service のみ
 * - 参照は UserLookup 経由 (users は UUID をそのまま扱う)
 */
use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{
    api::v1::{dto::users::UserResponse, extractors::Caller, guard},
    auth::RoleRequirement,
    error::AppError,
    identity::GrantType,
    state::AppState,
};

fn read_users() -> RoleRequirement {
    RoleRequirement::of([GrantType::Admin, GrantType::Service])
}

pub async fn get_user(
    State(state): State<AppState>,
    Caller(resolution): Caller,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserResponse>, AppError> {
    guard::require(&resolution, &read_users())?;

    let identity = state
        .users
        .find_by_principal(user_id)
        .await?
        .ok_or(AppError::not_found("user"))?;

    Ok(Json(identity.into()))
}
