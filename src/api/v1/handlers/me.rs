/*
 * Responsibility
 * - GET /me: 認証済みであれば誰でも (RoleRequirement = {})
 */
use axum::Json;

use crate::api::v1::{dto::me::MeResponse, extractors::Caller, guard};
use crate::auth::RoleRequirement;
use crate::error::AppError;

pub async fn me(Caller(resolution): Caller) -> Result<Json<MeResponse>, AppError> {
    let identity = guard::require(&resolution, &RoleRequirement::any_authenticated())?;

    Ok(Json(MeResponse {
        id: identity.id(),
        grant_type: identity.grant_type(),
        source: resolution.source(),
    }))
}
