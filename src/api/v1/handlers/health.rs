/*
 * Responsibility
 * - GET /health (疎通用, RoleRequirement なし)
 * - identity 解決を通った後に呼ばれるので、anonymous かどうかも返す
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::api::v1::extractors::Caller;

pub async fn health(Caller(resolution): Caller) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "authenticated": !resolution.is_anonymous(),
        })),
    )
}
