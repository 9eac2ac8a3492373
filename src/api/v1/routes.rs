/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - 認証 (scope + identity) は app 側で nest 前に掛ける
 * - 各 handler が自分の RoleRequirement を宣言する
 */
use axum::{Router, routing::get};

use crate::state::AppState;

use crate::api::v1::handlers::{health::health, me::me, users::get_user};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/me", get(me))
        .route("/users/{user_id}", get(get_user))
}
