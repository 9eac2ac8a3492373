/*!
 * Ambient request context
 *
 * Responsibility:
 * - 現在処理中の request の RequestContext を、引数で引き回さずに参照できるようにする
 * - 並行して処理されている別 request の context は決して見えない
 *
 * tokio の task-local を使うため、関連付けは OS thread ではなく
 * 論理的な実行チェーン (future) に紐づく。
 *
 * Public API:
 * - RequestContext / RequestHead
 * - enter_scope / current / spawn / scope_stream
 */

mod scope;
mod types;

use thiserror::Error;

pub use scope::{ScopedStream, current, enter_scope, scope_stream, spawn};
pub use types::{RequestContext, RequestHead};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ContextError {
    /// `current()` was called outside of any `enter_scope`.
    #[error("no active request context")]
    NoActiveContext,
}
