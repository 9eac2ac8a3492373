/*!
 * Request extractors
 *
 * Public API:
 * - Caller: 現在の request の Resolution (ambient context から取得)
 */
mod caller;

pub use caller::Caller;
