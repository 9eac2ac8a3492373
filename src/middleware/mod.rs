/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: request scope + identity 解決, cors, http (request id / trace / limit / timeout)
 */
pub mod auth;
pub mod cors;
pub mod http;
