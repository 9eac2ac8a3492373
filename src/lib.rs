/*
 * Responsibility
 * - Request authentication / authorization layer in front of the GraphQL engine
 * - module 公開 (binary と tests から使う)
 */
pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod context;
pub mod error;
pub mod identity;
pub mod middleware;
pub mod repos;
pub mod services;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;
