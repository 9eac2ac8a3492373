/*
 * Responsibility
 * - Config読み込み → 依存生成 (Postgres / Valkey) → Router 組み立て
 * - Middleware の適用 (HTTP / CORS / request scope + identity)
 * - axum::serve() で起動、Ctrl-C で graceful shutdown
 */
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use crate::{
    api,
    config::Config,
    middleware,
    repos::PgUserLookup,
    services::{cache::ValkeyClient, session::CacheSessionStore},
    state::AppState,
};

pub async fn run() -> Result<()> {
    init_tracing();

    let config = Config::from_env()?;

    let db = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(config.lookup_timeout)
        .connect(&config.database_url)
        .await?;
    tracing::info!("connected to the database");

    let cache = ValkeyClient::new(&config.redis_url).await?;
    let sessions = CacheSessionStore::new(Arc::new(cache), config.session_key_prefix.clone());

    let state = AppState::new(&config, Arc::new(PgUserLookup::new(db)), Arc::new(sessions));
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "gateway listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let v1 = middleware::auth::apply(api::v1::routes(), state.clone());

    let app = Router::new().nest("/api/v1", v1).with_state(state);
    let app = middleware::cors::apply(app, config);
    middleware::http::apply(app, config)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A subscriber may already be installed (tests, embedding).
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
