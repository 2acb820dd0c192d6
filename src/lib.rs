pub(crate) mod api;
pub(crate) mod core;
pub(crate) mod db;
pub(crate) mod repositories;
pub(crate) mod schemas;
pub(crate) mod services;

#[cfg(test)]
mod test_support;

use crate::core::config::{SessionBackend, Settings};
use crate::core::{redis::RedisHandle, state::AppState, telemetry};

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;
    telemetry::init_tracing(&settings)?;
    core::metrics::init(&settings)?;

    let db_pool = db::init_pool(&settings).await?;
    db::run_migrations(&db_pool).await?;

    let redis = RedisHandle::new(settings.redis().redis_url());
    tracing::debug!(backend = settings.session().backend.as_str(), "Selecting session store");
    match settings.session().backend {
        SessionBackend::Redis => {
            redis.connect().await?;
            tracing::info!("Redis connected successfully");
        }
        SessionBackend::Memory => {
            tracing::warn!("Using in-process session store; sessions are lost on restart");
        }
    }

    let state = AppState::new(settings, db_pool, redis.clone());
    let app = api::router::router(state.clone());
    let listener = tokio::net::TcpListener::bind(state.settings().server_addr()).await?;

    tracing::info!(
        host = %state.settings().server_host(),
        port = state.settings().server_port(),
        environment = %state.settings().runtime().environment.as_str(),
        session_store = state.sessions().store().backend_name(),
        session_ttl_seconds = state.sessions().ttl_seconds(),
        score_scale = state.settings().scoring().total_max(),
        "TOEIC exam engine listening"
    );

    let result =
        axum::serve(listener, app).with_graceful_shutdown(core::shutdown::shutdown_signal()).await;

    redis.disconnect().await;
    tracing::info!("Redis disconnected");

    result?;

    Ok(())
}
