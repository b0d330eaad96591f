//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, migrations, cache selection, and the Axum
//! server lifecycle.

use crate::config::Config;
use crate::infrastructure::cache::connect_manager;
use crate::infrastructure::persistence::{
    SqlUserDirectory, StoreOptions, run_migrations, shared_store,
};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::AnyPool;
use sqlx::any::AnyPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Opens the connection pool described by `config`.
///
/// # Errors
///
/// Returns an error if the database is unreachable within the connect timeout.
pub async fn connect_pool(config: &Config) -> Result<AnyPool> {
    sqlx::any::install_default_drivers();

    let pool = AnyPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Some(Duration::from_secs(config.db_idle_timeout)))
        .max_lifetime(Some(Duration::from_secs(config.db_max_lifetime)))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Connected to {} database", config.dialect);
    Ok(pool)
}

/// Builds the store options, connecting to Redis when it is configured.
///
/// A Redis connection failure is not fatal: the store falls back to the local
/// cache.
pub async fn store_options(config: &Config) -> StoreOptions {
    let options =
        StoreOptions::new(config.dialect).with_local_capacity(config.local_cache_capacity);

    let Some(redis_url) = config.redis_url.as_deref() else {
        return options;
    };
    if !config.uses_remote_cache() {
        tracing::info!(
            "Redis configured but CACHE_TTL_SECONDS is {}; using local cache",
            config.cache_ttl_seconds
        );
        return options;
    }

    match connect_manager(redis_url).await {
        Ok(manager) => options.with_remote_cache(manager, config.cache_ttl_seconds),
        Err(e) => {
            tracing::warn!("Failed to connect to Redis: {}. Using local cache.", e);
            options
        }
    }
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Database connection pool
/// - Schema migrations for the configured dialect
/// - Route store with Redis or local cache
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_pool(&config).await?;

    run_migrations(config.dialect, &pool)
        .await
        .context("Failed to migrate")?;

    let options = store_options(&config).await;
    let store = shared_store(pool.clone(), options);
    let users = Arc::new(SqlUserDirectory::new(config.dialect, pool));

    let state = AppState::new(store, users, config.auth_required);

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
