//! Run server implementation

use std::sync::Arc;

use anyhow::Result;
use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::handlers;
use crate::seed;
use crate::service::RunService;
use crate::store::SqliteRunStore;

/// Shared application state
pub struct AppState {
    pub runs: RunService,
}

/// Builds the `/api/runs` router over `runs`.
pub fn router(runs: RunService) -> Router {
    let state = Arc::new(AppState { runs });

    Router::new()
        .route(
            "/api/runs",
            get(handlers::list_runs).post(handlers::create_run),
        )
        .route(
            "/api/runs/{id}",
            get(handlers::get_run)
                .put(handlers::update_run)
                .delete(handlers::delete_run),
        )
        .route(
            "/api/runs/location/{location}",
            get(handlers::list_runs_by_location),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run server
pub struct RunServer;

impl RunServer {
    /// Open the database, seed it if configured, and serve until Ctrl+C
    pub async fn start(config: ServerConfig) -> Result<()> {
        let store = SqliteRunStore::connect(config.database).await?;
        let runs = RunService::new(Arc::new(store));

        if let Some(path) = &config.seed_file {
            let seed = seed::load_seed_file(path).await?;
            seed::seed_if_empty(&runs, seed).await?;
        }

        let listener = TcpListener::bind(config.bind).await?;
        info!("Run server listening on http://{}", listener.local_addr()?);

        axum::serve(listener, router(runs))
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Run server stopped");
        Ok(())
    }

    /// Serve `runs` on an already bound listener until the task is dropped
    pub async fn serve(listener: TcpListener, runs: RunService) -> Result<()> {
        axum::serve(listener, router(runs)).await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}
