//! HTTP control surface for the product launcher.

mod error;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use serde_json::json;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::orchestrator::{Activation, Orchestrator, OrchestratorError, ProductStatus, StatusReport};

pub use error::ApiError;

/// Shared state for the HTTP handlers.
pub struct AppState {
    orchestrator: Orchestrator,
    /// Serializes start/stop so two switches cannot interleave. The guard
    /// travels into the blocking task, so it is held until the runtime work
    /// finishes even if the client goes away.
    switch_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self {
            orchestrator,
            switch_lock: Arc::new(Mutex::new(())),
        }
    }
}

/// Run a blocking orchestrator call on the blocking pool.
async fn blocking<T, F>(state: &AppState, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&Orchestrator) -> Result<T, OrchestratorError> + Send + 'static,
{
    let orchestrator = state.orchestrator.clone();
    let result = tokio::task::spawn_blocking(move || f(&orchestrator)).await?;
    result.map_err(ApiError::from)
}

/// Like [`blocking`], but holds the switch lock for the whole call.
async fn switching<T, F>(state: &AppState, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&Orchestrator) -> Result<T, OrchestratorError> + Send + 'static,
{
    let guard = state.switch_lock.clone().lock_owned().await;
    let orchestrator = state.orchestrator.clone();
    let result = tokio::task::spawn_blocking(move || {
        let _guard = guard;
        f(&orchestrator)
    })
    .await?;
    result.map_err(ApiError::from)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/start/{key}", post(start_handler))
        .route("/stop/{key}", post(stop_handler))
        .route("/status", get(status_all_handler))
        .route("/status/{key}", get(status_handler))
}

/// Build the HTTP router. API routes are served both under `/api` and at
/// the root.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api_routes())
        .merge(api_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until the process receives Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn run_server(state: Arc<AppState>, addr: &str) -> Result<()> {
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("startup API listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown requested");
        })
        .await
        .context("server error")?;

    Ok(())
}

async fn health_handler() -> &'static str {
    "OK"
}

async fn start_handler(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Json<Activation>, ApiError> {
    info!(product = %key, "start requested");
    let activation = switching(&state, move |o| o.activate(&key)).await?;
    Ok(Json(activation))
}

async fn stop_handler(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    info!(product = %key, "stop requested");
    switching(&state, move |o| o.stop(&key)).await?;
    Ok(Json(json!({ "status": "stopped" })))
}

async fn status_handler(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Json<ProductStatus>, ApiError> {
    let status = blocking(&state, move |o| o.status(&key)).await?;
    Ok(Json(status))
}

async fn status_all_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusReport>, ApiError> {
    let report = blocking(&state, |o| Ok(o.status_all())).await?;
    Ok(Json(report))
}
