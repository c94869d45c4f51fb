//! Router construction and the HTTP server loop.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use stockdesk_core::config::ServerConfig;
use stockdesk_core::data::CompanyEntry;
use stockdesk_core::{Pipeline, PipelineError};

use crate::handlers;

#[derive(Debug, Error)]
pub enum ServeError {
    #[error("invalid listen address {addr}: {source}")]
    Address {
        addr: String,
        source: std::net::AddrParseError,
    },

    #[error("cannot seed company directory: {0}")]
    Seed(#[from] PipelineError),

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Shared handler state.
pub struct ApiState {
    pub pipeline: Arc<Pipeline>,
    /// Rows returned by `/data` when the request has no `days`.
    pub default_days: usize,
    /// Shown by `GET /`.
    pub example_symbols: Vec<String>,
}

impl ApiState {
    pub fn new(pipeline: Arc<Pipeline>, default_days: usize, directory: &[CompanyEntry]) -> Self {
        Self {
            pipeline,
            default_days,
            example_symbols: directory.iter().take(4).map(|c| c.symbol.clone()).collect(),
        }
    }
}

pub fn router(state: Arc<ApiState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        .route("/companies", get(handlers::companies))
        .route("/data/:symbol", get(handlers::stock_data))
        .route("/summary/:symbol", get(handlers::summary))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Seed the directory, bind `host:port` and serve until Ctrl-C.
pub async fn serve(
    config: &ServerConfig,
    pipeline: Arc<Pipeline>,
    directory: Vec<CompanyEntry>,
) -> Result<(), ServeError> {
    let addr_str = format!("{}:{}", config.host, config.port);
    let addr: SocketAddr = addr_str.parse().map_err(|source| ServeError::Address {
        addr: addr_str.clone(),
        source,
    })?;

    let seeding = Arc::clone(&pipeline);
    let seed_list = directory.clone();
    tokio::task::spawn_blocking(move || seeding.seed_directory(&seed_list)).await??;

    let state = Arc::new(ApiState::new(pipeline, config.default_days, &directory));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "StockDesk API listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("StockDesk API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "cannot listen for Ctrl-C; shutting down");
    }
    info!("shutdown requested");
}
