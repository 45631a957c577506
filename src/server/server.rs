use std::sync::Arc;

use anyhow::{Context, Result};
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use tracing::info;

use crate::observability::metrics::ExporterMetrics;
use crate::observability::routes::MetricsState;
use crate::utils::constants::GREETING_HTML;

#[derive(Clone)]
pub struct AppState {
    pub metrics_state: MetricsState,
}

impl AppState {
    pub fn new(metrics: Arc<ExporterMetrics>) -> Self {
        Self {
            metrics_state: MetricsState::new(metrics),
        }
    }
}

/// `/` greeting plus the metrics exposition.
pub fn router(metrics: Arc<ExporterMetrics>) -> Router {
    let state = AppState::new(metrics);

    Router::new()
        .route("/", get(root))
        .merge(state.metrics_state.router())
        .with_state(state)
}

async fn root() -> Html<&'static str> {
    Html(GREETING_HTML)
}

/// Serve the exporter endpoints until the process stops.
pub async fn start(listen_address: &str, metrics: Arc<ExporterMetrics>) -> Result<()> {
    let app = router(metrics);

    let listener = tokio::net::TcpListener::bind(listen_address)
        .await
        .with_context(|| format!("failed to bind {}", listen_address))?;
    info!("Listening on {}", listen_address);
    axum::serve(listener, app).await.context("HTTP server failed")?;

    Ok(())
}
