use std::sync::Arc;

use crate::observability::metrics::ExporterMetrics;
use crate::server::server::AppState;
use crate::utils::constants::METRICS_ENDPOINT;
use axum::routing::get;
use axum::{extract::State, response::IntoResponse, Router};
use http::{header::CONTENT_TYPE, StatusCode};
use prometheus::{Encoder, TextEncoder};
use tracing::error;

#[derive(Clone)]
pub struct MetricsState {
    pub metrics: Arc<ExporterMetrics>,
}

impl MetricsState {
    pub fn new (metrics: Arc<ExporterMetrics>) -> Self {
        Self { metrics }
    }

    pub fn router(&self) -> Router<AppState> {
        Router::new().route(METRICS_ENDPOINT, get(get_metrics))
    }
}

async fn get_metrics(State(state): State<AppState>) -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = state.metrics_state.metrics.gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!(error = %e, "failed to encode metrics");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(CONTENT_TYPE, "text/plain; charset=utf-8")],
            Vec::new(),
        );
    }

    (
        StatusCode::OK,
        [(CONTENT_TYPE, "text/plain; version=0.0.4")],
        buffer,
    )
}
