use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{error, info};

use crate::observability::metrics::ExporterMetrics;
use crate::parser::translator::translate_records;
use crate::sources::FetchRecords;
use crate::utils::constants::METRICS_ENDPOINT;

/// Drives the poll cycle: fetch, translate, sleep, forever.
pub struct Poller<S> {
    source: S,
    metrics: Arc<ExporterMetrics>,
    interval: Duration,
}

impl<S: FetchRecords> Poller<S> {
    pub fn new(source: S, metrics: Arc<ExporterMetrics>, interval: Duration) -> Self {
        Self { source, metrics, interval }
    }

    /// One fetch and translate pass. Fetch failures are logged and counted,
    /// never returned.
    pub async fn run_cycle(&self) {
        match self.source.fetch_records().await {
            Ok(records) => translate_records(&self.metrics, &records),
            Err(e) => {
                error!(error = ?e, "Error fetching GitLab API data");
                self.metrics.increment_error(METRICS_ENDPOINT);
            }
        }
    }

    /// Runs until the process is stopped. The first cycle starts immediately
    /// and the interval is measured from the end of each cycle.
    pub async fn run(&self) -> Result<()> {
        info!(interval_secs = self.interval.as_secs(), "poller started");
        loop {
            self.run_cycle().await;
            tokio::time::sleep(self.interval).await;
        }
    }
}
