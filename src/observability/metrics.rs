use anyhow::Result;
use prometheus::proto::MetricFamily;
use prometheus::{GaugeVec, HistogramOpts, HistogramTimer, HistogramVec, IntCounterVec, Opts, Registry};
use tracing::info;

use crate::utils::constants::METRIC_NAME_PREFIX;

/// Instruments published by the exporter.
///
/// Built once at startup and shared as `Arc<ExporterMetrics>` between the
/// poller and the HTTP server. Token gauges are keyed by token name and are
/// never removed, so a token deleted upstream keeps its last value until restart.
#[derive(Clone)]
pub struct ExporterMetrics {
    pub registry: Registry,

    // API metrics
    pub request_duration: HistogramVec,
    pub api_errors: IntCounterVec,

    // Token metrics
    pub creation_date: GaugeVec,
    pub expiry_date: GaugeVec,
}

impl ExporterMetrics {
    pub fn new() -> Result<Self> {
        info!("Initializing Metrics ...");
        let registry = Registry::new();

        let metrics = Self {
            request_duration: HistogramVec::new(HistogramOpts::new(format!("{METRIC_NAME_PREFIX}_request_duration_seconds"), "Duration of GitLab API requests"),&["endpoint"],)?,
            api_errors: IntCounterVec::new(Opts::new(format!("{METRIC_NAME_PREFIX}_api_errors_total"), "Total number of errors when making GitLab API requests"),&["endpoint"],)?,

            creation_date: GaugeVec::new(Opts::new(format!("{METRIC_NAME_PREFIX}_creation_date_seconds"), "Creation date of GitLab token in seconds since epoch"),&["token_id"],)?,
            expiry_date: GaugeVec::new(Opts::new(format!("{METRIC_NAME_PREFIX}_expiry_date_seconds"), "Expiry date of GitLab token in seconds since epoch"),&["token_id"],)?,

            registry,
        };

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.request_duration.clone()))?;
        reg.register(Box::new(metrics.api_errors.clone()))?;
        reg.register(Box::new(metrics.creation_date.clone()))?;
        reg.register(Box::new(metrics.expiry_date.clone()))?;

        Ok(metrics)
    }

    pub fn observe_duration(&self, endpoint: &str, seconds: f64) {
        self.request_duration.with_label_values(&[endpoint]).observe(seconds);
    }

    /// Timer that records into the duration histogram when dropped.
    pub fn start_request_timer(&self, endpoint: &str) -> HistogramTimer {
        self.request_duration.with_label_values(&[endpoint]).start_timer()
    }

    pub fn increment_error(&self, endpoint: &str) {
        self.api_errors.with_label_values(&[endpoint]).inc();
    }

    pub fn set_creation_date(&self, token_name: &str, epoch_seconds: f64) {
        self.creation_date.with_label_values(&[token_name]).set(epoch_seconds);
    }

    pub fn set_expiry_date(&self, token_name: &str, epoch_seconds: f64) {
        self.expiry_date.with_label_values(&[token_name]).set(epoch_seconds);
    }

    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn registers_all_instruments_with_exact_names() -> Result<()> {
        let metrics = ExporterMetrics::new()?;
        metrics.observe_duration("/metrics", 0.2);
        metrics.increment_error("/metrics");
        metrics.set_creation_date("tok", 1.0);
        metrics.set_expiry_date("tok", 2.0);

        let text = exposition(&metrics);
        let mut names: Vec<&str> = text
            .lines()
            .filter_map(|line| line.strip_prefix("# TYPE "))
            .filter_map(|line| line.split_whitespace().next())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "gitlab_access_tokens_api_errors_total",
                "gitlab_access_tokens_creation_date_seconds",
                "gitlab_access_tokens_expiry_date_seconds",
                "gitlab_access_tokens_request_duration_seconds",
            ]
        );
        Ok(())
    }

    #[test]
    fn gauges_overwrite_and_counters_accumulate() -> Result<()> {
        let metrics = ExporterMetrics::new()?;
        metrics.set_expiry_date("tok", 10.0);
        metrics.set_expiry_date("tok", 20.5);
        metrics.increment_error("/metrics");
        metrics.increment_error("/metrics");

        assert_eq!(sample_value(&metrics, "gitlab_access_tokens_expiry_date_seconds", "token_id", "tok"), Some(20.5));
        assert_eq!(error_count(&metrics, "/metrics"), 2);
        Ok(())
    }

    #[test]
    fn dropped_timer_records_one_observation() -> Result<()> {
        let metrics = ExporterMetrics::new()?;
        {
            let _timer = metrics.start_request_timer("/metrics");
        }
        assert_eq!(histogram_count(&metrics, "/metrics"), 1);
        Ok(())
    }

    #[test]
    fn registries_are_independent() -> Result<()> {
        let first = ExporterMetrics::new()?;
        let second = ExporterMetrics::new()?;
        first.set_creation_date("only-first", 1.0);
        assert!(sample_value(&second, "gitlab_access_tokens_creation_date_seconds", "token_id", "only-first").is_none());
        Ok(())
    }
}
