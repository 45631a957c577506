//! Fetches the access token list from the GitLab API.

use anyhow::{Context, Error, Result};
use reqwest::Client;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::settings::ExporterConfig;
use crate::observability::metrics::ExporterMetrics;
use crate::parser::record::TokenRecord;
use crate::utils::constants::{METRICS_ENDPOINT, PRIVATE_TOKEN_HEADER, USER_ID_QUERY_PARAM};

pub trait FetchRecords {
    fn fetch_records(&self) -> impl std::future::Future<Output = Result<Vec<TokenRecord>, Error>> + Send;
}

#[derive(Clone)]
pub struct GitlabTokenSource {
    config: Arc<ExporterConfig>,
    client: Client,
    metrics: Arc<ExporterMetrics>,
}

impl GitlabTokenSource {
    pub fn new(config: Arc<ExporterConfig>, client: Client, metrics: Arc<ExporterMetrics>) -> Self {
        Self { config, client, metrics }
    }

    /// Client with the configured request timeout applied to every call.
    pub fn build_client(config: &ExporterConfig) -> Result<Client> {
        Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("failed to build HTTP client")
    }
}

impl FetchRecords for GitlabTokenSource {
    async fn fetch_records(&self) -> Result<Vec<TokenRecord>, Error> {
        // observes on drop, whichever way this returns
        let _timer = self.metrics.start_request_timer(METRICS_ENDPOINT);

        let mut request = self
            .client
            .get(&self.config.api_url)
            .header(PRIVATE_TOKEN_HEADER, &self.config.private_token);
        if self.config.send_user_id {
            request = request.query(&[(USER_ID_QUERY_PARAM, &self.config.user_id)]);
        }

        let response = request
            .send()
            .await
            .context("GitLab API request failed")?
            .error_for_status()
            .context("GitLab API returned an error status")?;

        let body = response.bytes().await.context("failed to read GitLab API response")?;
        let records: Vec<TokenRecord> = serde_json::from_slice(&body)
            .context("GitLab API response is not a JSON array of objects")?;

        info!(records = records.len(), "fetched access tokens");
        debug!(?records, "GitLab API response");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::metrics::test_support::histogram_count;
    use httpmock::Method::GET;
    use httpmock::MockServer;
    use serde_json::json;
    use std::time::Duration;

    fn config(url: String, send_user_id: bool) -> Arc<ExporterConfig> {
        Arc::new(ExporterConfig {
            api_url: url,
            private_token: "glpat-test".into(),
            user_id: "42".into(),
            poll_interval: Duration::from_secs(300),
            request_timeout: Duration::from_secs(5),
            send_user_id,
        })
    }

    fn source(config: Arc<ExporterConfig>, metrics: Arc<ExporterMetrics>) -> GitlabTokenSource {
        let client = GitlabTokenSource::build_client(&config).unwrap();
        GitlabTokenSource::new(config, client, metrics)
    }

    #[tokio::test]
    async fn sends_private_token_header_and_decodes_records() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/v4/personal_access_tokens")
                    .header("PRIVATE-TOKEN", "glpat-test");
                then.status(200).json_body(json!([
                    {"name": "tok1", "created_at": "2024-01-01T00:00:00Z", "expires_at": "2024-06-01"},
                    {"name": "tok2", "created_at": "2024-01-02T00:00:00Z", "expires_at": null}
                ]));
            })
            .await;

        let metrics = Arc::new(ExporterMetrics::new()?);
        let src = source(config(server.url("/api/v4/personal_access_tokens"), false), metrics.clone());
        let records = src.fetch_records().await?;

        mock.assert_async().await;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["name"], "tok1");
        assert_eq!(histogram_count(&metrics, "/metrics"), 1);
        Ok(())
    }

    #[tokio::test]
    async fn user_id_is_only_sent_when_enabled() -> Result<()> {
        let server = MockServer::start_async().await;
        let with_user = server
            .mock_async(|when, then| {
                when.method(GET).path("/tokens").query_param("user_id", "42");
                then.status(200).json_body(json!([]));
            })
            .await;

        let metrics = Arc::new(ExporterMetrics::new()?);
        source(config(server.url("/tokens"), true), metrics.clone()).fetch_records().await?;
        with_user.assert_hits_async(1).await;

        // without the flag the query-param mock must not match again
        let _ = source(config(server.url("/tokens"), false), metrics).fetch_records().await;
        with_user.assert_hits_async(1).await;
        Ok(())
    }

    #[tokio::test]
    async fn non_array_body_is_an_error_and_still_timed() -> Result<()> {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/tokens");
                then.status(200).json_body(json!({"message": "not a list"}));
            })
            .await;

        let metrics = Arc::new(ExporterMetrics::new()?);
        let result = source(config(server.url("/tokens"), false), metrics.clone()).fetch_records().await;

        assert!(result.is_err());
        assert_eq!(histogram_count(&metrics, "/metrics"), 1);
        Ok(())
    }

    #[tokio::test]
    async fn error_status_is_an_error() -> Result<()> {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/tokens");
                then.status(401).json_body(json!({"message": "401 Unauthorized"}));
            })
            .await;

        let metrics = Arc::new(ExporterMetrics::new()?);
        let err = source(config(server.url("/tokens"), false), metrics)
            .fetch_records()
            .await
            .unwrap_err();
        assert!(err.to_string().contains("error status"));
        Ok(())
    }

    #[tokio::test]
    async fn empty_url_fails_without_panicking() -> Result<()> {
        let metrics = Arc::new(ExporterMetrics::new()?);
        let result = source(config(String::new(), false), metrics.clone()).fetch_records().await;

        assert!(result.is_err());
        assert_eq!(histogram_count(&metrics, "/metrics"), 1);
        Ok(())
    }
}
