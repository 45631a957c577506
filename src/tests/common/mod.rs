// tests/common/mod.rs
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use reqwest::Client;
use tokio::task::JoinHandle;

use crate::config::settings::ExporterConfig;
use crate::observability::metrics::ExporterMetrics;
use crate::sources::GitlabTokenSource;

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}

pub fn test_config(api_url: String) -> Arc<ExporterConfig> {
    Arc::new(ExporterConfig {
        api_url,
        private_token: "glpat-test".into(),
        user_id: "42".into(),
        poll_interval: Duration::from_secs(300),
        request_timeout: Duration::from_secs(2),
        send_user_id: false,
    })
}

pub fn gitlab_source(api_url: String, metrics: Arc<ExporterMetrics>) -> GitlabTokenSource {
    let config = test_config(api_url);
    let client = GitlabTokenSource::build_client(&config).expect("client");
    GitlabTokenSource::new(config, client, metrics)
}
