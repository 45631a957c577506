use std::fmt;
use std::time::Duration;

use clap::ValueEnum;
use tracing::warn;

use crate::utils::constants::{
    DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_POLL_INTERVAL_SECS, ENV_GITLAB_API_URL, ENV_PRIVATE_TOKEN,
    ENV_USER_ID,
};

/// ================================
/// Exporter settings
/// ================================
#[derive(Clone)]
pub struct ExporterConfig {
    pub api_url: String,
    pub private_token: String,
    pub user_id: String,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    /// send `user_id` as a query parameter on the token list request
    pub send_user_id: bool,
}

impl ExporterConfig {
    /// Read the upstream API settings from the process environment.
    ///
    /// Missing keys are not fatal, they end up as empty strings in the request.
    pub fn from_env() -> Self {
        Self {
            api_url: env_or_empty(ENV_GITLAB_API_URL),
            private_token: env_or_empty(ENV_PRIVATE_TOKEN),
            user_id: env_or_empty(ENV_USER_ID),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            request_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            send_user_id: false,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn with_send_user_id(mut self, send_user_id: bool) -> Self {
        self.send_user_id = send_user_id;
        self
    }
}

impl fmt::Debug for ExporterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExporterConfig")
            .field("api_url", &self.api_url)
            .field("private_token", &"<redacted>")
            .field("user_id", &self.user_id)
            .field("poll_interval", &self.poll_interval)
            .field("request_timeout", &self.request_timeout)
            .field("send_user_id", &self.send_user_id)
            .finish()
    }
}

fn env_or_empty(key: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| {
        warn!(key, "environment variable is not set, using empty value");
        String::new()
    })
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new (level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Json,
    Compact,
}
