//! Shared constants and invariants

pub const METRIC_NAME_PREFIX: &str = "gitlab_access_tokens";

/// Path the exposition is served on. Also the `endpoint` label value of the
/// request duration and error metrics.
pub const METRICS_ENDPOINT: &str = "/metrics";

pub const DEFAULT_LISTEN_ADDRESS: &str = "0.0.0.0:9960";
pub const DEFAULT_ENV_FILE: &str = "token.env";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 300;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

// Process environment keys
pub const ENV_GITLAB_API_URL: &str = "GITLAB_API_URL";
pub const ENV_PRIVATE_TOKEN: &str = "PRIVATE_TOKEN";
pub const ENV_USER_ID: &str = "USER_ID";

pub const PRIVATE_TOKEN_HEADER: &str = "PRIVATE-TOKEN";
pub const USER_ID_QUERY_PARAM: &str = "user_id";

pub const GREETING_HTML: &str = "<h1>Hello, Prometheus!</h1>";
