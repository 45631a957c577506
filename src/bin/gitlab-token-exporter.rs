use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use gitlab_token_exporter::config::env_file::load_env_file;
use gitlab_token_exporter::config::settings::{ExporterConfig, LogFormat};
use gitlab_token_exporter::poller::poller::Poller;
use gitlab_token_exporter::server;
use gitlab_token_exporter::sources::GitlabTokenSource;
use gitlab_token_exporter::utils::constants::{
    DEFAULT_ENV_FILE, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_LISTEN_ADDRESS, DEFAULT_POLL_INTERVAL_SECS,
};
use gitlab_token_exporter::utils::logging::{self, LogLevel};
use gitlab_token_exporter::ExporterMetrics;
use tracing::{error, info};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// key=value file with GITLAB_API_URL, PRIVATE_TOKEN and USER_ID
    #[arg(long, env = "TOKEN_ENV_FILE", default_value = DEFAULT_ENV_FILE)]
    env_file: PathBuf,
    #[arg(long, env = "LISTEN_ADDRESS", default_value = DEFAULT_LISTEN_ADDRESS)]
    listen: String,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
    #[arg(long, env = "LOG_FORMAT", value_enum)]
    log_format: Option<LogFormat>,
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL_SECS)]
    poll_interval_secs: u64,
    #[arg(long, default_value_t = DEFAULT_HTTP_TIMEOUT_SECS)]
    request_timeout_secs: u64,
    /// also send USER_ID as the `user_id` query parameter
    #[arg(long)]
    send_user_id: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Init logging, then load env file (a missing file is fatal)
    // -------------------------------

    let args = Args::parse();
    logging::init_logging(&logging::resolve(args.log_level, args.log_format));

    if let Err(e) = load_env_file(&args.env_file) {
        error!(error = ?e, "Error loading environment variables");
        return Err(e);
    }

    // -------------------------------
    // 2. Build config, registry and client
    // -------------------------------

    let config = Arc::new(
        ExporterConfig::from_env()
            .with_poll_interval(Duration::from_secs(args.poll_interval_secs))
            .with_request_timeout(Duration::from_secs(args.request_timeout_secs))
            .with_send_user_id(args.send_user_id),
    );
    info!(?config, "exporter configured");

    let metrics = Arc::new(ExporterMetrics::new()?);
    let client = GitlabTokenSource::build_client(&config)?;
    let source = GitlabTokenSource::new(config.clone(), client, metrics.clone());

    // -------------------------------
    // 3. Serve scrapes and poll the API side by side
    // -------------------------------

    let poller = Poller::new(source, metrics.clone(), config.poll_interval);
    let http_server = server::server::start(&args.listen, metrics);

    info!("Service starting...");
    tokio::try_join!(poller.run(), http_server)?;

    Ok(())
}
