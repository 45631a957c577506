//! # GitLab Access Token Exporter
//!
//! Periodically polls the GitLab access token API and publishes the
//! creation and expiry date of every token as Prometheus gauges, next to
//! request duration and error counters for the API itself.
//!
//! Modules:
//! - `config` — env file loading and exporter settings
//! - `sources` — the GitLab token list fetcher
//! - `parser` — field extraction and record-to-gauge translation
//! - `poller` — the timed poll loop
//! - `observability` — metric registry and the `/metrics` route
//! - `server` — HTTP server for scrapes

pub mod config;
pub mod sources;
pub mod parser;
pub mod poller;
#[cfg(test)]
pub mod tests;
pub mod observability;
pub mod server;
pub mod helpers;
pub mod utils;


pub use crate::observability::metrics::ExporterMetrics;
pub use crate::parser::translator::translate;
