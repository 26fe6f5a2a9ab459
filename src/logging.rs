//! Structured logging for the command-line tools.
//!
//! Environment variables:
//! - LOG_FORMAT=pretty|json (default: pretty)
//! - RUST_LOG=level (default: info)
//!
//! Logs go to stderr so that stdout stays free for normalized output.

use std::io;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("LOG_FORMAT").unwrap_or_default())
    }

    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init() {
    let format = LogFormat::from_env();
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let layer = match format {
        LogFormat::Pretty => fmt::layer()
            .with_writer(io::stderr)
            .with_target(false)
            .compact()
            .with_filter(env_filter)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .with_writer(io::stderr)
            .with_target(true)
            .with_ansi(false)
            .json()
            .flatten_event(true)
            .with_filter(env_filter)
            .boxed(),
    };

    if tracing_subscriber::registry().with(layer).try_init().is_ok() {
        tracing::debug!(log_format = ?format, "logging initialized");
    }
}
