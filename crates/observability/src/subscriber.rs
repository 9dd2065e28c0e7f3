//! Tracing subscriber initialization.
//!
//! The filter comes from `BILLCAT_LOG`, then `RUST_LOG`, then defaults to
//! `info`. Output is JSON unless `BILLCAT_LOG_FORMAT=pretty`.

use std::env;

use tracing_subscriber::EnvFilter;

pub const FILTER_VAR: &str = "BILLCAT_LOG";
pub const FORMAT_VAR: &str = "BILLCAT_LOG_FORMAT";

const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per event, with timestamps.
    #[default]
    Json,
    /// Human-readable multi-line output.
    Pretty,
}

impl LogFormat {
    /// Unknown values fall back to JSON.
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("pretty") => LogFormat::Pretty,
            _ => LogFormat::Json,
        }
    }
}

/// First non-blank directive among the candidates, else `info`.
pub fn filter_directive(billcat_log: Option<String>, rust_log: Option<String>) -> String {
    [billcat_log, rust_log]
        .into_iter()
        .flatten()
        .find(|d| !d.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    let directive = filter_directive(env::var(FILTER_VAR).ok(), env::var("RUST_LOG").ok());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let format = LogFormat::from_env_value(env::var(FORMAT_VAR).ok().as_deref());

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    let installed = match format {
        LogFormat::Json => builder
            .json()
            .with_timer(tracing_subscriber::fmt::time::SystemTime)
            .try_init()
            .is_ok(),
        LogFormat::Pretty => builder.pretty().try_init().is_ok(),
    };

    if installed {
        tracing::debug!(filter = %directive, ?format, "tracing initialized");
    }
}
