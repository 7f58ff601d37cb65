//! curl Latency Tester
//!
//! Repeatedly probes a target URL with an external `curl` process, collects the
//! per-request timing breakdown (DNS lookup, TCP connect, TLS handshake, server
//! processing, total) and reports it as a table, a grouped bar chart and CSV.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod output;
pub mod probe;
pub mod report;
pub mod sampler;
pub mod stats;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use models::{Config, ProbeReading, ResultTable, SampleSet};
pub use probe::{CurlProbe, ProbeRunner};
pub use report::{render_chart, to_table, ChartSpec};
pub use sampler::{NoopProgress, ProgressSink, Sampler};
pub use stats::{summarize, MetricSummary};
pub use types::Metric;

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Default configuration values
pub mod defaults {
    pub const DEFAULT_TARGET_URL: &str = "https://example.com";
    pub const DEFAULT_NUM_REQUESTS: u32 = 5;
    pub const DEFAULT_DELAY_SECONDS: f64 = 1.0;
    pub const MIN_DELAY_SECONDS: f64 = 0.1;
    pub const MAX_DELAY_SECONDS: f64 = 3600.0;
    pub const MAX_NUM_REQUESTS: u32 = 1000;
    pub const DEFAULT_PROBE_COMMAND: &str = "curl";
    pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 30;
    pub const DEFAULT_OUTPUT_FILE: &str = "metrics.csv";
    pub const DEFAULT_ENABLE_COLOR: bool = true;
}
