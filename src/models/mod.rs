//! Data models for the curl latency tester

pub mod config;
pub mod metrics;

pub use config::Config;
pub use metrics::{ProbeReading, ResultTable, SampleSet, TableRow, REQUEST_NUMBER_COLUMN};
