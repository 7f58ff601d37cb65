//! Machine-readable run report

use crate::{
    error::Result,
    models::{Config, ResultTable, SampleSet},
    report::{render_chart, to_table, ChartSpec},
    stats::{summarize, MetricSummary},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything a finished run produced, in one serializable document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub generated_at: DateTime<Utc>,
    pub target_url: String,
    pub num_requests: u32,
    pub delay_seconds: f64,
    /// Probe command line, without the target
    pub probe: String,
    /// Path of the CSV file written for this run, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csv_file: Option<String>,
    pub table: ResultTable,
    pub summary: Vec<MetricSummary>,
    pub chart: ChartSpec,
}

impl RunReport {
    pub fn new(config: &Config, probe: String, samples: &SampleSet) -> Self {
        Self {
            generated_at: Utc::now(),
            target_url: config.target_url.clone(),
            num_requests: config.num_requests,
            delay_seconds: config.delay_seconds,
            probe,
            csv_file: None,
            table: to_table(samples),
            summary: summarize(samples),
            chart: render_chart(samples),
        }
    }

    pub fn with_csv_file<S: Into<String>>(mut self, path: Option<S>) -> Self {
        self.csv_file = path.map(Into::into);
        self
    }
}

/// Pretty-printed JSON rendering of a report
pub fn to_json_string(report: &RunReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
