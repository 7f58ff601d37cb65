//! Aggregation of a finished run into a table and a chart description

use crate::{
    models::{ResultTable, SampleSet, TableRow},
    types::Metric,
};
use serde::{Deserialize, Serialize};

pub const CHART_TITLE: &str = "Request Timing Metrics (in ms)";
pub const CHART_X_LABEL: &str = "Request Number";
pub const CHART_Y_LABEL: &str = "Time (ms)";

/// One bar series of the grouped chart (one per metric)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub metric: Metric,
    pub label: String,
    /// One value per category, in request order
    pub values: Vec<f64>,
}

/// Grouped bar chart: one group per request, one bar per metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Group labels `#1..#N`
    pub categories: Vec<String>,
    pub series: Vec<ChartSeries>,
    pub gridlines: bool,
}

impl ChartSpec {
    /// Largest value across all series, 0 for an empty chart
    pub fn max_value(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .fold(0.0, f64::max)
    }
}

/// Build the row-per-request table of a sample set
pub fn to_table(samples: &SampleSet) -> ResultTable {
    let rows = samples
        .readings()
        .enumerate()
        .map(|(i, reading)| TableRow {
            request_number: i as u32 + 1,
            values: *reading.values(),
        })
        .collect();
    ResultTable::from_rows(rows)
}

/// Build the grouped bar chart description of a sample set
pub fn render_chart(samples: &SampleSet) -> ChartSpec {
    ChartSpec {
        title: CHART_TITLE.to_string(),
        x_label: CHART_X_LABEL.to_string(),
        y_label: CHART_Y_LABEL.to_string(),
        categories: (1..=samples.len()).map(|i| format!("#{}", i)).collect(),
        series: Metric::ALL
            .iter()
            .map(|&metric| ChartSeries {
                metric,
                label: metric.column_header().to_string(),
                values: samples.values(metric).to_vec(),
            })
            .collect(),
        gridlines: true,
    }
}
