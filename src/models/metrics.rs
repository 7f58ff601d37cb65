//! Timing sample data models

use crate::error::{AppError, Result};
use crate::types::Metric;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Header of the synthesized request index column
pub const REQUEST_NUMBER_COLUMN: &str = "Request Number";

/// The five millisecond values measured by a single probe invocation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbeReading {
    values: [f64; 5],
}

impl ProbeReading {
    /// Create a reading from millisecond values in [`Metric::ALL`] order
    pub fn from_millis(values: [f64; 5]) -> Self {
        Self { values }
    }

    /// Create a reading from second values in [`Metric::ALL`] order
    pub fn from_seconds(seconds: [f64; 5]) -> Self {
        Self {
            values: seconds.map(|s| s * 1000.0),
        }
    }

    /// Millisecond value for a metric
    pub fn get(&self, metric: Metric) -> f64 {
        self.values[metric.index()]
    }

    /// All values in [`Metric::ALL`] order
    pub fn values(&self) -> &[f64; 5] {
        &self.values
    }
}

/// Per-metric ordered millisecond sequences collected during one run.
///
/// Every sequence always has the same length: readings are appended five
/// values at a time and nothing else mutates the set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSampleSet")]
pub struct SampleSet {
    series: BTreeMap<Metric, Vec<f64>>,
}

/// Unchecked serialized form of a [`SampleSet`]
#[derive(Deserialize)]
struct RawSampleSet {
    series: BTreeMap<Metric, Vec<f64>>,
}

impl TryFrom<RawSampleSet> for SampleSet {
    type Error = AppError;

    fn try_from(raw: RawSampleSet) -> Result<Self> {
        let expected = raw.series.get(&Metric::Total).map_or(0, Vec::len);
        for metric in Metric::ALL {
            let len = raw.series.get(&metric).map(Vec::len).ok_or_else(|| {
                AppError::parse(format!("sample set has no {} series", metric.name()))
            })?;
            if len != expected {
                return Err(AppError::parse(format!(
                    "sample set series differ in length: {} has {}, {} has {}",
                    metric.name(),
                    len,
                    Metric::Total.name(),
                    expected
                )));
            }
        }
        Ok(Self { series: raw.series })
    }
}

impl SampleSet {
    /// Create an empty sample set
    pub fn new() -> Self {
        Self {
            series: Metric::ALL.into_iter().map(|m| (m, Vec::new())).collect(),
        }
    }

    /// Create an empty sample set with room for `capacity` requests
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            series: Metric::ALL
                .into_iter()
                .map(|m| (m, Vec::with_capacity(capacity)))
                .collect(),
        }
    }

    /// Append the reading of the next request
    pub fn push(&mut self, reading: ProbeReading) {
        for metric in Metric::ALL {
            self.series
                .entry(metric)
                .or_default()
                .push(reading.get(metric));
        }
    }

    /// Number of completed requests
    pub fn len(&self) -> usize {
        self.values(Metric::Total).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Millisecond values of one metric in request order
    pub fn values(&self, metric: Metric) -> &[f64] {
        self.series.get(&metric).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Reading of the request at a zero-based position
    pub fn reading(&self, index: usize) -> Option<ProbeReading> {
        if index >= self.len() {
            return None;
        }
        let mut values = [0.0; 5];
        for metric in Metric::ALL {
            values[metric.index()] = *self.values(metric).get(index)?;
        }
        Some(ProbeReading::from_millis(values))
    }

    /// Iterate over readings in request order
    pub fn readings(&self) -> impl Iterator<Item = ProbeReading> + '_ {
        (0..self.len()).filter_map(move |i| self.reading(i))
    }
}

impl Default for SampleSet {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<ProbeReading> for SampleSet {
    fn from_iter<I: IntoIterator<Item = ProbeReading>>(iter: I) -> Self {
        let mut samples = SampleSet::new();
        for reading in iter {
            samples.push(reading);
        }
        samples
    }
}

/// One row of the result table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    /// 1-based request index
    pub request_number: u32,
    /// Millisecond values in [`Metric::ALL`] order
    pub values: [f64; 5],
}

impl TableRow {
    pub fn get(&self, metric: Metric) -> f64 {
        self.values[metric.index()]
    }
}

/// Row-oriented, read-only view of a [`SampleSet`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultTable {
    rows: Vec<TableRow>,
}

impl ResultTable {
    pub(crate) fn from_rows(rows: Vec<TableRow>) -> Self {
        Self { rows }
    }

    /// Column headers: the metric columns followed by "Request Number"
    pub fn columns() -> Vec<&'static str> {
        let mut columns: Vec<&'static str> = Metric::ALL.iter().map(|m| m.column_header()).collect();
        columns.push(REQUEST_NUMBER_COLUMN);
        columns
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
