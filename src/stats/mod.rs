//! Per-metric summary statistics over a finished run

use crate::{
    models::SampleSet,
    types::{Metric, PerformanceLevel},
};
use serde::{Deserialize, Serialize};

/// Summary of one metric's millisecond values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub metric: Metric,
    /// Number of values summarized
    pub count: usize,
    pub min_ms: f64,
    pub max_ms: f64,
    pub mean_ms: f64,
    /// 50th percentile (linear interpolation)
    pub median_ms: f64,
    /// 95th percentile (linear interpolation)
    pub p95_ms: f64,
    /// Population standard deviation
    pub std_dev_ms: f64,
}

impl MetricSummary {
    /// Summarize a slice of millisecond values
    pub fn from_values(metric: Metric, values: &[f64]) -> Self {
        let count = values.len();
        if count == 0 {
            return Self::empty(metric);
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mean = values.iter().sum::<f64>() / count as f64;
        let variance = values.iter()
            .map(|x| (x - mean).powi(2))
            .sum::<f64>() / count as f64;

        Self {
            metric,
            count,
            min_ms: sorted[0],
            max_ms: sorted[count - 1],
            mean_ms: mean,
            median_ms: percentile(&sorted, 50.0),
            p95_ms: percentile(&sorted, 95.0),
            std_dev_ms: variance.sqrt(),
        }
    }

    /// Summary of no values
    pub fn empty(metric: Metric) -> Self {
        Self {
            metric,
            count: 0,
            min_ms: 0.0,
            max_ms: 0.0,
            mean_ms: 0.0,
            median_ms: 0.0,
            p95_ms: 0.0,
            std_dev_ms: 0.0,
        }
    }

    /// Performance level of the mean
    pub fn performance_level(&self) -> PerformanceLevel {
        PerformanceLevel::from_millis(self.mean_ms)
    }
}

/// Summarize every metric of a sample set, in [`Metric::ALL`] order
pub fn summarize(samples: &SampleSet) -> Vec<MetricSummary> {
    Metric::ALL
        .iter()
        .map(|&metric| MetricSummary::from_values(metric, samples.values(metric)))
        .collect()
}

/// Percentile of already sorted values
pub fn percentile(sorted_values: &[f64], percentile: f64) -> f64 {
    if sorted_values.is_empty() {
        return 0.0;
    }

    let index = (percentile / 100.0) * (sorted_values.len() as f64 - 1.0);
    let lower_index = index.floor() as usize;
    let upper_index = index.ceil() as usize;

    if lower_index == upper_index {
        sorted_values[lower_index]
    } else {
        let lower_value = sorted_values[lower_index];
        let upper_value = sorted_values[upper_index];
        let weight = index - lower_index as f64;
        lower_value + weight * (upper_value - lower_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProbeReading;

    #[test]
    fn test_percentile_calculation() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile(&values, 50.0), 3.0);
        assert_eq!(percentile(&values, 0.0), 1.0);
        assert_eq!(percentile(&values, 100.0), 5.0);
        assert_eq!(percentile(&values, 25.0), 2.0);
        assert_eq!(percentile(&[], 50.0), 0.0);
    }

    #[test]
    fn test_summary_values() {
        let summary = MetricSummary::from_values(Metric::Total, &[100.0, 200.0, 150.0, 50.0]);
        assert_eq!(summary.count, 4);
        assert_eq!(summary.min_ms, 50.0);
        assert_eq!(summary.max_ms, 200.0);
        assert_eq!(summary.mean_ms, 125.0);
        assert_eq!(summary.median_ms, 125.0);
        assert!((summary.std_dev_ms - 55.9016994).abs() < 1e-6);
        assert_eq!(summary.performance_level(), PerformanceLevel::Moderate);
    }

    #[test]
    fn test_single_value_has_zero_spread() {
        let summary = MetricSummary::from_values(Metric::DnsLookup, &[12.5]);
        assert_eq!(summary.min_ms, 12.5);
        assert_eq!(summary.p95_ms, 12.5);
        assert_eq!(summary.std_dev_ms, 0.0);
    }

    #[test]
    fn test_summarize_sample_set() {
        let samples: SampleSet = vec![
            ProbeReading::from_millis([10.0, 20.0, 30.0, 40.0, 50.0]),
            ProbeReading::from_millis([20.0, 30.0, 40.0, 50.0, 60.0]),
        ]
        .into_iter()
        .collect();

        let summaries = summarize(&samples);
        assert_eq!(summaries.len(), 5);
        assert_eq!(summaries[0].metric, Metric::DnsLookup);
        assert_eq!(summaries[0].mean_ms, 15.0);
        assert_eq!(summaries[4].max_ms, 60.0);
    }

    #[test]
    fn test_empty_sample_set() {
        let summaries = summarize(&SampleSet::new());
        assert!(summaries.iter().all(|s| s.count == 0 && s.mean_ms == 0.0));
    }
}
