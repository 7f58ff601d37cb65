//! Type definitions and aliases

use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// The five timing metrics reported by the probe, in their fixed order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Metric {
    /// Time until name resolution completed
    DnsLookup,
    /// Time until the TCP connection was established
    TcpConnect,
    /// Time until the TLS handshake completed (0 for plain HTTP)
    SslHandshake,
    /// Time until the first response byte arrived
    ServerProcessing,
    /// Total request time
    Total,
}

impl Metric {
    /// All metrics in table/chart/CSV order
    pub const ALL: [Metric; 5] = [
        Metric::DnsLookup,
        Metric::TcpConnect,
        Metric::SslHandshake,
        Metric::ServerProcessing,
        Metric::Total,
    ];

    /// Position of this metric in [`Metric::ALL`]
    pub fn index(self) -> usize {
        match self {
            Metric::DnsLookup => 0,
            Metric::TcpConnect => 1,
            Metric::SslHandshake => 2,
            Metric::ServerProcessing => 3,
            Metric::Total => 4,
        }
    }

    /// Short display name
    pub fn name(self) -> &'static str {
        match self {
            Metric::DnsLookup => "DNS Lookup",
            Metric::TcpConnect => "TCP Connect",
            Metric::SslHandshake => "SSL Handshake",
            Metric::ServerProcessing => "Server Processing",
            Metric::Total => "Total",
        }
    }

    /// Label the probe prints in front of the value
    pub fn probe_label(self) -> &'static str {
        match self {
            Metric::DnsLookup => "DNS Lookup Time",
            Metric::TcpConnect => "TCP Connect Time",
            Metric::SslHandshake => "SSL Handshake Time",
            Metric::ServerProcessing => "Server Processing Time",
            Metric::Total => "Total Time",
        }
    }

    /// curl `--write-out` variable backing this metric
    pub fn curl_variable(self) -> &'static str {
        match self {
            Metric::DnsLookup => "%{time_namelookup}",
            Metric::TcpConnect => "%{time_connect}",
            Metric::SslHandshake => "%{time_appconnect}",
            Metric::ServerProcessing => "%{time_starttransfer}",
            Metric::Total => "%{time_total}",
        }
    }

    /// Table and CSV column header
    pub fn column_header(self) -> &'static str {
        match self {
            Metric::DnsLookup => "DNS Lookup Time (ms)",
            Metric::TcpConnect => "TCP Connect Time (ms)",
            Metric::SslHandshake => "SSL Handshake Time (ms)",
            Metric::ServerProcessing => "Server Processing Time (ms)",
            Metric::Total => "Total Time (ms)",
        }
    }

    /// Look up a metric by the label the probe printed
    pub fn from_probe_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.probe_label() == label)
    }

    /// Look up a metric by its table/CSV column header
    pub fn from_column_header(header: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.column_header() == header)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Latency classification used for color coding
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PerformanceLevel {
    /// Below 100ms
    Good,
    /// 100ms up to 500ms
    Moderate,
    /// 500ms and above
    Poor,
}

impl PerformanceLevel {
    /// Classify a millisecond value
    pub fn from_millis(ms: f64) -> Self {
        if ms < 100.0 {
            Self::Good
        } else if ms < 500.0 {
            Self::Moderate
        } else {
            Self::Poor
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_order_and_index() {
        for (i, metric) in Metric::ALL.iter().enumerate() {
            assert_eq!(metric.index(), i);
        }
    }

    #[test]
    fn test_label_lookups() {
        assert_eq!(Metric::from_probe_label("TCP Connect Time"), Some(Metric::TcpConnect));
        assert_eq!(Metric::from_probe_label("TCP Connect"), None);
        assert_eq!(Metric::from_column_header("Total Time (ms)"), Some(Metric::Total));
        assert_eq!(Metric::from_column_header("Request Number"), None);
    }

    #[test]
    fn test_performance_level() {
        assert_eq!(PerformanceLevel::from_millis(12.0), PerformanceLevel::Good);
        assert_eq!(PerformanceLevel::from_millis(100.0), PerformanceLevel::Moderate);
        assert_eq!(PerformanceLevel::from_millis(900.0), PerformanceLevel::Poor);
    }
}
