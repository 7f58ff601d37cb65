//! Parser for the probe's `label: seconds` timing report

use crate::{
    error::{AppError, Result},
    models::ProbeReading,
    types::Metric,
};

/// Separator between label and value on each report line
pub const FIELD_SEPARATOR: &str = ": ";

/// Whether the probe printed anything besides whitespace
pub fn has_output(text: &str) -> bool {
    text.lines().any(|line| !line.trim().is_empty())
}

/// Parse one report line into its metric and value in seconds
pub fn parse_line(line: &str) -> Result<(Metric, f64)> {
    let (label, value) = line.split_once(FIELD_SEPARATOR).ok_or_else(|| {
        AppError::malformed_output(format!("line '{}' has no '{}' separator", line, FIELD_SEPARATOR.trim_end()))
    })?;

    let label = label.trim();
    let metric = Metric::from_probe_label(label)
        .ok_or_else(|| AppError::malformed_output(format!("unknown label '{}'", label)))?;

    let value = value.trim();
    let seconds: f64 = value.parse().map_err(|_| {
        AppError::malformed_output(format!("value '{}' for '{}' is not a decimal number", value, label))
    })?;

    if !seconds.is_finite() || seconds < 0.0 {
        return Err(AppError::malformed_output(format!(
            "value '{}' for '{}' is not a non-negative duration",
            value, label
        )));
    }

    Ok((metric, seconds))
}

/// Parse a full probe report into millisecond values.
///
/// Lines are matched by label, so their order does not matter. Blank lines
/// are skipped; every metric must appear exactly once.
pub fn parse_probe_output(text: &str) -> Result<ProbeReading> {
    let mut seconds: [Option<f64>; 5] = [None; 5];

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let (metric, value) = parse_line(line)?;
        let slot = &mut seconds[metric.index()];
        if slot.is_some() {
            return Err(AppError::malformed_output(format!(
                "label '{}' appears more than once",
                metric.probe_label()
            )));
        }
        *slot = Some(value);
    }

    let missing: Vec<&str> = Metric::ALL
        .iter()
        .filter(|m| seconds[m.index()].is_none())
        .map(|m| m.probe_label())
        .collect();
    if !missing.is_empty() {
        return Err(AppError::malformed_output(format!("missing {}", missing.join(", "))));
    }

    Ok(ProbeReading::from_seconds(seconds.map(|s| s.unwrap_or_default())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SAMPLE: &str = "DNS Lookup Time: 0.010\nTCP Connect Time: 0.020\nSSL Handshake Time: 0.030\nServer Processing Time: 0.040\nTotal Time: 0.050\n";

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "{} != {}", actual, expected);
    }

    #[test]
    fn test_parse_sample_report() {
        let reading = parse_probe_output(SAMPLE).unwrap();
        assert_close(reading.get(Metric::DnsLookup), 10.0);
        assert_close(reading.get(Metric::TcpConnect), 20.0);
        assert_close(reading.get(Metric::SslHandshake), 30.0);
        assert_close(reading.get(Metric::ServerProcessing), 40.0);
        assert_close(reading.get(Metric::Total), 50.0);
    }

    #[test]
    fn test_reordered_lines_match_by_label() {
        let reordered = "Total Time: 0.050\nSSL Handshake Time: 0.030\nDNS Lookup Time: 0.010\n\nServer Processing Time: 0.040\nTCP Connect Time: 0.020";
        assert_eq!(parse_probe_output(reordered).unwrap(), parse_probe_output(SAMPLE).unwrap());
    }

    #[test]
    fn test_crlf_and_padding_tolerated() {
        let windows = SAMPLE.replace('\n', "\r\n");
        assert_eq!(parse_probe_output(&windows).unwrap(), parse_probe_output(SAMPLE).unwrap());
    }

    #[test]
    fn test_missing_separator() {
        let err = parse_line("DNS Lookup Time 0.010").unwrap_err();
        assert!(matches!(err, AppError::MalformedProbeOutput(_)));
        assert!(err.to_string().contains("separator"));
    }

    #[test]
    fn test_value_not_a_number() {
        let err = parse_line("Total Time: fast").unwrap_err();
        assert!(matches!(err, AppError::MalformedProbeOutput(_)));
        assert!(err.to_string().contains("not a decimal number"));
    }

    #[test]
    fn test_negative_and_non_finite_values_rejected() {
        assert!(parse_line("Total Time: -0.5").is_err());
        assert!(parse_line("Total Time: inf").is_err());
        assert!(parse_line("Total Time: NaN").is_err());
    }

    #[test]
    fn test_unknown_label_rejected() {
        let err = parse_line("Redirect Time: 0.000").unwrap_err();
        assert!(err.to_string().contains("unknown label"));
    }

    #[test]
    fn test_split_on_first_separator_only() {
        let err = parse_line("Total Time: 0.1: 0.2").unwrap_err();
        assert!(err.to_string().contains("not a decimal number"));
    }

    #[test]
    fn test_duplicate_label_rejected() {
        let doubled = format!("{}Total Time: 0.060\n", SAMPLE);
        let err = parse_probe_output(&doubled).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_missing_labels_listed() {
        let partial = "DNS Lookup Time: 0.010\nTotal Time: 0.050\n";
        let err = parse_probe_output(partial).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("TCP Connect Time"));
        assert!(message.contains("SSL Handshake Time"));
        assert!(message.contains("Server Processing Time"));
    }

    #[test]
    fn test_has_output() {
        assert!(!has_output(""));
        assert!(!has_output("\n  \n"));
        assert!(has_output("garbage"));
    }

    proptest! {
        #[test]
        fn prop_values_scale_to_millis(secs in prop::array::uniform5(0.0f64..120.0)) {
            let text: String = Metric::ALL
                .iter()
                .map(|m| format!("{}: {}\n", m.probe_label(), secs[m.index()]))
                .collect();
            let reading = parse_probe_output(&text).unwrap();
            for metric in Metric::ALL {
                prop_assert!(reading.get(metric) >= 0.0);
                prop_assert_eq!(reading.get(metric), secs[metric.index()] * 1000.0);
            }
        }

        #[test]
        fn prop_line_order_is_irrelevant(order in Just(Metric::ALL.to_vec()).prop_shuffle()) {
            let text: String = order
                .iter()
                .map(|m| format!("{}: 0.{:03}\n", m.probe_label(), (m.index() + 1) * 7))
                .collect();
            let in_order: String = Metric::ALL
                .iter()
                .map(|m| format!("{}: 0.{:03}\n", m.probe_label(), (m.index() + 1) * 7))
                .collect();
            prop_assert_eq!(parse_probe_output(&text).unwrap(), parse_probe_output(&in_order).unwrap());
        }
    }
}
