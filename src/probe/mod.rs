//! External HTTP probe invocation
//!
//! Each sample is taken by spawning a curl-compatible client that discards the
//! response body and prints the timing report described by
//! [`WRITE_OUT_FORMAT`]. The [`ProbeRunner`] trait is the seam the sampler
//! depends on, so tests can substitute scripted output.

pub mod parser;

pub use parser::{has_output, parse_line, parse_probe_output};

use crate::error::{AppError, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// curl `--write-out` template producing one `label: seconds` line per metric
pub const WRITE_OUT_FORMAT: &str = "DNS Lookup Time: %{time_namelookup}\n\
TCP Connect Time: %{time_connect}\n\
SSL Handshake Time: %{time_appconnect}\n\
Server Processing Time: %{time_starttransfer}\n\
Total Time: %{time_total}\n";

/// Sink for the discarded response body
#[cfg(windows)]
pub const NULL_DEVICE: &str = "NUL";
#[cfg(not(windows))]
pub const NULL_DEVICE: &str = "/dev/null";

/// Captured result of one probe process
#[derive(Debug, Clone, Default)]
pub struct ProbeOutput {
    /// Standard output as text
    pub stdout: String,
    /// Standard error as text, used only for diagnostics
    pub stderr: String,
    /// Process exit code, if it exited normally
    pub exit_code: Option<i32>,
}

/// Runs one timed request against a URL
#[async_trait]
pub trait ProbeRunner: Send + Sync {
    /// Perform a single request and return the probe's captured output
    async fn probe(&self, url: &str) -> Result<ProbeOutput>;

    /// Human-readable description for logs
    fn describe(&self) -> String;
}

/// Probe backed by the `curl` command line client
#[derive(Debug, Clone)]
pub struct CurlProbe {
    program: String,
    max_time: Option<Duration>,
}

impl CurlProbe {
    /// Create a probe that runs `program` (usually "curl")
    pub fn new<S: Into<String>>(program: S) -> Self {
        Self {
            program: program.into(),
            max_time: None,
        }
    }

    /// Limit each request with curl's `--max-time`
    pub fn with_max_time(mut self, max_time: Option<Duration>) -> Self {
        self.max_time = max_time;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments passed to the probe for `url`
    pub fn args(&self, url: &str) -> Vec<String> {
        let mut args = vec![
            "-o".to_string(),
            NULL_DEVICE.to_string(),
            "-s".to_string(),
            "-w".to_string(),
            WRITE_OUT_FORMAT.to_string(),
        ];

        if let Some(max_time) = self.max_time {
            args.push("--max-time".to_string());
            args.push(format!("{}", max_time.as_secs_f64()));
        }

        args.push(url.to_string());
        args
    }
}

impl Default for CurlProbe {
    fn default() -> Self {
        Self::new(crate::defaults::DEFAULT_PROBE_COMMAND)
    }
}

#[async_trait]
impl ProbeRunner for CurlProbe {
    async fn probe(&self, url: &str) -> Result<ProbeOutput> {
        // kill_on_drop reaps the child if this future is dropped mid-request
        let output = Command::new(&self.program)
            .args(self.args(url))
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => AppError::probe_unavailable(format!(
                    "'{}' was not found on PATH",
                    self.program
                )),
                _ => AppError::probe_unavailable(format!("failed to launch '{}': {}", self.program, e)),
            })?;

        Ok(ProbeOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        })
    }

    fn describe(&self) -> String {
        match self.max_time {
            Some(max_time) => format!("{} (max-time {}s)", self.program, max_time.as_secs_f64()),
            None => self.program.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Metric;

    #[test]
    fn test_write_out_format_matches_metrics() {
        let expected: String = Metric::ALL
            .iter()
            .map(|m| format!("{}: {}\n", m.probe_label(), m.curl_variable()))
            .collect();
        assert_eq!(WRITE_OUT_FORMAT, expected);
    }

    #[test]
    fn test_curl_args_without_timeout() {
        let probe = CurlProbe::new("curl");
        let args = probe.args("https://example.com");
        assert_eq!(args[0], "-o");
        assert_eq!(args[1], NULL_DEVICE);
        assert_eq!(args[2], "-s");
        assert_eq!(args[3], "-w");
        assert_eq!(args[4], WRITE_OUT_FORMAT);
        assert_eq!(args.last().map(String::as_str), Some("https://example.com"));
        assert!(!args.contains(&"--max-time".to_string()));
    }

    #[test]
    fn test_curl_args_with_timeout() {
        let probe = CurlProbe::new("curl").with_max_time(Some(Duration::from_secs(15)));
        let args = probe.args("https://example.com");
        let idx = args.iter().position(|a| a == "--max-time").unwrap();
        assert_eq!(args[idx + 1], "15");
        assert_eq!(probe.describe(), "curl (max-time 15s)");
    }

    #[tokio::test]
    async fn test_missing_executable_is_probe_unavailable() {
        let probe = CurlProbe::new("definitely-not-a-real-probe-binary-4f1c");
        let err = probe.probe("https://example.com").await.unwrap_err();
        assert!(matches!(err, AppError::ProbeUnavailable(_)));
        assert!(err.to_string().contains("not found"));
    }
}
