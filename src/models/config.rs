//! Configuration data model and validation

use crate::types::{AppError, Result};
use crate::defaults;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// URL to probe
    #[serde(default = "default_target_url")]
    pub target_url: String,

    /// Number of sequential requests
    #[serde(default = "default_num_requests")]
    pub num_requests: u32,

    /// Pause between consecutive requests, in seconds
    #[serde(default = "default_delay_seconds")]
    pub delay_seconds: f64,

    /// Probe executable (curl or a curl-compatible client)
    #[serde(default = "default_probe_command")]
    pub probe_command: String,

    /// Per-request limit passed to the probe as `--max-time`
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_seconds: Option<u64>,

    /// CSV file the results are saved to
    #[serde(default = "default_output_file")]
    pub output_file: PathBuf,

    /// Whether the CSV file is written at all
    #[serde(default = "default_true")]
    pub save_csv: bool,

    /// Render the bar chart below the table
    #[serde(default = "default_true")]
    pub show_chart: bool,

    /// Print a JSON report instead of the text report
    #[serde(default)]
    pub json_output: bool,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_url: default_target_url(),
            num_requests: default_num_requests(),
            delay_seconds: default_delay_seconds(),
            probe_command: default_probe_command(),
            probe_timeout_seconds: default_probe_timeout(),
            output_file: default_output_file(),
            save_csv: true,
            show_chart: true,
            json_output: false,
            enable_color: default_enable_color(),
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the per-request probe timeout as Duration
    pub fn probe_timeout(&self) -> Option<Duration> {
        self.probe_timeout_seconds.map(Duration::from_secs)
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        let url = self.target_url.trim();
        if url.is_empty() {
            return Err(AppError::config("Target URL cannot be empty"));
        }

        if let Err(e) = url::Url::parse(url) {
            return Err(AppError::config(format!("Invalid target URL '{}': {}", url, e)));
        }

        if self.num_requests == 0 {
            return Err(AppError::config("Number of requests must be at least 1"));
        }

        if self.num_requests > defaults::MAX_NUM_REQUESTS {
            return Err(AppError::config(format!(
                "Number of requests cannot exceed {}",
                defaults::MAX_NUM_REQUESTS
            )));
        }

        if !self.delay_seconds.is_finite() || self.delay_seconds < defaults::MIN_DELAY_SECONDS {
            return Err(AppError::config(format!(
                "Delay between requests must be at least {}s, got {}",
                defaults::MIN_DELAY_SECONDS,
                self.delay_seconds
            )));
        }

        if self.delay_seconds > defaults::MAX_DELAY_SECONDS {
            return Err(AppError::config(format!(
                "Delay between requests cannot exceed {}s",
                defaults::MAX_DELAY_SECONDS
            )));
        }

        if self.probe_command.trim().is_empty() {
            return Err(AppError::config("Probe command cannot be empty"));
        }

        if let Some(timeout) = self.probe_timeout_seconds {
            if timeout == 0 || timeout > 300 {
                return Err(AppError::config(format!(
                    "Probe timeout must be between 1 and 300 seconds, got {}",
                    timeout
                )));
            }
        }

        if self.save_csv && self.output_file.as_os_str().is_empty() {
            return Err(AppError::config("Output file cannot be empty when saving is enabled"));
        }

        Ok(())
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        if let Ok(target_url) = std::env::var("TARGET_URL") {
            let target_url = target_url.trim();
            if !target_url.is_empty() {
                self.target_url = target_url.to_string();
            }
        }

        if let Ok(num_requests) = std::env::var("NUM_REQUESTS") {
            self.num_requests = num_requests.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid NUM_REQUESTS value '{}': {}", num_requests, e)))?;
        }

        if let Ok(delay) = std::env::var("DELAY_SECONDS") {
            self.delay_seconds = delay.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid DELAY_SECONDS value '{}': {}", delay, e)))?;
        }

        if let Ok(probe) = std::env::var("PROBE_COMMAND") {
            self.probe_command = probe.trim().to_string();
        }

        if let Ok(timeout) = std::env::var("PROBE_TIMEOUT_SECONDS") {
            let timeout = timeout.trim();
            self.probe_timeout_seconds = if timeout.is_empty() || timeout == "0" {
                None
            } else {
                Some(timeout.parse()
                    .map_err(|e| AppError::config(format!("Invalid PROBE_TIMEOUT_SECONDS value '{}': {}", timeout, e)))?)
            };
        }

        if let Ok(output_file) = std::env::var("OUTPUT_FILE") {
            self.output_file = PathBuf::from(output_file.trim());
        }

        if let Ok(enable_color) = std::env::var("ENABLE_COLOR") {
            self.enable_color = enable_color.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", enable_color, e)))?;
        }

        Ok(())
    }
}

// Default value functions for serde
fn default_target_url() -> String {
    defaults::DEFAULT_TARGET_URL.to_string()
}

fn default_num_requests() -> u32 {
    defaults::DEFAULT_NUM_REQUESTS
}

fn default_delay_seconds() -> f64 {
    defaults::DEFAULT_DELAY_SECONDS
}

fn default_probe_command() -> String {
    defaults::DEFAULT_PROBE_COMMAND.to_string()
}

fn default_probe_timeout() -> Option<u64> {
    Some(defaults::DEFAULT_PROBE_TIMEOUT_SECS)
}

fn default_output_file() -> PathBuf {
    PathBuf::from(defaults::DEFAULT_OUTPUT_FILE)
}

fn default_enable_color() -> bool {
    defaults::DEFAULT_ENABLE_COLOR
}

fn default_true() -> bool {
    true
}
