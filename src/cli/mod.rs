//! Command-line interface

use clap::Parser;
use std::path::PathBuf;

/// Curl Latency Tester - probe a URL repeatedly and break down where the time goes
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "clt")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Target URL to probe
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Number of sequential requests
    #[arg(short = 'n', long, value_name = "N")]
    pub count: Option<u32>,

    /// Delay between requests in seconds (fractions allowed)
    #[arg(short, long, value_name = "SECS", value_parser = parse_delay)]
    pub delay: Option<f64>,

    /// CSV file to write the results to
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Do not write the CSV file
    #[arg(long)]
    pub no_save: bool,

    /// Probe executable (curl or a compatible client)
    #[arg(long, value_name = "CMD")]
    pub probe: Option<String>,

    /// Per-request probe timeout in seconds (0 disables it)
    #[arg(short, long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Print a JSON report instead of the text report
    #[arg(long)]
    pub json: bool,

    /// Do not render the bar chart
    #[arg(long)]
    pub no_chart: bool,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Validate CLI arguments for conflicts
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        if let Some(ref url) = self.url {
            if url.trim().is_empty() {
                return Err("--url cannot be empty".to_string());
            }
        }

        Ok(())
    }

    /// Color preference expressed on the command line, if any
    pub fn color_override(&self) -> Option<bool> {
        if self.color {
            Some(true)
        } else if self.no_color {
            Some(false)
        } else {
            None
        }
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        self.color_override().unwrap_or_else(supports_color)
    }

    /// Get configuration summary for display
    pub fn get_config_summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("Command-line overrides:\n");
        if let Some(ref url) = self.url {
            summary.push_str(&format!("  URL: {}\n", url));
        }
        if let Some(count) = self.count {
            summary.push_str(&format!("  Requests: {}\n", count));
        }
        if let Some(delay) = self.delay {
            summary.push_str(&format!("  Delay: {}s\n", delay));
        }
        if let Some(ref output) = self.output {
            summary.push_str(&format!("  Output: {}\n", output.display()));
        }
        if let Some(ref probe) = self.probe {
            summary.push_str(&format!("  Probe: {}\n", probe));
        }
        if let Some(timeout) = self.timeout {
            summary.push_str(&format!("  Timeout: {}s\n", timeout));
        }
        summary.push_str(&format!("  Save CSV: {}\n", !self.no_save));
        summary.push_str(&format!("  JSON report: {}\n", self.json));
        summary.push_str(&format!("  Colored output: {}\n", self.use_colors()));

        summary
    }
}

/// Parse a delay in seconds; range checks happen in config validation
fn parse_delay(s: &str) -> Result<f64, String> {
    let s = s.trim();
    if s.starts_with('+') {
        return Err(format!("Invalid delay: {}", s));
    }

    let seconds: f64 = s.parse().map_err(|_| format!("Invalid delay: {}", s))?;
    if !seconds.is_finite() {
        return Err(format!("Invalid delay: {}", s));
    }
    Ok(seconds)
}

/// Check if the terminal supports color output
pub fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    #[cfg(target_os = "windows")]
    {
        if std::env::var("ANSICON").is_ok() || std::env::var("ConEmuANSI").is_ok() {
            return true;
        }
    }

    #[cfg(unix)]
    {
        true
    }
    #[cfg(not(unix))]
    {
        false
    }
}
