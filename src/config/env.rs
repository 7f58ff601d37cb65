//! Environment variable handling and .env file management

use crate::error::{AppError, Result};
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load `.env` from the current directory if it exists.
    ///
    /// Variables already present in the environment are left untouched, so
    /// real environment variables take precedence over the file.
    pub fn load_env_file(debug: bool) -> Result<bool> {
        Self::load_env_file_from(Path::new(".env"), debug)
    }

    /// Load a specific env file if it exists; returns whether it was loaded
    pub fn load_env_file_from(path: &Path, debug: bool) -> Result<bool> {
        if !path.exists() {
            if debug {
                eprintln!("No {} file found, using defaults and CLI arguments", path.display());
            }
            return Ok(false);
        }

        dotenv::from_path(path)
            .map_err(|e| AppError::config(format!("Failed to load {}: {}", path.display(), e)))?;

        if debug {
            eprintln!("Loaded configuration from {}", path.display());
        }
        Ok(true)
    }

    /// Create example .env file content
    pub fn create_example_env_content() -> String {
        r#"# Curl Latency Tester Configuration
#
# Values here are used as defaults and can be overridden by real environment
# variables and by command-line arguments.

# URL to probe
# TARGET_URL=https://example.com

# Number of sequential requests (1-1000)
# NUM_REQUESTS=5

# Delay between requests in seconds (0.1-3600, fractions allowed)
# DELAY_SECONDS=1.0

# Probe executable
# PROBE_COMMAND=curl

# Per-request probe timeout in seconds (1-300, 0 disables it)
# PROBE_TIMEOUT_SECONDS=30

# CSV file the results are written to
# OUTPUT_FILE=metrics.csv

# Enable colored output (true/false)
# ENABLE_COLOR=true
"#
        .to_string()
    }

    /// Save example .env file to disk
    pub fn save_example_env_file(path: &Path) -> Result<()> {
        std::fs::write(path, Self::create_example_env_content())
            .map_err(|e| AppError::config(format!("Failed to write example .env file: {}", e)))
    }

    /// Validate one environment variable value before it is merged
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "TARGET_URL" => {
                url::Url::parse(value)
                    .map_err(|e| AppError::config(format!("Invalid TARGET_URL '{}': {}", value, e)))?;
            }
            "NUM_REQUESTS" => {
                let count: u32 = value
                    .parse()
                    .map_err(|e| AppError::config(format!("Invalid NUM_REQUESTS value '{}': {}", value, e)))?;
                if count == 0 || count > crate::defaults::MAX_NUM_REQUESTS {
                    return Err(AppError::config(format!(
                        "NUM_REQUESTS must be between 1 and {}, got: {}",
                        crate::defaults::MAX_NUM_REQUESTS,
                        count
                    )));
                }
            }
            "DELAY_SECONDS" => {
                let delay: f64 = value
                    .parse()
                    .map_err(|e| AppError::config(format!("Invalid DELAY_SECONDS value '{}': {}", value, e)))?;
                if !(crate::defaults::MIN_DELAY_SECONDS..=crate::defaults::MAX_DELAY_SECONDS).contains(&delay) {
                    return Err(AppError::config(format!(
                        "DELAY_SECONDS must be between {} and {}, got: {}",
                        crate::defaults::MIN_DELAY_SECONDS,
                        crate::defaults::MAX_DELAY_SECONDS,
                        value
                    )));
                }
            }
            "PROBE_COMMAND" | "OUTPUT_FILE" => {
                if value.is_empty() {
                    return Err(AppError::config(format!("{} cannot be empty", key)));
                }
            }
            "PROBE_TIMEOUT_SECONDS" => {
                let timeout: u64 = value.parse().map_err(|e| {
                    AppError::config(format!("Invalid PROBE_TIMEOUT_SECONDS value '{}': {}", value, e))
                })?;
                if timeout > 300 {
                    return Err(AppError::config(format!(
                        "PROBE_TIMEOUT_SECONDS must be between 0 and 300, got: {}",
                        timeout
                    )));
                }
            }
            "ENABLE_COLOR" => {
                value
                    .parse::<bool>()
                    .map_err(|e| AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", value, e)))?;
            }
            _ => {}
        }

        Ok(())
    }

    /// Supported environment variables: (name, description, example)
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("TARGET_URL", "URL to probe", "https://example.com"),
            ("NUM_REQUESTS", "Number of sequential requests (1-1000)", "5"),
            ("DELAY_SECONDS", "Delay between requests in seconds (0.1-3600)", "1.0"),
            ("PROBE_COMMAND", "Probe executable", "curl"),
            ("PROBE_TIMEOUT_SECONDS", "Per-request timeout in seconds (0 disables)", "30"),
            ("OUTPUT_FILE", "CSV output path", "metrics.csv"),
            ("ENABLE_COLOR", "Enable colored output", "true"),
        ]
    }

    /// Display environment variable help
    pub fn display_env_help() -> String {
        let mut help = String::new();
        help.push_str("Supported Environment Variables:\n\n");

        for (var, description, example) in Self::get_supported_env_vars() {
            help.push_str(&format!("  {:<22} {}\n", var, description));
            help.push_str(&format!("  {:<22} Example: {}\n\n", "", example));
        }

        help.push_str("Configuration Priority (highest to lowest):\n");
        help.push_str("  1. Command-line arguments\n");
        help.push_str("  2. Environment variables\n");
        help.push_str("  3. .env file values\n");
        help.push_str("  4. Default values\n");

        help
    }

    /// Validate the lines of an env file without loading it
    pub fn check_env_content(content: &str) -> Vec<String> {
        let mut warnings = Vec::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match line.split_once('=') {
                Some((key, value)) => {
                    if let Err(e) = Self::validate_env_var(key.trim(), value) {
                        warnings.push(format!("Line '{}': {}", line, e));
                    }
                }
                None => warnings.push(format!("Line '{}': expected KEY=VALUE", line)),
            }
        }

        warnings
    }
}
