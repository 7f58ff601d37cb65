//! Configuration parsing from CLI arguments and environment variables

use crate::{
    cli::Cli,
    config::env::EnvManager,
    error::{AppError, Result},
    models::Config,
};

/// Builds a [`Config`] from defaults, `.env`, environment variables and CLI flags
pub struct ConfigParser {
    cli: Cli,
    use_environment: bool,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self {
            cli,
            use_environment: true,
        }
    }

    /// Ignore `.env` and process environment variables
    pub fn without_environment(mut self) -> Self {
        self.use_environment = false;
        self
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<Config> {
        self.cli.validate().map_err(AppError::config)?;

        let mut config = Config::default();

        if self.use_environment {
            EnvManager::load_env_file(self.cli.debug)?;
            config.merge_from_env()?;
        }

        self.apply_cli_overrides(&mut config);
        config.validate()?;

        Ok(config)
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut Config) {
        let cli = &self.cli;

        if let Some(ref url) = cli.url {
            config.target_url = url.trim().to_string();
        }
        if let Some(count) = cli.count {
            config.num_requests = count;
        }
        if let Some(delay) = cli.delay {
            config.delay_seconds = delay;
        }
        if let Some(ref output) = cli.output {
            config.output_file = output.clone();
        }
        if let Some(ref probe) = cli.probe {
            config.probe_command = probe.trim().to_string();
        }
        if let Some(timeout) = cli.timeout {
            config.probe_timeout_seconds = if timeout == 0 { None } else { Some(timeout) };
        }
        if let Some(color) = cli.color_override() {
            config.enable_color = color;
        }

        if cli.no_save {
            config.save_csv = false;
        }
        if cli.no_chart {
            config.show_chart = false;
        }
        config.json_output = cli.json;
        config.verbose = cli.verbose;
        config.debug = cli.debug;
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    ConfigParser::new(cli).parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let timeout = config
        .probe_timeout_seconds
        .map(|t| format!("{}s", t))
        .unwrap_or_else(|| "none".to_string());
    let output = if config.save_csv {
        config.output_file.display().to_string()
    } else {
        "disabled".to_string()
    };

    [
        format!("Target URL: {}", config.target_url),
        format!("Requests: {}", config.num_requests),
        format!("Delay: {}s", config.delay_seconds),
        format!("Probe: {}", config.probe_command),
        format!("Probe Timeout: {}", timeout),
        format!("CSV Output: {}", output),
        format!("Chart: {}", config.show_chart),
        format!("JSON Report: {}", config.json_output),
        format!("Color Output: {}", config.enable_color),
        format!("Verbose: {}", config.verbose),
        format!("Debug: {}", config.debug),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;

    fn parse(args: &[&str]) -> Result<Config> {
        let mut argv = vec!["clt"];
        argv.extend_from_slice(args);
        ConfigParser::new(Cli::parse_from(argv)).without_environment().parse()
    }

    #[test]
    fn test_defaults_without_arguments() {
        let config = parse(&[]).unwrap();
        assert_eq!(config.target_url, crate::defaults::DEFAULT_TARGET_URL);
        assert_eq!(config.num_requests, crate::defaults::DEFAULT_NUM_REQUESTS);
        assert_eq!(config.delay_seconds, crate::defaults::DEFAULT_DELAY_SECONDS);
        assert_eq!(config.probe_command, "curl");
        assert!(config.save_csv);
        assert!(config.show_chart);
        assert!(!config.json_output);
    }

    #[test]
    fn test_cli_overrides() {
        let config = parse(&[
            "--url", " https://example.org/health ",
            "-n", "12",
            "-d", "0.25",
            "-o", "out/run.csv",
            "--probe", "/opt/curl",
            "--timeout", "0",
            "--no-chart",
            "--json",
            "--no-color",
            "--verbose",
        ])
        .unwrap();

        assert_eq!(config.target_url, "https://example.org/health");
        assert_eq!(config.num_requests, 12);
        assert_eq!(config.delay_seconds, 0.25);
        assert_eq!(config.output_file, PathBuf::from("out/run.csv"));
        assert_eq!(config.probe_command, "/opt/curl");
        assert_eq!(config.probe_timeout_seconds, None);
        assert!(!config.show_chart);
        assert!(config.json_output);
        assert!(!config.enable_color);
        assert!(config.verbose);
    }

    #[test]
    fn test_no_save() {
        let config = parse(&["--no-save"]).unwrap();
        assert!(!config.save_csv);
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        for args in [
            vec!["--count", "0"],
            vec!["--count", "1001"],
            vec!["--delay", "0.05"],
            vec!["--url", "not a url"],
            vec!["--timeout", "301"],
        ] {
            let err = parse(&args).unwrap_err();
            assert_eq!(err.exit_code(), 1, "{:?}", args);
        }
    }

    #[test]
    fn test_conflicting_color_flags() {
        let err = parse(&["--color", "--no-color"]).unwrap_err();
        assert_eq!(err.category(), "CONFIG");
    }

    #[test]
    fn test_config_summary() {
        let summary = display_config_summary(&Config::default());
        assert!(summary.contains("Target URL: https://example.com"));
        assert!(summary.contains("Requests: 5"));
        assert!(summary.contains("Probe Timeout: 30s"));
        assert!(summary.contains("CSV Output: metrics.csv"));
    }
}
