//! Advisory checks on a configuration that already passed `Config::validate`

use crate::{error::Result, models::Config};

/// Configuration validator producing non-fatal warnings
pub struct ConfigValidator;

impl ConfigValidator {
    /// Run the hard validation, then collect advisory warnings
    pub fn validate_comprehensive(config: &Config) -> Result<Vec<ValidationWarning>> {
        config.validate()?;

        let mut warnings = Vec::new();
        warnings.extend(Self::check_target_url(&config.target_url)?);
        warnings.extend(Self::check_sampling_settings(config));
        warnings.extend(Self::check_output(config));
        Ok(warnings)
    }

    fn check_target_url(target: &str) -> Result<Vec<ValidationWarning>> {
        let mut warnings = Vec::new();
        let parsed = url::Url::parse(target.trim())?;

        match parsed.scheme() {
            "https" => {}
            "http" => warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("URL '{}' uses HTTP; SSL Handshake Time will be 0", target),
            )),
            other => warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!("URL scheme '{}' may not report every timing phase", other),
            )),
        }

        match parsed.host() {
            Some(url::Host::Ipv4(ip)) if ip.is_private() || ip.is_loopback() => {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Info,
                    format!("URL '{}' targets a private/local network", target),
                ));
            }
            Some(url::Host::Ipv4(_)) | Some(url::Host::Ipv6(_)) => {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Info,
                    format!("URL '{}' uses an IP literal; DNS Lookup Time will be near 0", target),
                ));
            }
            Some(url::Host::Domain("localhost")) => {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Info,
                    format!("URL '{}' targets a private/local network", target),
                ));
            }
            _ => {}
        }

        Ok(warnings)
    }

    fn check_sampling_settings(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if config.num_requests < 3 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "{} request(s) may not provide reliable statistics (recommended: >= 3)",
                    config.num_requests
                ),
            ));
        }

        let expected_seconds = config.delay_seconds * config.num_requests.saturating_sub(1) as f64;
        if expected_seconds > 600.0 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "Delays alone will take about {:.0} minutes",
                    expected_seconds / 60.0
                ),
            ));
        }

        if let Some(timeout) = config.probe_timeout_seconds {
            if timeout < 3 {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Warning,
                    format!("Probe timeout of {}s may cut off slow requests", timeout),
                ));
            }
        }

        warnings
    }

    fn check_output(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if config.save_csv && config.output_file.exists() {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("{} will be overwritten", config.output_file.display()),
            ));
        }

        warnings
    }
}

/// Validation warning levels
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationLevel {
    Info,
    Warning,
}

impl ValidationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
        }
    }
}

/// Configuration validation warning
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub level: ValidationLevel,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(level: ValidationLevel, message: String) -> Self {
        Self { level, message }
    }

    /// Format warning for display
    pub fn format(&self, use_color: bool) -> String {
        use colored::*;

        let tag = format!("[{}]", self.level.as_str());
        let tag = if use_color {
            match self.level {
                ValidationLevel::Info => tag.blue().to_string(),
                ValidationLevel::Warning => tag.yellow().to_string(),
            }
        } else {
            tag
        };
        format!("{} {}", tag, self.message)
    }
}

/// Convenience function for comprehensive configuration validation
pub fn validate_config(config: &Config) -> Result<Vec<ValidationWarning>> {
    ConfigValidator::validate_comprehensive(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn config(url: &str) -> Config {
        Config {
            target_url: url.to_string(),
            save_csv: false,
            ..Config::default()
        }
    }

    fn has(warnings: &[ValidationWarning], needle: &str) -> bool {
        warnings.iter().any(|w| w.message.contains(needle))
    }

    #[test]
    fn test_default_config_has_no_warnings() {
        let warnings = validate_config(&config("https://example.com")).unwrap();
        assert!(warnings.is_empty(), "{:?}", warnings);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let mut bad = config("https://example.com");
        bad.num_requests = 0;
        assert!(validate_config(&bad).is_err());
    }

    #[test]
    fn test_http_and_local_targets() {
        let warnings = validate_config(&config("http://127.0.0.1:8080/")).unwrap();
        assert!(has(&warnings, "uses HTTP"));
        assert!(has(&warnings, "private/local"));

        let warnings = validate_config(&config("https://localhost/")).unwrap();
        assert!(has(&warnings, "private/local"));
    }

    #[test]
    fn test_ip_literal_target() {
        let warnings = validate_config(&config("https://93.184.216.34/")).unwrap();
        assert!(has(&warnings, "IP literal"));
    }

    #[test]
    fn test_sampling_warnings() {
        let mut c = config("https://example.com");
        c.num_requests = 1;
        assert!(has(&validate_config(&c).unwrap(), "reliable statistics"));

        c.num_requests = 101;
        c.delay_seconds = 10.0;
        assert!(has(&validate_config(&c).unwrap(), "minutes"));

        c.num_requests = 5;
        c.delay_seconds = 1.0;
        c.probe_timeout_seconds = Some(1);
        assert!(has(&validate_config(&c).unwrap(), "cut off"));
    }

    #[test]
    fn test_existing_output_file() {
        let file = NamedTempFile::new().unwrap();
        let mut c = config("https://example.com");
        c.save_csv = true;
        c.output_file = file.path().to_path_buf();
        assert!(has(&validate_config(&c).unwrap(), "overwritten"));
    }

    #[test]
    fn test_warning_format() {
        let w = ValidationWarning::new(ValidationLevel::Warning, "slow".to_string());
        assert_eq!(w.format(false), "[WARNING] slow");
    }
}
