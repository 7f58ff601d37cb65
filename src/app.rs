//! Main application orchestration and execution

use crate::{
    config::{display_config_summary, validate_config, ValidationLevel},
    error::{ErrorContext, Result},
    export::{save_csv, to_json_string, RunReport},
    logging::{Logger, LoggerFactory},
    models::Config,
    output::{ConsoleProgress, OutputCoordinator, OutputFormatterFactory},
    probe::{CurlProbe, ProbeRunner},
    sampler::{NoopProgress, ProgressSink, Sampler, SamplingPlan},
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Main application struct that coordinates all components
pub struct App {
    config: Config,
    probe: Arc<dyn ProbeRunner>,
    cancel: CancellationToken,
    show_progress: bool,
}

impl App {
    /// Create an application that probes with curl as configured
    pub fn new(config: Config) -> Self {
        let probe = CurlProbe::new(config.probe_command.clone()).with_max_time(config.probe_timeout());
        Self::with_probe(config, Arc::new(probe))
    }

    /// Create an application with a custom probe runner
    pub fn with_probe(config: Config, probe: Arc<dyn ProbeRunner>) -> Self {
        Self {
            config,
            probe,
            cancel: CancellationToken::new(),
            show_progress: true,
        }
    }

    /// Disable the console progress lines
    pub fn quiet(mut self) -> Self {
        self.show_progress = false;
        self
    }

    /// Token that stops the run when cancelled (wired to Ctrl-C by the binary)
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Sample, export and print; returns the report that was produced
    pub async fn run(&self) -> Result<RunReport> {
        let config = &self.config;
        let warnings = validate_config(config)?;

        let factory = LoggerFactory::new(config.clone());
        let logger = Arc::new(factory.create_logger("APP").await);

        if config.debug {
            eprintln!("{} v{}", crate::PKG_NAME, crate::VERSION);
            eprintln!("Session: {}", factory.session_id());
            eprintln!("\nConfiguration Summary:\n{}\n", display_config_summary(config));
        }

        for warning in &warnings {
            if warning.level == ValidationLevel::Warning || config.verbose {
                eprintln!("{}", warning.format(config.enable_color));
            }
        }

        let report = self.sample(&logger).await?;
        let report = if config.save_csv {
            save_csv(&report.table, &config.output_file)
                .context("Failed to save results")?;
            logger.info("Results saved")
                .field("path", config.output_file.display().to_string())
                .field("rows", report.table.len())
                .log()
                .await;
            report.with_csv_file(Some(config.output_file.display().to_string()))
        } else {
            report
        };

        if config.json_output {
            println!("{}", to_json_string(&report)?);
        } else {
            let formatter = OutputFormatterFactory::create_formatter(config.enable_color, config.verbose);
            let coordinator = OutputCoordinator::new(formatter).with_chart(config.show_chart);
            println!("{}", coordinator.display_results(&report)?);

            if let Some(ref path) = report.csv_file {
                println!();
                println!("{}", coordinator.format_success(&format!("Results saved to {}", path))?);
            }
        }

        Ok(report)
    }

    /// Run the sampler and assemble the report, without printing or saving
    pub async fn sample(&self, logger: &Arc<Logger>) -> Result<RunReport> {
        let plan = SamplingPlan::from(&self.config);
        let sampler = Sampler::new(self.probe.clone()).with_logger(logger.clone());

        let console;
        let progress: &dyn ProgressSink = if self.show_progress {
            console = ConsoleProgress::new(self.config.enable_color);
            &console
        } else {
            &NoopProgress
        };

        let samples = sampler.run(&plan, progress, &self.cancel).await?;
        Ok(RunReport::new(&self.config, self.probe.describe(), &samples))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::probe::ProbeOutput;
    use async_trait::async_trait;
    use tempfile::TempDir;

    const REPORT: &str = "DNS Lookup Time: 0.010\nTCP Connect Time: 0.020\nSSL Handshake Time: 0.030\nServer Processing Time: 0.040\nTotal Time: 0.050\n";

    struct FixedProbe(&'static str);

    #[async_trait]
    impl ProbeRunner for FixedProbe {
        async fn probe(&self, _url: &str) -> Result<ProbeOutput> {
            Ok(ProbeOutput {
                stdout: self.0.to_string(),
                ..ProbeOutput::default()
            })
        }

        fn describe(&self) -> String {
            "fixed".to_string()
        }
    }

    fn config(dir: &TempDir) -> Config {
        Config {
            num_requests: 3,
            delay_seconds: 0.1,
            output_file: dir.path().join("metrics.csv"),
            enable_color: false,
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_run_saves_csv_and_returns_report() {
        let dir = TempDir::new().unwrap();
        let app = App::with_probe(config(&dir), Arc::new(FixedProbe(REPORT))).quiet();

        let report = app.run().await.unwrap();

        assert_eq!(report.table.len(), 3);
        assert_eq!(report.probe, "fixed");
        assert!(report.csv_file.is_some());

        let csv = std::fs::read_to_string(dir.path().join("metrics.csv")).unwrap();
        assert_eq!(csv.lines().count(), 4);
        assert!(csv.lines().nth(1).unwrap().starts_with("10.000,20.000,30.000,40.000,50.000,1"));
    }

    #[tokio::test]
    async fn test_run_without_saving() {
        let dir = TempDir::new().unwrap();
        let mut config = config(&dir);
        config.save_csv = false;
        config.num_requests = 1;

        let report = App::with_probe(config, Arc::new(FixedProbe(REPORT))).quiet().run().await.unwrap();

        assert!(report.csv_file.is_none());
        assert!(!dir.path().join("metrics.csv").exists());
    }

    #[tokio::test]
    async fn test_malformed_output_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let app = App::with_probe(config(&dir), Arc::new(FixedProbe("DNS Lookup Time 0.01\n"))).quiet();

        let err = app.run().await.unwrap_err();

        assert!(matches!(err, AppError::MalformedProbeOutput(_)));
        assert!(!dir.path().join("metrics.csv").exists());
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let dir = TempDir::new().unwrap();
        let app = App::with_probe(config(&dir), Arc::new(FixedProbe(REPORT))).quiet();
        app.cancellation_token().cancel();

        let err = app.run().await.unwrap_err();
        assert_eq!(err.exit_code(), 130);
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut config = config(&dir);
        config.num_requests = 0;

        let err = App::with_probe(config, Arc::new(FixedProbe(REPORT))).quiet().run().await.unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }

    #[tokio::test]
    async fn test_save_failure_is_export_error() {
        let dir = TempDir::new().unwrap();
        let mut config = config(&dir);
        config.num_requests = 1;
        config.output_file = dir.path().join("missing").join("metrics.csv");

        let err = App::with_probe(config, Arc::new(FixedProbe(REPORT))).quiet().run().await.unwrap_err();
        assert_eq!(err.exit_code(), 5);
        assert!(err.to_string().contains("Failed to save results"));
    }
}
