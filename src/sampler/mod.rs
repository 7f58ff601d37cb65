//! Sequential latency sampling loop
//!
//! Runs one probe at a time against the target, parses its timing report and
//! appends the reading to a [`SampleSet`]. Requests never overlap: each probe
//! is awaited before the delay and the next probe begin.

use crate::{
    error::{AppError, Result},
    logging::Logger,
    models::{Config, SampleSet},
    probe::{has_output, parse_probe_output, ProbeRunner},
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Receives progress updates from the sampling loop
pub trait ProgressSink: Send + Sync {
    /// Fraction of requests started so far, in `0.0..=1.0`
    fn on_progress(&self, fraction: f64);

    /// Human-readable status line
    fn on_status(&self, message: &str);
}

/// Progress sink that ignores every update
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn on_progress(&self, _fraction: f64) {}

    fn on_status(&self, _message: &str) {}
}

/// Inputs of one sampling run
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingPlan {
    /// URL handed to the probe
    pub target: String,
    /// Number of sequential requests
    pub count: u32,
    /// Pause between consecutive requests, in seconds
    pub delay_seconds: f64,
}

impl SamplingPlan {
    pub fn new<S: Into<String>>(target: S, count: u32, delay_seconds: f64) -> Self {
        Self {
            target: target.into(),
            count,
            delay_seconds,
        }
    }

    /// Reject plans the loop cannot run
    pub fn validate(&self) -> Result<()> {
        if self.count < 1 {
            return Err(AppError::invalid_configuration(format!(
                "request count must be at least 1, got {}",
                self.count
            )));
        }

        if !self.delay_seconds.is_finite() || self.delay_seconds < 0.0 {
            return Err(AppError::invalid_configuration(format!(
                "delay between requests must be a non-negative number of seconds, got {}",
                self.delay_seconds
            )));
        }

        if self.target.trim().is_empty() {
            return Err(AppError::invalid_configuration("target URL is empty"));
        }

        Ok(())
    }

    /// Delay as Duration; only meaningful after `validate`
    pub fn delay(&self) -> Duration {
        Duration::from_secs_f64(self.delay_seconds.max(0.0))
    }
}

impl From<&Config> for SamplingPlan {
    fn from(config: &Config) -> Self {
        Self::new(config.target_url.trim(), config.num_requests, config.delay_seconds)
    }
}

/// Drives the probe once per request and collects the readings
pub struct Sampler {
    probe: Arc<dyn ProbeRunner>,
    logger: Arc<Logger>,
}

impl Sampler {
    /// Create a sampler with a silent logger
    pub fn new(probe: Arc<dyn ProbeRunner>) -> Self {
        Self {
            probe,
            logger: Arc::new(Logger::silent("SAMPLER".to_string())),
        }
    }

    /// Use the given logger for run and per-request events
    pub fn with_logger(mut self, logger: Arc<Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Run the plan to completion.
    ///
    /// Any failure (or cancellation) ends the run and discards the readings
    /// collected so far; the error reports how many requests completed.
    pub async fn run(
        &self,
        plan: &SamplingPlan,
        progress: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<SampleSet> {
        plan.validate()?;

        let run_id = self.logger.begin_run(&plan.target, plan.count).await;
        self.logger.info(&format!("Sampling {} with {} requests", plan.target, plan.count))
            .field("target", &plan.target)
            .field("count", plan.count)
            .field("delay_seconds", plan.delay_seconds)
            .field("probe", self.probe.describe())
            .log()
            .await;

        let started = Instant::now();
        let result = self.sample_all(plan, progress, cancel).await;

        match &result {
            Ok(samples) => {
                self.logger.info(&format!("Collected {} samples", samples.len()))
                    .field("elapsed_ms", started.elapsed().as_millis() as u64)
                    .log()
                    .await;
            }
            Err(e) => {
                self.logger.warn(&format!("Sampling stopped: {}", e))
                    .error_info(e)
                    .log()
                    .await;
            }
        }
        self.logger.finish_run(&run_id, result.is_ok()).await;

        result
    }

    async fn sample_all(
        &self,
        plan: &SamplingPlan,
        progress: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<SampleSet> {
        let mut samples = SampleSet::with_capacity(plan.count as usize);
        let delay = plan.delay();

        for i in 1..=plan.count {
            if cancel.is_cancelled() {
                return Err(AppError::cancelled(i - 1, plan.count));
            }

            progress.on_progress(f64::from(i) / f64::from(plan.count));
            progress.on_status(&format!("Performing request #{}...", i));

            // Dropping the probe future on cancel kills the child process
            let output = tokio::select! {
                _ = cancel.cancelled() => return Err(AppError::cancelled(i - 1, plan.count)),
                output = self.probe.probe(&plan.target) => output?,
            };

            // Ctrl-C reaches the child too; its truncated output is not a probe fault
            if cancel.is_cancelled() {
                return Err(AppError::cancelled(i - 1, plan.count));
            }

            if !has_output(&output.stdout) {
                let stderr = output.stderr.trim();
                let detail = match (stderr.is_empty(), output.exit_code) {
                    (false, _) => format!(": {}", stderr),
                    (true, Some(code)) => format!(" (exit code {})", code),
                    (true, None) => " (terminated by signal)".to_string(),
                };
                return Err(AppError::probe_unavailable(format!(
                    "request #{} produced no timing output{}",
                    i, detail
                )));
            }

            let reading = parse_probe_output(&output.stdout)
                .map_err(|e| e.with_prefix(&format!("request #{}", i)))?;

            self.logger.debug("Request complete")
                .request(i)
                .reading(&reading)
                .log()
                .await;

            samples.push(reading);

            if i < plan.count && !delay.is_zero() {
                tokio::select! {
                    _ = cancel.cancelled() => return Err(AppError::cancelled(i, plan.count)),
                    _ = tokio::time::sleep(delay) => {}
                }
            }
        }

        progress.on_status("Requests completed!");
        Ok(samples)
    }
}
