//! Structured logging for the curl latency tester
//!
//! Every record carries a level, the logger name, an optional run ID tying
//! together the records of one sampling run, an optional request index and a
//! sorted map of structured fields. Records render as:
//! - Console: `12:00:01.250  INFO [SAMPLER] message #3 {k=v}`, optionally colored
//! - Json: one object per line
//! - Compact: `12:00:01 I SAMPLER: message`
//!
//! Output goes to stderr; stdout belongs to the report.

use crate::error::{AppError, Result};
use crate::models::{Config, ProbeReading};
use crate::types::Metric;
use chrono::{DateTime, Utc};
use colored::{Color, Colorize};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Severity of a log record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl LogLevel {
    pub fn label(self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
        }
    }

    /// Console color of the level label
    pub fn color(self) -> Color {
        match self {
            LogLevel::Trace => Color::White,
            LogLevel::Debug => Color::Cyan,
            LogLevel::Info => Color::Green,
            LogLevel::Warn => Color::Yellow,
            LogLevel::Error => Color::Red,
            LogLevel::Fatal => Color::Magenta,
        }
    }

    /// Threshold implied by the run flags: debug, then verbose, else warnings only
    pub fn for_config(config: &Config) -> Self {
        if config.debug {
            LogLevel::Debug
        } else if config.verbose {
            LogLevel::Info
        } else {
            LogLevel::Warn
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for LogLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TRACE" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            "FATAL" => Ok(LogLevel::Fatal),
            _ => Err(AppError::parse(format!("Invalid log level: {}", s))),
        }
    }
}

/// How records are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Console,
    Json,
    Compact,
}

/// One log record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub logger: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    /// 1-based request index, for records about a single probe
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<u32>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Default)]
struct Session {
    session_id: Option<String>,
    run_id: Option<String>,
}

/// Leveled, structured logger writing to stderr
pub struct Logger {
    name: String,
    min_level: LogLevel,
    format: LogFormat,
    use_color: bool,
    session: Arc<RwLock<Session>>,
}

impl Logger {
    /// Console logger at Info level
    pub fn new(name: String) -> Self {
        Self {
            name,
            min_level: LogLevel::Info,
            format: LogFormat::Console,
            use_color: true,
            session: Arc::new(RwLock::new(Session::default())),
        }
    }

    /// Logger that drops everything below Fatal
    pub fn silent(name: String) -> Self {
        let mut logger = Self::new(name);
        logger.min_level = LogLevel::Fatal;
        logger
    }

    /// Logger configured from the run flags; `--debug` switches to JSON lines
    pub fn with_config(name: String, config: &Config) -> Self {
        Self {
            name,
            min_level: LogLevel::for_config(config),
            format: if config.debug { LogFormat::Json } else { LogFormat::Console },
            use_color: config.enable_color,
            session: Arc::new(RwLock::new(Session::default())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_level(&mut self, level: LogLevel) {
        self.min_level = level;
    }

    pub fn set_format(&mut self, format: LogFormat) {
        self.format = format;
    }

    pub fn set_color(&mut self, use_color: bool) {
        self.use_color = use_color;
    }

    pub async fn set_session_id(&self, session_id: String) {
        self.session.write().await.session_id = Some(session_id);
    }

    pub fn would_log(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    /// Open a sampling run; later records carry the returned run ID until
    /// [`Logger::finish_run`] closes it
    pub async fn begin_run(&self, target: &str, count: u32) -> String {
        let run_id = Uuid::new_v4().to_string();
        self.session.write().await.run_id = Some(run_id.clone());

        self.debug("Run started")
            .field("target", target)
            .field("count", count)
            .log()
            .await;

        run_id
    }

    pub async fn finish_run(&self, run_id: &str, success: bool) {
        self.debug("Run finished")
            .field("success", success)
            .log()
            .await;

        let mut session = self.session.write().await;
        if session.run_id.as_deref() == Some(run_id) {
            session.run_id = None;
        }
    }

    pub fn log(&self, level: LogLevel, message: &str) -> RecordBuilder<'_> {
        RecordBuilder {
            logger: self,
            record: LogRecord {
                timestamp: Utc::now(),
                level,
                logger: self.name.clone(),
                message: message.to_string(),
                session_id: None,
                run_id: None,
                request: None,
                fields: BTreeMap::new(),
            },
        }
    }

    pub fn trace(&self, message: &str) -> RecordBuilder<'_> {
        self.log(LogLevel::Trace, message)
    }

    pub fn debug(&self, message: &str) -> RecordBuilder<'_> {
        self.log(LogLevel::Debug, message)
    }

    pub fn info(&self, message: &str) -> RecordBuilder<'_> {
        self.log(LogLevel::Info, message)
    }

    pub fn warn(&self, message: &str) -> RecordBuilder<'_> {
        self.log(LogLevel::Warn, message)
    }

    pub fn error(&self, message: &str) -> RecordBuilder<'_> {
        self.log(LogLevel::Error, message)
    }

    pub fn fatal(&self, message: &str) -> RecordBuilder<'_> {
        self.log(LogLevel::Fatal, message)
    }

    async fn render(&self, mut record: LogRecord) -> Option<String> {
        if !self.would_log(record.level) {
            return None;
        }

        {
            let session = self.session.read().await;
            record.session_id = session.session_id.clone();
            if record.run_id.is_none() {
                record.run_id = session.run_id.clone();
            }
        }

        Some(match self.format {
            LogFormat::Console => self.render_console(&record),
            LogFormat::Json => serde_json::to_string(&record)
                .unwrap_or_else(|e| format!("{{\"level\":\"Error\",\"message\":\"unserializable log record: {}\"}}", e)),
            LogFormat::Compact => format!(
                "{} {} {}: {}",
                record.timestamp.format("%H:%M:%S"),
                &record.level.label()[..1],
                record.logger,
                record.message
            ),
        })
    }

    fn render_console(&self, record: &LogRecord) -> String {
        let level = format!("{:>5}", record.level.label());
        let level = if self.use_color {
            level.color(record.level.color()).to_string()
        } else {
            level
        };

        let mut line = format!(
            "{} {} [{}] {}",
            record.timestamp.format("%H:%M:%S%.3f"),
            level,
            record.logger,
            record.message
        );

        if let Some(request) = record.request {
            line.push_str(&format!(" #{}", request));
        }
        if let Some(run_id) = &record.run_id {
            line.push_str(&format!(" (run {})", &run_id[..run_id.len().min(8)]));
        }
        if !record.fields.is_empty() {
            let fields: Vec<String> = record.fields.iter()
                .map(|(key, value)| format!("{}={}", key, value))
                .collect();
            line.push_str(&format!(" {{{}}}", fields.join(", ")));
        }

        line
    }
}

/// Accumulates fields for one record before it is written
pub struct RecordBuilder<'a> {
    logger: &'a Logger,
    record: LogRecord,
}

impl RecordBuilder<'_> {
    pub fn field<T: Serialize>(mut self, key: &str, value: T) -> Self {
        if let Ok(value) = serde_json::to_value(value) {
            self.record.fields.insert(key.to_string(), value);
        }
        self
    }

    /// Tag the record with a 1-based request index
    pub fn request(mut self, index: u32) -> Self {
        self.record.request = Some(index);
        self
    }

    /// Attach the five millisecond values of a reading
    pub fn reading(self, reading: &ProbeReading) -> Self {
        self.field("dns_ms", reading.get(Metric::DnsLookup))
            .field("tcp_ms", reading.get(Metric::TcpConnect))
            .field("ssl_ms", reading.get(Metric::SslHandshake))
            .field("server_ms", reading.get(Metric::ServerProcessing))
            .field("total_ms", reading.get(Metric::Total))
    }

    pub fn error_info(self, error: &AppError) -> Self {
        self.field("error_category", error.category())
            .field("exit_code", error.exit_code())
    }

    pub async fn log(self) {
        if let Some(line) = self.logger.render(self.record).await {
            let _ = writeln!(io::stderr(), "{}", line);
        }
    }

    /// The line [`RecordBuilder::log`] would write, or None when filtered out
    pub async fn render(self) -> Option<String> {
        self.logger.render(self.record).await
    }
}

/// Hands out loggers that share one session ID
pub struct LoggerFactory {
    config: Config,
    session_id: String,
}

impl LoggerFactory {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            session_id: Uuid::new_v4().to_string(),
        }
    }

    pub async fn create_logger(&self, name: &str) -> Logger {
        let logger = Logger::with_config(name.to_string(), &self.config);
        logger.set_session_id(self.session_id.clone()).await;
        logger
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(name: &str) -> Logger {
        let mut logger = Logger::new(name.to_string());
        logger.set_color(false);
        logger
    }

    #[test]
    fn test_level_parsing_and_order() {
        assert_eq!("DEBUG".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!(" info ".parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert!("loud".parse::<LogLevel>().is_err());

        assert!(LogLevel::Trace < LogLevel::Debug);
        assert!(LogLevel::Warn < LogLevel::Error);
        assert!(LogLevel::Error < LogLevel::Fatal);
        assert_eq!(LogLevel::Warn.to_string(), "WARN");
    }

    #[test]
    fn test_level_follows_run_flags() {
        let mut config = Config::default();
        assert_eq!(LogLevel::for_config(&config), LogLevel::Warn);
        config.verbose = true;
        assert_eq!(LogLevel::for_config(&config), LogLevel::Info);
        config.debug = true;
        assert_eq!(LogLevel::for_config(&config), LogLevel::Debug);

        let logger = Logger::with_config("APP".to_string(), &config);
        assert_eq!(logger.format, LogFormat::Json);
    }

    #[test]
    fn test_threshold_filters_records() {
        tokio_test::block_on(async {
            let mut logger = plain("TEST");
            logger.set_level(LogLevel::Error);

            assert!(!logger.would_log(LogLevel::Warn));
            assert!(logger.would_log(LogLevel::Fatal));
            assert!(logger.info("hidden").render().await.is_none());
            assert!(logger.error("shown").render().await.is_some());

            let silent = Logger::silent("TEST".to_string());
            assert!(!silent.would_log(LogLevel::Error));
        });
    }

    #[tokio::test]
    async fn test_console_line_with_request_and_reading() {
        let logger = plain("SAMPLER");
        let reading = ProbeReading::from_millis([1.0, 2.0, 3.0, 4.0, 5.0]);

        let line = logger.info("Request complete")
            .request(1)
            .reading(&reading)
            .render()
            .await
            .unwrap();

        assert!(line.contains(" INFO [SAMPLER] Request complete #1"));
        assert!(line.contains("dns_ms=1.0"));
        assert!(line.contains("total_ms=5.0"));
        assert!(!line.contains('\u{1b}'));
    }

    #[tokio::test]
    async fn test_json_line_carries_session_and_error() {
        let mut logger = plain("TEST");
        logger.set_format(LogFormat::Json);
        logger.set_session_id("session-1".to_string()).await;

        let line = logger.warn("probe failed")
            .error_info(&AppError::probe_unavailable("missing"))
            .render()
            .await
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["level"], "Warn");
        assert_eq!(value["session_id"], "session-1");
        assert_eq!(value["fields"]["error_category"], "PROBE");
        assert_eq!(value["fields"]["exit_code"], 2);
        assert!(value.get("request").is_none());
    }

    #[tokio::test]
    async fn test_run_id_scopes_records() {
        let mut logger = plain("TEST");
        logger.set_format(LogFormat::Compact);

        let run_id = logger.begin_run("https://example.com", 3).await;
        let line = logger.info("inside").render().await;
        assert!(line.is_some());
        assert_eq!(logger.session.read().await.run_id.as_deref(), Some(run_id.as_str()));

        logger.finish_run(&run_id, true).await;
        assert!(logger.session.read().await.run_id.is_none());
    }

    #[tokio::test]
    async fn test_factory_shares_session() {
        let factory = LoggerFactory::new(Config::default());
        let logger = factory.create_logger("APP").await;

        assert_eq!(logger.name(), "APP");
        let session = logger.session.read().await;
        assert_eq!(session.session_id.as_deref(), Some(factory.session_id()));
    }
}
