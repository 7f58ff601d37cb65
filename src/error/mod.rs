//! Error handling for the curl latency tester

use thiserror::Error;

/// Custom error types for the curl latency tester
#[derive(Error, Debug)]
pub enum AppError {
    /// Host configuration errors (.env, environment variables, CLI flags)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Sampler inputs rejected before any probe is launched
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Probe executable missing, failed to launch, or produced no output
    #[error("Probe unavailable: {0}")]
    ProbeUnavailable(String),

    /// Probe output did not match the `label: decimal` grammar
    #[error("Malformed probe output: {0}")]
    MalformedProbeOutput(String),

    /// The run was interrupted before all requests completed
    #[error("Run cancelled after {completed} of {requested} requests")]
    Cancelled { completed: u32, requested: u32 },

    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(String),

    /// Parsing errors (URLs, numbers, etc.)
    #[error("Parsing error: {0}")]
    Parse(String),

    /// CSV / JSON export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new invalid sampler configuration error
    pub fn invalid_configuration<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfiguration(message.into())
    }

    /// Create a new probe unavailable error
    pub fn probe_unavailable<S: Into<String>>(message: S) -> Self {
        Self::ProbeUnavailable(message.into())
    }

    /// Create a new malformed probe output error
    pub fn malformed_output<S: Into<String>>(message: S) -> Self {
        Self::MalformedProbeOutput(message.into())
    }

    /// Create a new cancellation error
    pub fn cancelled(completed: u32, requested: u32) -> Self {
        Self::Cancelled { completed, requested }
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io(message.into())
    }

    /// Create a new parsing error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse(message.into())
    }

    /// Create a new export error
    pub fn export<S: Into<String>>(message: S) -> Self {
        Self::Export(message.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Get error category for logging and reporting
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG",
            Self::InvalidConfiguration(_) => "INVALID_CONFIG",
            Self::ProbeUnavailable(_) => "PROBE",
            Self::MalformedProbeOutput(_) => "PROBE_OUTPUT",
            Self::Cancelled { .. } => "CANCELLED",
            Self::Io(_) => "IO",
            Self::Parse(_) => "PARSE",
            Self::Export(_) => "EXPORT",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Check if running the whole command again may succeed without changes
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Cancelled { .. } | Self::Io(_) | Self::Export(_) => true,
            Self::Config(_) | Self::InvalidConfiguration(_) | Self::Parse(_) => false,
            Self::ProbeUnavailable(_) | Self::MalformedProbeOutput(_) | Self::Internal(_) => false,
        }
    }

    /// Get user-friendly error message with suggestions
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Config(msg) => {
                format!("Configuration problem: {}\n\nSuggestion: Check your .env file, environment variables or command line arguments.", msg)
            }
            Self::InvalidConfiguration(msg) => {
                format!("Invalid test parameters: {}\n\nSuggestion: Use at least one request, a non-negative delay and a non-empty URL.", msg)
            }
            Self::ProbeUnavailable(msg) => {
                format!("Could not run the HTTP probe: {}\n\nSuggestion: Make sure curl is installed and on your PATH, or point --probe at it.", msg)
            }
            Self::MalformedProbeOutput(msg) => {
                format!("The probe returned unexpected output: {}\n\nSuggestion: Check that --probe points at a curl-compatible client that honours -w.", msg)
            }
            Self::Cancelled { completed, requested } => {
                format!("Stopped after {} of {} requests.\n\nPartial results are discarded; run the command again to collect a full set.", completed, requested)
            }
            Self::Io(msg) => {
                format!("File operation failed: {}\n\nSuggestion: Check file permissions and disk space.", msg)
            }
            Self::Parse(msg) => {
                format!("Failed to parse data: {}\n\nSuggestion: Check the format of your input values.", msg)
            }
            Self::Export(msg) => {
                format!("Failed to export results: {}\n\nSuggestion: Check the output path or disable saving with --no-save.", msg)
            }
            Self::Internal(msg) => {
                format!("Internal error: {}\n\nThis is likely a bug. Please report this issue with the error details.", msg)
            }
        }
    }

    /// Get exit code for this error type
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::InvalidConfiguration(_) | Self::Parse(_) => 1,
            Self::ProbeUnavailable(_) => 2,
            Self::MalformedProbeOutput(_) => 3,
            Self::Io(_) | Self::Export(_) => 5,
            Self::Cancelled { .. } => 130,
            Self::Internal(_) => 99,
        }
    }

    /// Rebuild this error with a context prefix, keeping its category
    pub fn with_prefix(self, context: &str) -> Self {
        match self {
            Self::Config(msg) => Self::Config(format!("{}: {}", context, msg)),
            Self::InvalidConfiguration(msg) => Self::InvalidConfiguration(format!("{}: {}", context, msg)),
            Self::ProbeUnavailable(msg) => Self::ProbeUnavailable(format!("{}: {}", context, msg)),
            Self::MalformedProbeOutput(msg) => Self::MalformedProbeOutput(format!("{}: {}", context, msg)),
            Self::Io(msg) => Self::Io(format!("{}: {}", context, msg)),
            Self::Parse(msg) => Self::Parse(format!("{}: {}", context, msg)),
            Self::Export(msg) => Self::Export(format!("{}: {}", context, msg)),
            Self::Internal(msg) => Self::Internal(format!("{}: {}", context, msg)),
            cancelled @ Self::Cancelled { .. } => cancelled,
        }
    }

    /// Format error for console display with color coding
    pub fn format_for_console(&self, use_color: bool) -> String {
        let category = self.category();
        let message = self.to_string();

        if use_color {
            use colored::Colorize;
            match self {
                Self::Config(_) | Self::InvalidConfiguration(_) | Self::Parse(_) => {
                    format!("[{}] {}", category.red().bold(), message.red())
                }
                Self::ProbeUnavailable(_) | Self::MalformedProbeOutput(_) => {
                    format!("[{}] {}", category.yellow().bold(), message.yellow())
                }
                Self::Cancelled { .. } => {
                    format!("[{}] {}", category.blue().bold(), message.blue())
                }
                Self::Io(_) | Self::Export(_) => {
                    format!("[{}] {}", category.cyan().bold(), message.cyan())
                }
                Self::Internal(_) => {
                    format!("[{}] {}", category.bright_red().bold(), message.bright_red())
                }
            }
        } else {
            format!("[{}] {}", category, message)
        }
    }
}

// Standard library error conversions
impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<url::ParseError> for AppError {
    fn from(error: url::ParseError) -> Self {
        Self::parse(format!("URL parse error: {}", error))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::export(format!("JSON error: {}", error))
    }
}

impl From<csv::Error> for AppError {
    fn from(error: csv::Error) -> Self {
        Self::export(format!("CSV error: {}", error))
    }
}

impl From<dotenv::Error> for AppError {
    fn from(error: dotenv::Error) -> Self {
        Self::config(format!("Environment file error: {}", error))
    }
}

impl From<std::num::ParseIntError> for AppError {
    fn from(error: std::num::ParseIntError) -> Self {
        Self::parse(format!("Integer parse error: {}", error))
    }
}

impl From<std::num::ParseFloatError> for AppError {
    fn from(error: std::num::ParseFloatError) -> Self {
        Self::parse(format!("Float parse error: {}", error))
    }
}

impl From<std::str::ParseBoolError> for AppError {
    fn from(error: std::str::ParseBoolError) -> Self {
        Self::parse(format!("Boolean parse error: {}", error))
    }
}

// Anyhow integration
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::internal(error.to_string())
    }
}

/// Custom Result type for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Error context trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add context to an error
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;

    /// Add static context to an error
    fn context(self, message: &'static str) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<AppError>,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.into().with_prefix(&f()))
    }

    fn context(self, message: &'static str) -> Result<T> {
        self.with_context(|| message.to_string())
    }
}

/// Error reporter for user feedback on stderr
pub struct ErrorReporter {
    pub use_color: bool,
    pub verbose: bool,
}

impl ErrorReporter {
    /// Create a new error reporter
    pub fn new(use_color: bool, verbose: bool) -> Self {
        Self { use_color, verbose }
    }

    /// Render an error the way `report_error` prints it
    pub fn render(&self, error: &AppError) -> String {
        let mut output = error.format_for_console(self.use_color);

        if self.verbose {
            output.push_str("\n\n");
            output.push_str(&error.user_friendly_message());

            if error.is_recoverable() {
                let hint = "This error might be temporary. You can try running the command again.";
                output.push_str("\n\n");
                if self.use_color {
                    use colored::Colorize;
                    output.push_str(&hint.green().to_string());
                } else {
                    output.push_str(hint);
                }
            }
        }

        output
    }

    /// Report an error to the user
    pub fn report_error(&self, error: &AppError) {
        eprintln!("{}", self.render(error));
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}
