//! Output formatting and display system
//!
//! Text rendering of a finished run (header, parameters, per-request table,
//! summary statistics and bar chart) in plain or colored form, plus the
//! console progress sink used while sampling.

mod colored;
mod formatter;
mod progress;

pub use self::colored::{level_color, ColorScheme, ColoredFormatter};
pub use formatter::{
    align_text, bar_length, format_duration, Alignment, Column, FormattingOptions, OutputFormatter,
    PlainFormatter, RowData, TableFormat,
};
pub use progress::{progress_line, ConsoleProgress};

use crate::{error::Result, export::RunReport};

pub const REPORT_TITLE: &str = "Curl Latency Test Results";

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a formatter based on color support and preferences
    pub fn create_formatter(enable_color: bool, verbose: bool) -> Box<dyn OutputFormatter> {
        let options = FormattingOptions {
            enable_color,
            verbose_mode: verbose,
            ..FormattingOptions::default()
        };

        if enable_color {
            Box::new(ColoredFormatter::new(options))
        } else {
            Box::new(PlainFormatter::new(options))
        }
    }

    /// Create a plain text formatter for scripts/logs
    pub fn create_plain_formatter() -> Box<dyn OutputFormatter> {
        Self::create_formatter(false, false)
    }
}

/// Assembles the sections of the text report
pub struct OutputCoordinator {
    formatter: Box<dyn OutputFormatter>,
    show_chart: bool,
}

impl OutputCoordinator {
    pub fn new(formatter: Box<dyn OutputFormatter>) -> Self {
        Self {
            formatter,
            show_chart: true,
        }
    }

    pub fn with_chart(mut self, show_chart: bool) -> Self {
        self.show_chart = show_chart;
        self
    }

    /// Render the full text report of a run
    pub fn display_results(&self, report: &RunReport) -> Result<String> {
        let mut sections = vec![
            self.formatter.format_header(REPORT_TITLE)?,
            self.formatter.format_run_info(report)?,
            self.formatter.format_table(&report.table)?,
        ];

        if !report.table.is_empty() {
            sections.push(self.formatter.format_summary(&report.summary)?);
            if self.show_chart {
                sections.push(self.formatter.format_chart(&report.chart)?);
            }
        }

        Ok(sections.join("\n\n"))
    }

    pub fn format_success(&self, message: &str) -> Result<String> {
        self.formatter.format_success(message)
    }

    pub fn format_warning(&self, message: &str) -> Result<String> {
        self.formatter.format_warning(message)
    }
}
