//! Colored formatter implementation with terminal color support
//!
//! Layout is shared with [`PlainFormatter`]; this formatter adds ANSI colors
//! keyed on [`PerformanceLevel`] and a few Unicode markers.

use super::formatter::{
    fmt_error, render_chart_text, summary_rows, table_rows, Alignment, Column, FormattingOptions,
    OutputFormatter, PlainFormatter, TableFormat, SUMMARY_HEADERS,
};
use crate::{
    error::Result,
    export::RunReport,
    models::ResultTable,
    report::ChartSpec,
    stats::MetricSummary,
    types::{Metric, PerformanceLevel},
};
use colored::*;
use std::fmt::Write as _;

/// Color for a performance level
pub fn level_color(level: PerformanceLevel) -> Color {
    match level {
        PerformanceLevel::Good => Color::Green,
        PerformanceLevel::Moderate => Color::Yellow,
        PerformanceLevel::Poor => Color::Red,
    }
}

/// Color scheme configuration
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub header: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub border: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            header: Color::Blue,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            info: Color::Cyan,
            border: Color::BrightBlack,
        }
    }
}

/// Colored formatter implementation
pub struct ColoredFormatter {
    plain_formatter: PlainFormatter,
    options: FormattingOptions,
    color_scheme: ColorScheme,
}

impl ColoredFormatter {
    /// Create a new colored formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self::with_color_scheme(options, ColorScheme::default())
    }

    /// Create a colored formatter with custom color scheme
    pub fn with_color_scheme(options: FormattingOptions, color_scheme: ColorScheme) -> Self {
        let plain_formatter = PlainFormatter::new(options.clone());
        Self {
            plain_formatter,
            options,
            color_scheme,
        }
    }

    /// Apply color to text if colors are enabled
    fn colorize(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.color(color)
        } else {
            text.normal()
        }
    }

    /// Apply bold formatting if colors are enabled
    fn bold(&self, text: &str) -> ColoredString {
        if self.options.enable_color {
            text.bold()
        } else {
            text.normal()
        }
    }

    fn create_section_header(&self, title: &str, icon: &str) -> String {
        if self.options.enable_color {
            format!("{} {}", icon, title.bold().color(self.color_scheme.header))
        } else {
            format!("{} {}", icon, title)
        }
    }

    /// Color a rendered table: borders muted, header bold, each data row by `levels[i]`
    fn paint_table(&self, table: &str, levels: &[PerformanceLevel]) -> String {
        let mut data_row = 0;
        let mut seen_header = false;

        table
            .lines()
            .map(|line| {
                if line.starts_with('+') {
                    self.colorize(line, self.color_scheme.border).to_string()
                } else if !seen_header {
                    seen_header = true;
                    self.bold(line).to_string()
                } else {
                    let painted = match levels.get(data_row) {
                        Some(level) => self.colorize(line, level_color(*level)).to_string(),
                        None => line.to_string(),
                    };
                    data_row += 1;
                    painted
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ColoredFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let mut output = String::new();

        let decorated_title = format!("⏱  {}", title);
        let border = "═".repeat(decorated_title.chars().count() + 4);

        writeln!(output, "{}", self.colorize(&border, self.color_scheme.border)).map_err(fmt_error)?;
        let title = if self.options.enable_color {
            decorated_title.bold().color(self.color_scheme.header).to_string()
        } else {
            decorated_title.clone()
        };
        writeln!(output, "  {}  ", title).map_err(fmt_error)?;
        write!(output, "{}", self.colorize(&border, self.color_scheme.border)).map_err(fmt_error)?;

        Ok(output)
    }

    fn format_run_info(&self, report: &RunReport) -> Result<String> {
        let mut output = String::new();

        writeln!(output, "🎯 Target:   {}", self.colorize(&report.target_url, self.color_scheme.info))
            .map_err(fmt_error)?;
        writeln!(output, "🔁 Requests: {}", report.num_requests).map_err(fmt_error)?;
        write!(output, "⏳ Delay:    {}s", report.delay_seconds).map_err(fmt_error)?;
        if self.options.verbose_mode {
            write!(output, "\n🔧 Probe:    {}", report.probe).map_err(fmt_error)?;
        }

        Ok(output)
    }

    fn format_table(&self, table: &ResultTable) -> Result<String> {
        if table.is_empty() {
            return Ok(self.colorize("No requests were recorded.", self.color_scheme.warning).to_string());
        }

        let format = TableFormat {
            columns: ResultTable::columns()
                .into_iter()
                .map(|header| Column::new(header, Alignment::Right))
                .collect(),
            show_borders: self.options.table_borders,
            show_header: true,
        };
        let text = self.plain_formatter.create_table(&format, &table_rows(table));
        let levels: Vec<PerformanceLevel> = table
            .rows()
            .iter()
            .map(|row| PerformanceLevel::from_millis(row.get(Metric::Total)))
            .collect();

        let mut output = String::new();
        writeln!(output, "{}", self.create_section_header("Per-request timings", "📋")).map_err(fmt_error)?;
        output.push_str(&self.paint_table(&text, &levels));
        Ok(output)
    }

    fn format_summary(&self, summaries: &[MetricSummary]) -> Result<String> {
        let format = TableFormat {
            columns: SUMMARY_HEADERS
                .iter()
                .enumerate()
                .map(|(i, header)| {
                    let alignment = if i == 0 { Alignment::Left } else { Alignment::Right };
                    Column::new(*header, alignment)
                })
                .collect(),
            show_borders: self.options.table_borders,
            show_header: true,
        };
        let text = self.plain_formatter.create_table(&format, &summary_rows(summaries));
        let levels: Vec<PerformanceLevel> = summaries.iter().map(|s| s.performance_level()).collect();

        let mut output = String::new();
        writeln!(output, "{}", self.create_section_header("Summary", "📊")).map_err(fmt_error)?;
        output.push_str(&self.paint_table(&text, &levels));
        Ok(output)
    }

    fn format_chart(&self, chart: &ChartSpec) -> Result<String> {
        let enable_color = self.options.enable_color;
        let paint = move |bar: String, value: f64| {
            if enable_color {
                bar.color(level_color(PerformanceLevel::from_millis(value))).to_string()
            } else {
                bar
            }
        };
        render_chart_text(chart, self.options.chart_width, '█', &paint)
    }

    fn format_error(&self, error: &str) -> Result<String> {
        Ok(format!("❌ {}", self.colorize(error, self.color_scheme.error)))
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("⚠️  {}", self.colorize(warning, self.color_scheme.warning)))
    }

    fn format_success(&self, message: &str) -> Result<String> {
        Ok(format!("✅ {}", self.colorize(message, self.color_scheme.success)))
    }
}
