//! Core formatting traits and implementations
//!
//! This module defines the output formatting interface and provides
//! a plain text implementation with table and bar chart rendering.

use crate::{
    error::{AppError, Result},
    export::{format_millis, RunReport},
    models::ResultTable,
    report::ChartSpec,
    stats::MetricSummary,
};
use std::fmt::Write as _;

/// Main trait for output formatting
pub trait OutputFormatter {
    /// Format a header section
    fn format_header(&self, title: &str) -> Result<String>;

    /// Format the run parameters (target, request count, delay, probe)
    fn format_run_info(&self, report: &RunReport) -> Result<String>;

    /// Format the per-request result table
    fn format_table(&self, table: &ResultTable) -> Result<String>;

    /// Format per-metric summary statistics
    fn format_summary(&self, summaries: &[MetricSummary]) -> Result<String>;

    /// Format the grouped bar chart
    fn format_chart(&self, chart: &ChartSpec) -> Result<String>;

    /// Format error messages
    fn format_error(&self, error: &str) -> Result<String>;

    /// Format warning messages
    fn format_warning(&self, warning: &str) -> Result<String>;

    /// Format success messages
    fn format_success(&self, message: &str) -> Result<String>;
}

/// Configuration options for formatting
#[derive(Debug, Clone)]
pub struct FormattingOptions {
    /// Enable colored output
    pub enable_color: bool,
    /// Enable verbose mode with detailed information
    pub verbose_mode: bool,
    /// Show table borders
    pub table_borders: bool,
    /// Width of the longest chart bar in characters
    pub chart_width: usize,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            enable_color: true,
            verbose_mode: false,
            table_borders: true,
            chart_width: 40,
        }
    }
}

/// Table formatting configuration
#[derive(Debug, Clone)]
pub struct TableFormat {
    /// Column definitions
    pub columns: Vec<Column>,
    /// Show borders around table
    pub show_borders: bool,
    /// Show header row
    pub show_header: bool,
}

/// Column definition for table formatting
#[derive(Debug, Clone)]
pub struct Column {
    pub header: String,
    pub alignment: Alignment,
    pub min_width: usize,
    pub max_width: usize,
}

impl Column {
    pub fn new<S: Into<String>>(header: S, alignment: Alignment) -> Self {
        Self {
            header: header.into(),
            alignment,
            min_width: 6,
            max_width: 40,
        }
    }
}

/// Text alignment options
#[derive(Debug, Clone)]
pub enum Alignment {
    Left,
    Right,
    Center,
}

/// Row data for table formatting
pub type RowData = Vec<String>;

/// Gridline positions across the chart width (quarters)
const GRIDLINES: usize = 4;

/// Length in characters of the bar for `value` on a scale where `max` fills `width`
pub fn bar_length(value: f64, max: f64, width: usize) -> usize {
    if max <= 0.0 || !value.is_finite() || value <= 0.0 {
        return 0;
    }
    let length = (value / max * width as f64).round() as usize;
    length.clamp(1, width)
}

/// Whether column `position` of a bar area of `width` carries a gridline
fn is_gridline(position: usize, width: usize) -> bool {
    width >= GRIDLINES && position > 0 && position % (width / GRIDLINES) == 0
}

/// Render a chart as text, one line per (request, metric) pair.
///
/// `paint` receives the filled part of each bar and its value, so callers can
/// color bars without re-implementing the layout.
pub(crate) fn render_chart_text(
    chart: &ChartSpec,
    width: usize,
    fill: char,
    paint: &dyn Fn(String, f64) -> String,
) -> Result<String> {
    let mut output = String::new();

    if chart.categories.is_empty() {
        write!(output, "{}: no data", chart.title).map_err(fmt_error)?;
        return Ok(output);
    }

    let label_width = chart
        .series
        .iter()
        .map(|s| s.metric.name().len())
        .max()
        .unwrap_or(0);
    let category_width = chart.categories.iter().map(|c| c.len()).max().unwrap_or(0);
    let max = chart.max_value();
    let indent = category_width + label_width + 3;

    writeln!(output, "{}", chart.title).map_err(fmt_error)?;

    // Scale line: 0 at the left edge, the maximum at the right edge
    let max_label = format!("{:.1}", max);
    writeln!(
        output,
        "{:indent$}0{:>pad$} {}",
        "",
        max_label,
        chart.y_label,
        indent = indent,
        pad = width.saturating_sub(1).max(max_label.len()),
    )
    .map_err(fmt_error)?;

    for (index, category) in chart.categories.iter().enumerate() {
        for (series_index, series) in chart.series.iter().enumerate() {
            let value = series.values.get(index).copied().unwrap_or(0.0);
            let filled = bar_length(value, max, width);

            let mut rest = String::with_capacity(width - filled);
            for position in filled..width {
                if chart.gridlines && is_gridline(position, width) {
                    rest.push(':');
                } else {
                    rest.push(' ');
                }
            }

            let group = if series_index == 0 { category.as_str() } else { "" };
            writeln!(
                output,
                "{:<cw$} {:<lw$} |{}{}| {}",
                group,
                series.metric.name(),
                paint(fill.to_string().repeat(filled), value),
                rest,
                format_millis(value),
                cw = category_width,
                lw = label_width,
            )
            .map_err(fmt_error)?;
        }
    }

    write!(output, "{:indent$}{}", "", chart.x_label, indent = indent).map_err(fmt_error)?;
    Ok(output)
}

pub(crate) fn fmt_error(e: std::fmt::Error) -> AppError {
    AppError::internal(format!("Failed to format output: {}", e))
}

/// Format a millisecond duration in human-readable form
pub fn format_duration(duration_ms: f64) -> String {
    if duration_ms < 1.0 {
        format!("{:.0}μs", duration_ms * 1000.0)
    } else if duration_ms < 1000.0 {
        format!("{:.1}ms", duration_ms)
    } else if duration_ms < 60000.0 {
        format!("{:.2}s", duration_ms / 1000.0)
    } else {
        let minutes = (duration_ms / 60000.0) as u32;
        let seconds = (duration_ms % 60000.0) / 1000.0;
        format!("{}m{:.1}s", minutes, seconds)
    }
}

/// Rows of the per-request table, values in milliseconds
pub(crate) fn table_rows(table: &ResultTable) -> Vec<RowData> {
    table
        .rows()
        .iter()
        .map(|row| {
            let mut cells: RowData = row.values.iter().map(|v| format_millis(*v)).collect();
            cells.push(row.request_number.to_string());
            cells
        })
        .collect()
}

pub(crate) const SUMMARY_HEADERS: [&str; 7] =
    ["Metric", "Min", "Mean", "Median", "P95", "Max", "Std Dev"];

pub(crate) fn summary_rows(summaries: &[MetricSummary]) -> Vec<RowData> {
    summaries
        .iter()
        .map(|s| {
            vec![
                s.metric.name().to_string(),
                format_duration(s.min_ms),
                format_duration(s.mean_ms),
                format_duration(s.median_ms),
                format_duration(s.p95_ms),
                format_duration(s.max_ms),
                format_duration(s.std_dev_ms),
            ]
        })
        .collect()
}

/// Plain text formatter implementation
pub struct PlainFormatter {
    options: FormattingOptions,
}

impl PlainFormatter {
    /// Create a new plain formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }

    /// Create a table with the given format and data
    pub fn create_table(&self, format: &TableFormat, rows: &[RowData]) -> String {
        let column_widths = self.calculate_column_widths(format, rows);
        let mut output = String::new();

        if format.show_header && !format.columns.is_empty() {
            if format.show_borders {
                output.push_str(&self.create_horizontal_border(&column_widths));
                output.push('\n');
            }

            let headers: Vec<String> = format.columns.iter().map(|c| c.header.clone()).collect();
            output.push_str(&self.create_row(&headers, &column_widths, format));
            output.push('\n');

            if format.show_borders {
                output.push_str(&self.create_horizontal_border(&column_widths));
                output.push('\n');
            }
        }

        for row in rows {
            output.push_str(&self.create_row(row, &column_widths, format));
            output.push('\n');
        }

        if format.show_borders {
            output.push_str(&self.create_horizontal_border(&column_widths));
        }

        output.trim_end_matches('\n').to_string()
    }

    fn calculate_column_widths(&self, format: &TableFormat, rows: &[RowData]) -> Vec<usize> {
        let num_columns = format
            .columns
            .len()
            .max(rows.iter().map(|r| r.len()).max().unwrap_or(0));

        (0..num_columns)
            .map(|col_idx| {
                let column = format.columns.get(col_idx);
                let mut width = column
                    .map(|c| c.min_width.max(c.header.chars().count()))
                    .unwrap_or(0);

                for row in rows {
                    if let Some(cell) = row.get(col_idx) {
                        width = width.max(cell.chars().count());
                    }
                }

                match column {
                    Some(c) => width.min(c.max_width.max(c.header.chars().count())),
                    None => width,
                }
            })
            .collect()
    }

    fn create_row(&self, data: &[String], widths: &[usize], format: &TableFormat) -> String {
        let mut row = String::new();

        if format.show_borders {
            row.push('|');
        }

        for (idx, (cell, &width)) in data.iter().zip(widths.iter()).enumerate() {
            let alignment = format
                .columns
                .get(idx)
                .map(|c| &c.alignment)
                .unwrap_or(&Alignment::Left);

            if format.show_borders {
                row.push(' ');
            }
            row.push_str(&align_text(cell, width, alignment));
            if format.show_borders {
                row.push_str(" |");
            } else {
                row.push_str("  ");
            }
        }

        row.trim_end().to_string()
    }

    fn create_horizontal_border(&self, widths: &[usize]) -> String {
        let mut border = String::new();

        if !widths.is_empty() {
            border.push('+');
            for &width in widths {
                border.push_str(&"-".repeat(width + 2));
                border.push('+');
            }
        }

        border
    }

    fn results_format(&self) -> TableFormat {
        TableFormat {
            columns: ResultTable::columns()
                .into_iter()
                .map(|header| Column::new(header, Alignment::Right))
                .collect(),
            show_borders: self.options.table_borders,
            show_header: true,
        }
    }

    fn summary_format(&self) -> TableFormat {
        TableFormat {
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
        }
    }
}

/// Align text within specified width, truncating when it does not fit
pub fn align_text(text: &str, width: usize, alignment: &Alignment) -> String {
    let length = text.chars().count();
    if length >= width {
        return text.chars().take(width).collect();
    }

    let padding = width - length;
    match alignment {
        Alignment::Left => format!("{}{}", text, " ".repeat(padding)),
        Alignment::Right => format!("{}{}", " ".repeat(padding), text),
        Alignment::Center => {
            let left_pad = padding / 2;
            let right_pad = padding - left_pad;
            format!("{}{}{}", " ".repeat(left_pad), text, " ".repeat(right_pad))
        }
    }
}

impl OutputFormatter for PlainFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let mut output = String::new();
        let border = "=".repeat(title.chars().count() + 4);

        writeln!(output, "{}", border).map_err(fmt_error)?;
        writeln!(output, "  {}  ", title).map_err(fmt_error)?;
        write!(output, "{}", border).map_err(fmt_error)?;

        Ok(output)
    }

    fn format_run_info(&self, report: &RunReport) -> Result<String> {
        let mut output = String::new();

        writeln!(output, "Target:    {}", report.target_url).map_err(fmt_error)?;
        writeln!(output, "Requests:  {}", report.num_requests).map_err(fmt_error)?;
        write!(output, "Delay:     {}s", report.delay_seconds).map_err(fmt_error)?;
        if self.options.verbose_mode {
            write!(output, "\nProbe:     {}", report.probe).map_err(fmt_error)?;
            write!(output, "\nGenerated: {}", report.generated_at.to_rfc3339()).map_err(fmt_error)?;
        }

        Ok(output)
    }

    fn format_table(&self, table: &ResultTable) -> Result<String> {
        if table.is_empty() {
            return Ok("No requests were recorded.".to_string());
        }
        Ok(self.create_table(&self.results_format(), &table_rows(table)))
    }

    fn format_summary(&self, summaries: &[MetricSummary]) -> Result<String> {
        let mut output = String::new();

        writeln!(output, "Summary:").map_err(fmt_error)?;
        writeln!(output, "--------").map_err(fmt_error)?;
        output.push_str(&self.create_table(&self.summary_format(), &summary_rows(summaries)));

        Ok(output)
    }

    fn format_chart(&self, chart: &ChartSpec) -> Result<String> {
        render_chart_text(chart, self.options.chart_width, '#', &|bar: String, _value: f64| bar)
    }

    fn format_error(&self, error: &str) -> Result<String> {
        Ok(format!("ERROR: {}", error))
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("WARNING: {}", warning))
    }

    fn format_success(&self, message: &str) -> Result<String> {
        Ok(format!("SUCCESS: {}", message))
    }
}
