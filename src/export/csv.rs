//! CSV export of the result table.
//!
//! Header row is the five metric columns followed by "Request Number"; one
//! row per request with millisecond values printed to microsecond precision.

use crate::{
    error::{AppError, ErrorContext, Result},
    models::{ResultTable, TableRow, REQUEST_NUMBER_COLUMN},
    types::Metric,
};
use csv::{Reader, Writer};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Format a millisecond value for CSV output
pub fn format_millis(value: f64) -> String {
    format!("{:.3}", value)
}

/// Write the table as CSV to any writer
pub fn write_csv<W: Write>(table: &ResultTable, writer: W) -> Result<()> {
    let mut writer = Writer::from_writer(writer);

    writer.write_record(ResultTable::columns())?;

    for row in table.rows() {
        let mut record: Vec<String> = row.values.iter().map(|v| format_millis(*v)).collect();
        record.push(row.request_number.to_string());
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

/// Render the table as a CSV string
pub fn to_csv_string(table: &ResultTable) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(table, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| AppError::export(format!("CSV output is not UTF-8: {}", e)))
}

/// Write the table to a CSV file, replacing any existing file
pub fn save_csv(table: &ResultTable, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file {}", path.display()))?;
    write_csv(table, file).with_context(|| format!("Failed to write {}", path.display()))
}

/// Read a CSV produced by [`write_csv`] back into a table
pub fn read_csv<R: Read>(reader: R) -> Result<ResultTable> {
    let mut reader = Reader::from_reader(reader);

    let headers = reader.headers()?.clone();
    let mut metric_columns: [Option<usize>; 5] = [None; 5];
    let mut request_column = None;

    for (position, header) in headers.iter().enumerate() {
        let header = header.trim();
        if header == REQUEST_NUMBER_COLUMN {
            request_column = Some(position);
        } else if let Some(metric) = Metric::from_column_header(header) {
            metric_columns[metric.index()] = Some(position);
        } else {
            return Err(AppError::export(format!("unexpected CSV column '{}'", header)));
        }
    }

    let request_column = request_column
        .ok_or_else(|| AppError::export(format!("CSV is missing the '{}' column", REQUEST_NUMBER_COLUMN)))?;

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        let field = |position: usize| {
            record.get(position).map(str::trim).ok_or_else(|| {
                AppError::export(format!("CSV row {} is missing column {}", line + 1, position + 1))
            })
        };

        let mut values = [0.0; 5];
        for metric in Metric::ALL {
            let position = metric_columns[metric.index()].ok_or_else(|| {
                AppError::export(format!("CSV is missing the '{}' column", metric.column_header()))
            })?;
            values[metric.index()] = field(position)?.parse::<f64>()
                .with_context(|| format!("CSV row {} column '{}'", line + 1, metric.column_header()))?;
        }

        let request_number = field(request_column)?.parse::<u32>()
            .with_context(|| format!("CSV row {} column '{}'", line + 1, REQUEST_NUMBER_COLUMN))?;

        rows.push(TableRow { request_number, values });
    }

    Ok(ResultTable::from_rows(rows))
}
