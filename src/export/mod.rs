//! Export of finished runs: CSV table files and the JSON run report.

pub mod csv;
pub mod json;

pub use self::csv::{format_millis, read_csv, save_csv, to_csv_string, write_csv};
pub use self::json::{to_json_string, RunReport};
