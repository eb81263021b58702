//! Table output formatting using the `tabled` crate

use super::{terminal_width, OutputConfig};
use tabled::{
    builder::Builder,
    settings::{style::Style, Width},
};

/// Table output formatter
pub struct TableOutput;

impl TableOutput {
    /// Create a simple table from rows of strings
    pub fn from_rows(headers: &[&str], rows: &[Vec<String>], config: &OutputConfig) -> String {
        if rows.is_empty() {
            return "(no results)".to_string();
        }

        let mut builder = Builder::default();
        builder.push_record(headers.iter().copied());

        for row in rows {
            builder.push_record(row.iter().map(|s| s.as_str()));
        }

        let mut table = builder.build();
        table.with(Style::rounded());
        if config.should_truncate() {
            table.with(Width::wrap(terminal_width()));
        }

        table.to_string()
    }
}
