//! CSV output formatting for data export.
//!
//! Quoting is left to the `csv` writer.

use super::OutputConfig;
use serde::Serialize;

/// CSV output formatter
pub struct CsvOutput;

impl CsvOutput {
    /// Format a serializable value as CSV.
    ///
    /// Objects become one header row and one value row. Nested values are
    /// written as compact JSON.
    pub fn format<T: Serialize>(data: &T, _config: &OutputConfig) -> String {
        match serde_json::to_value(data) {
            Ok(serde_json::Value::Object(obj)) => {
                let headers: Vec<&str> = obj.keys().map(|s| s.as_str()).collect();
                let values: Vec<String> = obj.values().map(Self::value_to_csv).collect();
                Self::write_records(&headers, std::iter::once(values))
            }
            Ok(other) => Self::value_to_csv(&other),
            Err(_) => String::new(),
        }
    }

    /// Write a header row followed by data rows.
    pub fn from_rows<I, R>(headers: &[&str], rows: I) -> String
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator,
        R::Item: AsRef<[u8]>,
    {
        Self::write_records(headers, rows)
    }

    fn write_records<I, R>(headers: &[&str], rows: I) -> String
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator,
        R::Item: AsRef<[u8]>,
    {
        let mut writer = csv::Writer::from_writer(Vec::new());
        let written = writer.write_record(headers).and_then(|_| {
            for row in rows {
                writer.write_record(row)?;
            }
            Ok(())
        });
        if let Err(e) = written {
            tracing::warn!("Failed to write CSV: {}", e);
        }

        match writer.into_inner() {
            Ok(bytes) => String::from_utf8_lossy(&bytes).trim_end().to_string(),
            Err(e) => {
                tracing::warn!("Failed to flush CSV: {}", e);
                String::new()
            }
        }
    }

    fn value_to_csv(value: &serde_json::Value) -> String {
        match value {
            serde_json::Value::Null => String::new(),
            serde_json::Value::Bool(b) => b.to_string(),
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::String(s) => s.clone(),
            nested => nested.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;

    #[derive(Serialize)]
    struct Row {
        name: String,
        runways: u32,
    }

    #[test]
    fn test_format_object() {
        let config = OutputConfig::new(OutputFormat::Csv);
        let output = CsvOutput::format(
            &Row {
                name: "Athens, Intl".to_string(),
                runways: 2,
            },
            &config,
        );

        assert_eq!(output, "name,runways\n\"Athens, Intl\",2");
    }

    #[test]
    fn test_from_rows_escapes_quotes() {
        let rows = vec![vec!["say \"hi\"".to_string(), "x".to_string()]];
        let output = CsvOutput::from_rows(&["a", "b"], rows);
        assert_eq!(output, "a,b\n\"say \"\"hi\"\"\",x");
    }
}
