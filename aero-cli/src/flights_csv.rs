//! Flight CSV reading.
//!
//! Rows are returned as raw strings; column meaning is applied later by
//! `aero_core::normalize_row`. Short rows are kept so they can be reported.

use anyhow::Context;
use std::io::Read;
use std::path::Path;

/// Read up to `max_rows` data rows from a flight CSV file with a header row.
pub fn read_rows(path: &Path, max_rows: usize) -> anyhow::Result<Vec<Vec<String>>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open flight file {}", path.display()))?;
    read_from(file, max_rows).with_context(|| format!("Failed to read {}", path.display()))
}

fn read_from<R: Read>(input: R, max_rows: usize) -> anyhow::Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let mut rows = Vec::new();
    for record in reader.records().take(max_rows) {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    tracing::debug!("Read {} flight rows", rows.len());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
id,year,month,day,dep_time,sched_dep_time,dep_delay,arr_time,sched_arr_time,arr_delay,carrier,flight,tailnum,origin,dest,air_time,distance,hour,minute,time_hour,name
0,2013,1,1,517.0,515,2.0,830.0,819,11.0,UA,1545,N14228,EWR,IAH,227.0,1400,5,15,2013-01-01 05:00:00,United Air Lines Inc.
1,2013,1,1,533.0,529,4.0,850.0,830,20.0,UA,1714,N24211,LGA,IAH,227.0,1416,5,29,2013-01-01 05:00:00,\"United Air Lines Inc.\"
2,2013,1,1,542.0
";

    #[test]
    fn test_reads_rows_after_header() {
        let rows = read_from(SAMPLE.as_bytes(), 100).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][13], "EWR");
        assert_eq!(rows[1][20], "United Air Lines Inc.");
        assert_eq!(rows[2].len(), 5);
    }

    #[test]
    fn test_row_cap() {
        let rows = read_from(SAMPLE.as_bytes(), 1).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_rows(&dir.path().join("nope.csv"), 10).unwrap_err();
        assert!(err.to_string().contains("Failed to open flight file"));
    }
}
