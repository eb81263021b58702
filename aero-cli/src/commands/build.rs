//! Build command - run both stages into one graph.
//!
//! Also holds what the stage commands share: loading the graphs a build
//! appends to, and the summary printed when a build finishes.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};

use aero_core::{BuildReport, EntityKind, GraphBuilder, GraphStore, TracingSink};

use crate::config::SourceSettings;
use crate::fetch;
use crate::flights_csv;
use crate::output::{Output, OutputFormat, TableDisplay};

/// Options for `aero build`.
#[derive(Debug)]
pub struct BuildOptions {
    pub csv: PathBuf,
    pub input: PathBuf,
    pub output: PathBuf,
    pub source: SourceSettings,
    pub max_rows: usize,
}

/// Result of a build stage, as printed to the user.
#[derive(Debug, Serialize)]
pub struct BuildSummary {
    pub output: String,
    /// Graph files loaded before the build
    pub loaded: Vec<String>,
    #[serde(flatten)]
    pub report: BuildReport,
}

impl BuildSummary {
    pub fn new(output: &Path, loaded: Vec<PathBuf>, report: BuildReport) -> Self {
        Self {
            output: output.display().to_string(),
            loaded: loaded.iter().map(|p| p.display().to_string()).collect(),
            report,
        }
    }
}

impl TableDisplay for BuildSummary {
    fn to_table(&self) -> String {
        let report = &self.report;
        let mut lines = Vec::new();

        lines.push(format!(
            "{} {}",
            "Wrote".green().bold(),
            self.output.bold()
        ));
        if !self.loaded.is_empty() {
            lines.push(format!("  {}: {}", "Loaded".cyan(), self.loaded.join(", ")));
        }

        lines.push(format!("  {}:", "Created".cyan()));
        for kind in EntityKind::ALL {
            let count = report.created(kind);
            if count > 0 {
                lines.push(format!("    {}: {}", kind, count));
            }
        }
        if report.total_created() == 0 {
            lines.push(format!("    {}", "nothing new".dimmed()));
        }

        lines.push(format!("  {}: {}", "Links".cyan(), report.links_added));
        lines.push(format!(
            "  {}: {} (+{})",
            "Triples".cyan(),
            report.triples_after,
            report.triples_added()
        ));

        if report.records_skipped > 0 {
            lines.push(format!(
                "  {}: {}",
                "Skipped rows".yellow(),
                report.records_skipped
            ));
        }
        if report.fields_skipped > 0 {
            lines.push(format!(
                "  {}: {}",
                "Skipped fields".yellow(),
                report.fields_skipped
            ));
        }
        if report.flights_dropped > 0 {
            lines.push(format!(
                "  {}: {} {}",
                "Dropped flights".yellow(),
                report.flights_dropped,
                "(unknown airport code)".dimmed()
            ));
        }

        lines.push(format!(
            "\n{}",
            format!("({} ms)", report.duration_ms).dimmed()
        ));

        lines.join("\n")
    }
}

/// Load the base ontology and any earlier output into a fresh store.
///
/// A missing base ontology is tolerated; the builder declares the schema
/// itself. Each path is loaded once.
pub fn open_base(base: &Path, output: &Path) -> Result<(GraphStore, Vec<PathBuf>)> {
    let store = GraphStore::new()?;
    let mut loaded = Vec::new();

    if store.load_if_exists(base)? {
        loaded.push(base.to_path_buf());
    } else {
        tracing::warn!(
            "Base ontology {} not found, starting from an empty graph",
            base.display()
        );
    }

    if output != base && store.load_if_exists(output)? {
        loaded.push(output.to_path_buf());
    }

    Ok((store, loaded))
}

/// Run the build command.
pub async fn run(options: BuildOptions, format: OutputFormat) -> Result<()> {
    // Flights are read before the endpoint is queried.
    let rows = flights_csv::read_rows(&options.csv, options.max_rows)?;

    let (store, loaded) = open_base(&options.input, &options.output)?;
    let records = fetch::fetch_airports(&options.source).await?;

    let mut builder = GraphBuilder::new(&store)?;
    builder.add_airports(&records, &mut TracingSink)?;
    builder.add_flight_rows(&rows, &mut TracingSink)?;
    let report = builder.finish()?;

    store.save(&options.output)?;

    Output::new(BuildSummary::new(&options.output, loaded, report), format).render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use aero_core::{AirportRecord, BuildEvent};

    #[test]
    fn test_open_base_loads_each_file_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.owl");

        let store = GraphStore::new().unwrap();
        let mut builder = GraphBuilder::new(&store).unwrap();
        builder
            .add_airports(
                &[AirportRecord::new("http://www.wikidata.org/entity/Q9690", "Athens")],
                &mut Vec::<BuildEvent>::new(),
            )
            .unwrap();
        builder.finish().unwrap();
        store.save(&path).unwrap();

        let (reopened, loaded) = open_base(&path, &path).unwrap();
        assert_eq!(loaded, vec![path.clone()]);
        assert_eq!(reopened.len().unwrap(), store.len().unwrap());
    }

    #[test]
    fn test_open_base_without_files() {
        let dir = tempfile::tempdir().unwrap();
        let (store, loaded) =
            open_base(&dir.path().join("base.rdf"), &dir.path().join("out.owl")).unwrap();
        assert!(loaded.is_empty());
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_summary_table_lists_created_kinds() {
        let mut report = BuildReport::default();
        report.created.insert(EntityKind::Airport, 3);
        report.flights_dropped = 2;
        let summary = BuildSummary::new(Path::new("out.owl"), vec![], report);

        let table = summary.to_table();
        assert!(table.contains("out.owl"));
        assert!(table.contains("airport: 3"));
        assert!(table.contains("Dropped flights"));
        assert!(!table.contains("Skipped rows"));
    }

    #[test]
    fn test_summary_json_is_flat() {
        let summary = BuildSummary::new(Path::new("out.owl"), vec![], BuildReport::default());
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["output"], "out.owl");
        assert_eq!(json["links_added"], 0);
    }
}
