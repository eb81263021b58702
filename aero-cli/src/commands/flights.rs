//! Flights command - add airlines and flights to an airport graph.

use anyhow::{bail, Result};
use std::path::PathBuf;

use aero_core::{GraphBuilder, TracingSink};

use super::build::{open_base, BuildSummary};
use crate::flights_csv;
use crate::output::{Output, OutputFormat};

/// Options for `aero flights`.
#[derive(Debug)]
pub struct FlightOptions {
    pub csv: PathBuf,
    /// Airport graph the flights refer to
    pub graph: PathBuf,
    pub output: PathBuf,
    pub max_rows: usize,
}

/// Run the flights command.
///
/// Flights are only linked to airports already in the graph, so the airport
/// graph must exist.
pub async fn run(options: FlightOptions, format: OutputFormat) -> Result<()> {
    if !options.graph.exists() {
        bail!(
            "Airport graph {} not found. Run 'aero airports' first.",
            options.graph.display()
        );
    }

    let rows = flights_csv::read_rows(&options.csv, options.max_rows)?;
    let (store, loaded) = open_base(&options.graph, &options.output)?;

    let mut builder = GraphBuilder::new(&store)?;
    builder.add_flight_rows(&rows, &mut TracingSink)?;
    let report = builder.finish()?;

    store.save(&options.output)?;

    Output::new(BuildSummary::new(&options.output, loaded, report), format).render()
}
