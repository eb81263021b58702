//! Airports command - fetch airports and add them to a graph.

use anyhow::Result;
use std::path::PathBuf;

use aero_core::{GraphBuilder, TracingSink};

use super::build::{open_base, BuildSummary};
use crate::config::SourceSettings;
use crate::fetch;
use crate::output::{Output, OutputFormat};

/// Options for `aero airports`.
#[derive(Debug)]
pub struct AirportOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    pub source: SourceSettings,
}

/// Run the airports command.
///
/// Countries, cities, airports and runways from the endpoint are resolved
/// against what the base ontology and the existing output already hold.
pub async fn run(options: AirportOptions, format: OutputFormat) -> Result<()> {
    let (store, loaded) = open_base(&options.input, &options.output)?;
    let records = fetch::fetch_airports(&options.source).await?;

    let mut builder = GraphBuilder::new(&store)?;
    builder.add_airports(&records, &mut TracingSink)?;
    let report = builder.finish()?;

    store.save(&options.output)?;

    Output::new(BuildSummary::new(&options.output, loaded, report), format).render()
}
