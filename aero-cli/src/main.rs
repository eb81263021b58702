//! Aero CLI - build and query an airport knowledge graph.
//!
//! Fetches airports from Wikidata, adds flights from a CSV export, writes the
//! result as RDF/XML and runs canned SPARQL queries over it.

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod constants;
mod fetch;
mod flights_csv;
mod output;

use commands::*;
use config::AeroConfig;
use output::OutputFormat;

/// Build and query an airport/flight knowledge graph.
#[derive(Parser)]
#[command(name = "aero")]
#[command(author, version)]
#[command(about = "Build and query an airport/flight knowledge graph")]
#[command(propagate_version = true)]
#[command(after_help = "Quick Start:
  aero airports                   Fetch airports into populated_airports.owl
  aero flights --csv flights.csv  Add flights into populated_flights.owl
  aero query --suite flights      Pick a canned query from a menu
  aero status                     Show what the graph holds")]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format (overrides config default)
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch airports from Wikidata and add countries, cities, airports and runways
    Airports {
        /// Base ontology loaded before the new entities are added
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output graph (RDF/XML); existing content is kept
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Maximum number of rows requested from the endpoint
        #[arg(short, long)]
        limit: Option<usize>,

        /// SPARQL endpoint URL
        #[arg(long)]
        endpoint: Option<String>,
    },

    /// Add airlines and flights from a CSV file to an airport graph
    Flights {
        /// Flight CSV file
        #[arg(long)]
        csv: PathBuf,

        /// Airport graph to add flights to
        #[arg(short, long)]
        graph: Option<PathBuf>,

        /// Output graph (RDF/XML); existing content is kept
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Maximum number of CSV rows to read
        #[arg(long)]
        max_rows: Option<usize>,
    },

    /// Run the airport and flight stages into one output graph
    Build {
        /// Flight CSV file
        #[arg(long)]
        csv: PathBuf,

        /// Base ontology loaded before the new entities are added
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output graph (RDF/XML); existing content is kept
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Maximum number of rows requested from the endpoint
        #[arg(short, long)]
        limit: Option<usize>,

        /// SPARQL endpoint URL
        #[arg(long)]
        endpoint: Option<String>,

        /// Maximum number of CSV rows to read
        #[arg(long)]
        max_rows: Option<usize>,
    },

    /// Run canned SPARQL queries against a graph
    #[command(visible_alias = "q")]
    Query {
        /// Graph file to query (defaults to the suite's output file)
        #[arg(short, long)]
        graph: Option<PathBuf>,

        /// Query suite
        #[arg(short, long, value_enum, default_value = "airports")]
        suite: query::SuiteArg,

        /// Run one query by number and exit
        #[arg(long)]
        select: Option<String>,

        /// Print the query menu and exit
        #[arg(long)]
        list: bool,
    },

    /// Show triple and entity counts for a graph
    #[command(visible_alias = "st")]
    Status {
        /// Graph file (defaults to the flights graph, then the airports graph)
        #[arg(short, long)]
        graph: Option<PathBuf>,
    },
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    // Load configuration from .aerorc.toml
    let config = AeroConfig::load(std::path::Path::new("."));

    // Resolve output format: CLI flag > config default > Table
    let format = cli.format.unwrap_or_else(|| {
        config
            .default_format()
            .and_then(|f| f.parse().ok())
            .unwrap_or(OutputFormat::Table)
    });

    if let Some(use_color) = config.use_color() {
        colored::control::set_override(use_color);
    }

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            let _ = Cli::command().print_help();
            println!();
            return Ok(());
        }
    };

    match command {
        Commands::Airports {
            input,
            output,
            limit,
            endpoint,
        } => {
            let options = airports::AirportOptions {
                input: input.unwrap_or_else(|| config.ontology_path()),
                output: output.unwrap_or_else(|| config.airports_path()),
                source: config.source_settings(endpoint, limit),
            };
            airports::run(options, format).await
        }
        Commands::Flights {
            csv,
            graph,
            output,
            max_rows,
        } => {
            let options = flights::FlightOptions {
                csv,
                graph: graph.unwrap_or_else(|| config.airports_path()),
                output: output.unwrap_or_else(|| config.flights_path()),
                max_rows: max_rows.unwrap_or_else(|| config.max_rows()),
            };
            flights::run(options, format).await
        }
        Commands::Build {
            csv,
            input,
            output,
            limit,
            endpoint,
            max_rows,
        } => {
            let options = build::BuildOptions {
                csv,
                input: input.unwrap_or_else(|| config.ontology_path()),
                output: output.unwrap_or_else(|| config.flights_path()),
                source: config.source_settings(endpoint, limit),
                max_rows: max_rows.unwrap_or_else(|| config.max_rows()),
            };
            build::run(options, format).await
        }
        Commands::Query {
            graph,
            suite,
            select,
            list,
        } => {
            let graph = graph.unwrap_or_else(|| match suite {
                query::SuiteArg::Airports => config.airports_path(),
                query::SuiteArg::Flights => config.flights_path(),
            });
            query::run(&graph, suite.into(), select.as_deref(), list, format).await
        }
        Commands::Status { graph } => {
            let graph = graph.unwrap_or_else(|| config.default_graph_path());
            status::run(&graph, format).await
        }
    }
}
