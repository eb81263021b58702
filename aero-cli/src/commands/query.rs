//! Query command - run canned SPARQL queries against a graph
//!
//! Without `--select` the command shows a numbered menu and keeps prompting
//! until `q` or end of input. Results print as a table with IRIs shortened
//! to their local names.

use anyhow::{anyhow, bail, Result};
use clap::ValueEnum;
use colored::Colorize;
use oxigraph::model::Term;
use serde::Serialize;
use std::io::{BufRead, Write};
use std::path::Path;

use aero_core::vocab::local_name;
use aero_core::{CannedQuery, GraphStore, QuerySuite, QueryTable};

use crate::output::{
    truncate, CsvOutput, Output, OutputConfig, OutputFormat, Outputter, TableDisplay, TableOutput,
};

/// Cells longer than this are cut when writing to a terminal.
const MAX_CELL_WIDTH: usize = 60;

/// Message printed for an unknown menu choice or `--select` value.
const INVALID_SELECTION: &str = "Invalid query selection.";

/// Query suite as a command-line value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SuiteArg {
    Airports,
    Flights,
}

impl From<SuiteArg> for QuerySuite {
    fn from(arg: SuiteArg) -> Self {
        match arg {
            SuiteArg::Airports => QuerySuite::Airports,
            SuiteArg::Flights => QuerySuite::Flights,
        }
    }
}

/// Shorten a result term for display.
///
/// IRIs show their local name, literals their lexical value.
pub fn display_term(term: &Term) -> String {
    match term {
        Term::NamedNode(node) => local_name(node.as_str()).to_string(),
        Term::Literal(literal) => literal.value().to_string(),
        Term::BlankNode(node) => format!("_:{}", node.as_str()),
        #[allow(unreachable_patterns)]
        other => other.to_string(),
    }
}

/// Result of one canned query, ready for output.
#[derive(Debug, Serialize)]
pub struct QueryView {
    pub query: String,
    pub columns: Vec<String>,
    /// Unbound cells are `None`
    pub rows: Vec<Vec<Option<String>>>,
    pub row_count: usize,
    pub execution_time_ms: u64,
}

impl QueryView {
    pub fn new(query: &CannedQuery, table: QueryTable) -> Self {
        let rows: Vec<Vec<Option<String>>> = table
            .rows
            .iter()
            .map(|row| row.iter().map(|cell| cell.as_ref().map(display_term)).collect())
            .collect();
        Self {
            query: query.name.to_string(),
            columns: table.columns,
            row_count: rows.len(),
            rows,
            execution_time_ms: table.execution_time_ms,
        }
    }

    fn cells(&self, config: &OutputConfig) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| {
                        let value = cell.as_deref().unwrap_or("");
                        if config.should_truncate() {
                            truncate(value, MAX_CELL_WIDTH)
                        } else {
                            value.to_string()
                        }
                    })
                    .collect()
            })
            .collect()
    }
}

impl Outputter for QueryView {
    fn to_table(&self, config: &OutputConfig) -> String {
        if self.rows.is_empty() {
            return format!("{}", "No results found.".dimmed());
        }

        let headers: Vec<&str> = self.columns.iter().map(String::as_str).collect();
        let table = TableOutput::from_rows(&headers, &self.cells(config), config);

        let footer = format!(
            "\n{} {} row(s) in {}ms",
            "Returned".dimmed(),
            self.row_count.to_string().cyan(),
            self.execution_time_ms.to_string().yellow()
        );

        format!("{}{}", table, footer)
    }

    fn to_csv(&self, _config: &OutputConfig) -> String {
        let headers: Vec<&str> = self.columns.iter().map(String::as_str).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| row.iter().map(|cell| cell.clone().unwrap_or_default()));
        CsvOutput::from_rows(&headers, rows)
    }
}

/// The numbered list of queries in a suite.
#[derive(Debug, Serialize)]
pub struct QueryMenu {
    pub suite: QuerySuite,
    pub queries: &'static [CannedQuery],
}

impl QueryMenu {
    pub fn new(suite: QuerySuite) -> Self {
        Self {
            suite,
            queries: suite.queries(),
        }
    }

    fn prompt(&self) -> String {
        format!("\nSelect a query (1-{}): ", self.queries.len())
    }
}

impl TableDisplay for QueryMenu {
    fn to_table(&self) -> String {
        self.queries
            .iter()
            .map(|q| format!("{}. {}", q.key, q.name))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Run one canned query, returning its view.
pub fn execute(store: &GraphStore, query: &CannedQuery) -> Result<QueryView> {
    tracing::debug!("Running query {}: {}", query.key, query.name);
    let table = store.query(&query.sparql())?;
    Ok(QueryView::new(query, table))
}

/// Interactive menu loop.
///
/// Reads one selection per line from `input`. Stops on `q`, `quit`, or end
/// of input. A failing query is reported and the menu shown again.
pub fn run_menu<R: BufRead, W: Write>(
    store: &GraphStore,
    suite: QuerySuite,
    config: &OutputConfig,
    mut input: R,
    out: &mut W,
) -> Result<()> {
    let menu = QueryMenu::new(suite);

    loop {
        writeln!(out, "{}", TableDisplay::to_table(&menu))?;
        write!(out, "{}", menu.prompt())?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            break;
        }

        let choice = line.trim();
        if choice.eq_ignore_ascii_case("q") || choice.eq_ignore_ascii_case("quit") {
            break;
        }

        let Some(query) = suite.get(choice) else {
            writeln!(out, "{}", INVALID_SELECTION)?;
            continue;
        };

        writeln!(out, "\nExecuting query: {}", query.name)?;
        match execute(store, query) {
            Ok(view) => writeln!(out, "\n{}\n", view.render(config))?,
            Err(e) => writeln!(out, "{} {}\n", "ERROR:".red().bold(), e)?,
        }
    }

    Ok(())
}

/// Run the query command.
pub async fn run(
    graph: &Path,
    suite: QuerySuite,
    select: Option<&str>,
    list: bool,
    format: OutputFormat,
) -> Result<()> {
    if list {
        return Output::new(QueryMenu::new(suite), format).render();
    }

    // Selection is checked before the graph is loaded.
    let selected = match select {
        Some(choice) => Some(suite.get(choice).ok_or_else(|| anyhow!(INVALID_SELECTION))?),
        None => None,
    };

    if !graph.exists() {
        let stage = match suite {
            QuerySuite::Airports => "airports",
            QuerySuite::Flights => "flights --csv <FILE>",
        };
        bail!(
            "Graph {} not found. Run 'aero {}' first.",
            graph.display(),
            stage
        );
    }

    let store = GraphStore::open(graph)?;

    if let Some(query) = selected {
        return Output::new(execute(&store, query)?, format).render();
    }

    println!("Loaded ontology with {} triples", store.len()?);
    let config = OutputConfig::auto_detect(format);
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    run_menu(&store, suite, &config, stdin.lock(), &mut stdout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aero_core::{AirportRecord, BuildEvent, GraphBuilder};
    use oxigraph::model::{BlankNode, Literal, NamedNode};
    use std::io::Cursor;

    fn sample_store() -> GraphStore {
        let store = GraphStore::new().unwrap();
        let mut builder = GraphBuilder::new(&store).unwrap();
        builder
            .add_airports(
                &[AirportRecord::new("http://www.wikidata.org/entity/Q9690", "Athens Intl")
                    .with_codes(Some("ATH"), Some("LGAV"))
                    .with_country("http://www.wikidata.org/entity/Q41", "Greece")],
                &mut Vec::<BuildEvent>::new(),
            )
            .unwrap();
        builder.finish().unwrap();
        store
    }

    fn plain() -> OutputConfig {
        OutputConfig::new(OutputFormat::Table).without_truncation()
    }

    fn run_with_input(input: &str) -> String {
        let store = sample_store();
        let mut out = Vec::new();
        run_menu(
            &store,
            QuerySuite::Airports,
            &plain(),
            Cursor::new(input.as_bytes()),
            &mut out,
        )
        .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_display_term_shortens_iris() {
        let iri = Term::NamedNode(NamedNode::new("http://example.org/airports#Airport_Q9690").unwrap());
        assert_eq!(display_term(&iri), "Airport_Q9690");

        let literal = Term::Literal(Literal::new_language_tagged_literal("Athens", "en").unwrap());
        assert_eq!(display_term(&literal), "Athens");

        let blank = Term::BlankNode(BlankNode::new("b0").unwrap());
        assert_eq!(display_term(&blank), "_:b0");
    }

    #[test]
    fn test_menu_runs_selection_then_quits() {
        let output = run_with_input("1\nq\n");
        assert!(output.contains("1. "));
        assert!(output.contains("Select a query (1-4): "));
        assert!(output.contains("Executing query: "));
        assert!(output.contains("Airport_Q9690"));
    }

    #[test]
    fn test_menu_rejects_unknown_choice() {
        let output = run_with_input("42\n");
        assert!(output.contains(INVALID_SELECTION));
        assert!(!output.contains("Executing query"));
    }

    #[test]
    fn test_menu_stops_at_end_of_input() {
        let output = run_with_input("");
        assert_eq!(output.matches("Select a query").count(), 1);
    }

    #[test]
    fn test_empty_result_message() {
        let store = GraphStore::new().unwrap();
        let query = QuerySuite::Flights.get("1").unwrap();
        let view = execute(&store, query).unwrap();
        assert!(view.to_table(&plain()).contains("No results found."));
    }

    #[test]
    fn test_view_csv_leaves_unbound_cells_empty() {
        let view = QueryView {
            query: "test".into(),
            columns: vec!["a".into(), "b".into()],
            rows: vec![vec![Some("x".into()), None]],
            row_count: 1,
            execution_time_ms: 0,
        };
        assert_eq!(view.to_csv(&plain()), "a,b\nx,");
    }

    #[test]
    fn test_list_shows_every_query() {
        let menu = QueryMenu::new(QuerySuite::Flights);
        let listing = TableDisplay::to_table(&menu);
        assert_eq!(listing.lines().count(), 9);
        assert!(listing.starts_with("1. "));
    }
}
