//! Status command - show what a graph file holds and what to run next.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::path::Path;
use std::time::Instant;

use aero_core::{EntityKind, GraphStats, GraphStore};

use crate::config::CONFIG_FILE;
use crate::output::{Output, OutputFormat, TableDisplay};

/// Status information for a graph file.
#[derive(Debug, Serialize)]
pub struct StatusInfo {
    pub graph_path: String,
    pub graph_exists: bool,
    /// Whether `.aerorc.toml` exists in the working directory
    pub config_exists: bool,
    pub stats: Option<GraphStats>,
    pub next_action: Option<String>,
    pub message: String,
    pub duration_ms: u64,
}

impl TableDisplay for StatusInfo {
    fn to_table(&self) -> String {
        let mut lines = Vec::new();

        if let Some(stats) = &self.stats {
            lines.push(format!("{}", "Aero Status: Ready".green().bold()));
            lines.push(format!("  {}: {}", "Graph".cyan(), self.graph_path));
            lines.push(format!("  {}: {}", "Triples".cyan(), stats.triple_count));
            lines.push(format!("  {}:", "Entities".cyan()));
            for kind in EntityKind::ALL {
                let count = stats.entity_counts.get(&kind).copied().unwrap_or(0);
                lines.push(format!("    {}: {}", kind, count));
            }
        } else {
            lines.push(format!("{}", "Aero Status: Not built".yellow().bold()));
            lines.push(format!("  {}: {}", "Graph".cyan(), self.graph_path));
            lines.push(format!("  {}", self.message));
        }

        lines.push(format!(
            "  {}: {}",
            "Config".cyan(),
            if self.config_exists { "Yes" } else { "No" }
        ));

        if let Some(action) = &self.next_action {
            lines.push(String::new());
            lines.push(format!("{}: {}", "Next action".yellow(), action));
        }

        lines.push(format!(
            "\n{}",
            format!("({} ms)", self.duration_ms).dimmed()
        ));

        lines.join("\n")
    }
}

/// Suggest the stage that would add what the graph lacks.
fn next_action(stats: &GraphStats) -> String {
    let count = |kind| stats.entity_counts.get(&kind).copied().unwrap_or(0);
    if count(EntityKind::Airport) == 0 {
        "aero airports".to_string()
    } else if count(EntityKind::Flight) == 0 {
        "aero flights --csv <FILE>".to_string()
    } else {
        "aero query --suite flights".to_string()
    }
}

/// Gather status for a graph file without modifying it.
pub fn collect(graph: &Path) -> StatusInfo {
    let start = Instant::now();
    let config_exists = Path::new(CONFIG_FILE).exists();
    let graph_exists = graph.exists();

    let mut stats = None;
    let next;
    let message;

    if graph_exists {
        match GraphStore::open(graph).and_then(|store| store.stats()) {
            Ok(s) => {
                message = format!("Graph holds {} triples.", s.triple_count);
                next = Some(next_action(&s));
                stats = Some(s);
            }
            Err(e) => {
                message = format!("Graph exists but could not be read: {}", e);
                next = Some("aero airports".to_string());
            }
        }
    } else {
        message = format!(
            "No graph at {}. Run 'aero airports' to build one.",
            graph.display()
        );
        next = Some("aero airports".to_string());
    }

    StatusInfo {
        graph_path: graph.display().to_string(),
        graph_exists,
        config_exists,
        stats,
        next_action: next,
        message,
        duration_ms: start.elapsed().as_millis() as u64,
    }
}

/// Run the status command.
pub async fn run(graph: &Path, format: OutputFormat) -> Result<()> {
    Output::new(collect(graph), format).render()
}
