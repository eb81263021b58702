//! Build events and the summary report.
//!
//! The builder reports every non-trivial decision as a [`BuildEvent`]. Sinks
//! decide what to do with them: [`TracingSink`] logs, a `Vec<BuildEvent>`
//! collects.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info, warn};

use crate::schema::EntityKind;

/// Phase of a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Airports,
    Flights,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Airports => "airports",
            Stage::Flights => "flights",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Something that happened while building the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BuildEvent {
    /// A stage began with this many input records
    StageStarted { stage: Stage, records: usize },
    /// A new node was written
    EntityCreated { kind: EntityKind, key: String },
    /// An edge was written
    LinkAdded,
    /// A whole input record was ignored
    RecordSkipped {
        stage: Stage,
        index: usize,
        reason: String,
    },
    /// A field of a kept record was left out
    FieldSkipped {
        index: usize,
        field: String,
        value: String,
    },
    /// A flight referenced an airport that is not in the graph
    FlightDropped { key: String, missing_iata: String },
    /// A stage finished
    StageCompleted { stage: Stage, duration_ms: u64 },
}

/// Receiver for build events.
pub trait EventSink {
    fn emit(&mut self, event: BuildEvent);
}

impl EventSink for Vec<BuildEvent> {
    fn emit(&mut self, event: BuildEvent) {
        self.push(event);
    }
}

/// Logs events through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&mut self, event: BuildEvent) {
        match event {
            BuildEvent::StageStarted { stage, records } => {
                info!("Processing {} ({} records)", stage, records)
            }
            BuildEvent::EntityCreated { kind, key } => debug!("Added {} {}", kind, key),
            BuildEvent::LinkAdded => {}
            BuildEvent::RecordSkipped {
                stage,
                index,
                reason,
            } => warn!("Skipping {} record {}: {}", stage, index, reason),
            BuildEvent::FieldSkipped {
                index,
                field,
                value,
            } => warn!("Row {}: ignoring unparseable {} '{}'", index, field, value),
            BuildEvent::FlightDropped { key, missing_iata } => {
                debug!("Dropping flight {}: no airport with IATA '{}'", key, missing_iata)
            }
            BuildEvent::StageCompleted { stage, duration_ms } => {
                info!("Finished {} in {}ms", stage, duration_ms)
            }
        }
    }
}

/// Summary of a build.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildReport {
    pub created: BTreeMap<EntityKind, usize>,
    pub links_added: usize,
    pub records_skipped: usize,
    pub fields_skipped: usize,
    pub flights_dropped: usize,
    pub triples_before: usize,
    pub triples_after: usize,
    pub duration_ms: u64,
}

impl BuildReport {
    /// Fold one event into the counts.
    pub fn record(&mut self, event: &BuildEvent) {
        match event {
            BuildEvent::EntityCreated { kind, .. } => {
                *self.created.entry(*kind).or_insert(0) += 1;
            }
            BuildEvent::LinkAdded => self.links_added += 1,
            BuildEvent::RecordSkipped { .. } => self.records_skipped += 1,
            BuildEvent::FieldSkipped { .. } => self.fields_skipped += 1,
            BuildEvent::FlightDropped { .. } => self.flights_dropped += 1,
            BuildEvent::StageStarted { .. } | BuildEvent::StageCompleted { .. } => {}
        }
    }

    pub fn created(&self, kind: EntityKind) -> usize {
        self.created.get(&kind).copied().unwrap_or(0)
    }

    pub fn total_created(&self) -> usize {
        self.created.values().sum()
    }

    pub fn triples_added(&self) -> usize {
        self.triples_after.saturating_sub(self.triples_before)
    }
}
