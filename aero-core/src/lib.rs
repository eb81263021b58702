//! Aero Core - entity resolution and RDF graph assembly for airport data.
//!
//! This crate provides:
//! - Graph store (in-memory triple store, RDF/XML load and save, SPARQL)
//! - Schema and vocabulary for the airport ontology
//! - Entity resolver and relationship linker
//! - Flight row normalization and the graph builder
//! - Canned query catalog and Wikidata response decoding
//!
//! # Usage
//!
//! ```rust,no_run
//! use aero_core::{AirportRecord, GraphBuilder, GraphStore, TracingSink};
//!
//! let store = GraphStore::open("populated_airports.owl")?;
//! let mut builder = GraphBuilder::new(&store)?;
//! let records = vec![AirportRecord::new("http://www.wikidata.org/entity/Q9690", "Athens Intl")];
//! builder.add_airports(&records, &mut TracingSink)?;
//! let report = builder.finish()?;
//! store.save("populated_airports.owl")?;
//! println!("{} entities created", report.total_created());
//! # Ok::<(), aero_core::Error>(())
//! ```

#![warn(clippy::all)]

pub mod builder;
pub mod entity;
pub mod error;
pub mod events;
pub mod linker;
pub mod normalize;
pub mod queries;
pub mod records;
pub mod resolver;
pub mod schema;
pub mod store;
pub mod vocab;
pub mod wikidata;

pub use builder::GraphBuilder;
pub use entity::{sanitize, EntityRef};
pub use error::{Error, Result};
pub use events::{BuildEvent, BuildReport, EventSink, Stage, TracingSink};
pub use normalize::{normalize_row, NormalizedRow, RowError};
pub use queries::{CannedQuery, QuerySuite};
pub use records::{AirportRecord, FlightRecord};
pub use resolver::{EntitySpec, Resolution, Resolver};
pub use schema::{Attribute, EntityKind, Relation};
pub use store::{GraphStats, GraphStore, QueryTable};
