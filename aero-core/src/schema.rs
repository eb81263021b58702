//! Schema definitions for the airport graph.
//!
//! Defines entity kinds, relationship kinds, datatype attributes, and the
//! OWL declarations (TBox) written alongside the data.

use oxigraph::model::{NamedNodeRef, TripleRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::error::Result;
use crate::store::GraphStore;
use crate::vocab::{self, owl, rdf, rdfs, xsd};

/// Kinds of entities in the airport graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Country,
    City,
    Airport,
    Runway,
    Airline,
    Flight,
}

impl EntityKind {
    /// All kinds, in the order a build must resolve them.
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Country,
        EntityKind::City,
        EntityKind::Airport,
        EntityKind::Runway,
        EntityKind::Airline,
        EntityKind::Flight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Country => "country",
            EntityKind::City => "city",
            EntityKind::Airport => "airport",
            EntityKind::Runway => "runway",
            EntityKind::Airline => "airline",
            EntityKind::Flight => "flight",
        }
    }

    /// The `owl:Class` this kind is typed with.
    pub fn class(&self) -> NamedNodeRef<'static> {
        match self {
            EntityKind::Country => vocab::COUNTRY,
            EntityKind::City => vocab::CITY,
            EntityKind::Airport => vocab::AIRPORT,
            EntityKind::Runway => vocab::RUNWAY,
            EntityKind::Airline => vocab::AIRLINE,
            EntityKind::Flight => vocab::FLIGHT,
        }
    }

    /// Local-name prefix of entity IRIs (`Country_Q41`).
    pub fn iri_prefix(&self) -> &'static str {
        match self {
            EntityKind::Country => "Country_",
            EntityKind::City => "City_",
            EntityKind::Airport => "Airport_",
            EntityKind::Runway => "Runway_",
            EntityKind::Airline => "Airline_",
            EntityKind::Flight => "Flight_",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Directed relationships between entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    /// City→Country, Airport→Country
    LocatedIn,
    /// Airport→City
    LocatedInCity,
    /// Airport→Runway
    HasRunway,
    /// Flight→Airport
    DepartsFrom,
    /// Flight→Airport
    ArrivesAt,
    /// Flight→Airline
    OperatedBy,
}

impl Relation {
    pub const ALL: [Relation; 6] = [
        Relation::LocatedIn,
        Relation::LocatedInCity,
        Relation::HasRunway,
        Relation::DepartsFrom,
        Relation::ArrivesAt,
        Relation::OperatedBy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::LocatedIn => "located_in",
            Relation::LocatedInCity => "located_in_city",
            Relation::HasRunway => "has_runway",
            Relation::DepartsFrom => "departs_from",
            Relation::ArrivesAt => "arrives_at",
            Relation::OperatedBy => "operated_by",
        }
    }

    pub fn predicate(&self) -> NamedNodeRef<'static> {
        match self {
            Relation::LocatedIn => vocab::IS_LOCATED_IN,
            Relation::LocatedInCity => vocab::IS_LOCATED_IN_CITY,
            Relation::HasRunway => vocab::HAS_RUNWAY,
            Relation::DepartsFrom => vocab::HAS_DEPARTURE_AIRPORT,
            Relation::ArrivesAt => vocab::HAS_ARRIVAL_AIRPORT,
            Relation::OperatedBy => vocab::OPERATED_BY,
        }
    }

    /// Whether an edge from `subject` to `object` fits the declared
    /// domain and range.
    pub fn accepts(&self, subject: EntityKind, object: EntityKind) -> bool {
        let (domain, range) = self.signature();
        domain.map_or(true, |d| d == subject) && range == object
    }

    /// Declared (domain, range) of the property. `LocatedIn` is used from
    /// both cities and airports, so its domain is left open.
    fn signature(&self) -> (Option<EntityKind>, EntityKind) {
        match self {
            Relation::LocatedIn => (None, EntityKind::Country),
            Relation::LocatedInCity => (Some(EntityKind::Airport), EntityKind::City),
            Relation::HasRunway => (Some(EntityKind::Airport), EntityKind::Runway),
            Relation::DepartsFrom => (Some(EntityKind::Flight), EntityKind::Airport),
            Relation::ArrivesAt => (Some(EntityKind::Flight), EntityKind::Airport),
            Relation::OperatedBy => (Some(EntityKind::Flight), EntityKind::Airline),
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Literal-valued attributes attached on entity creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    IataCode,
    IcaoCode,
    Coordinates,
    RunwayLength,
    DepartureTime,
    ArrivalTime,
    Duration,
    Distance,
    FlightDate,
}

impl Attribute {
    pub const ALL: [Attribute; 9] = [
        Attribute::IataCode,
        Attribute::IcaoCode,
        Attribute::Coordinates,
        Attribute::RunwayLength,
        Attribute::DepartureTime,
        Attribute::ArrivalTime,
        Attribute::Duration,
        Attribute::Distance,
        Attribute::FlightDate,
    ];

    pub fn predicate(&self) -> NamedNodeRef<'static> {
        match self {
            Attribute::IataCode => vocab::HAS_IATA_CODE,
            Attribute::IcaoCode => vocab::HAS_ICAO_CODE,
            Attribute::Coordinates => vocab::HAS_COORDINATES,
            Attribute::RunwayLength => vocab::HAS_RUNWAY_LEN,
            Attribute::DepartureTime => vocab::HAS_DEPARTURE_TIME,
            Attribute::ArrivalTime => vocab::HAS_ARRIVAL_TIME,
            Attribute::Duration => vocab::HAS_DURATION,
            Attribute::Distance => vocab::HAS_DISTANCE,
            Attribute::FlightDate => vocab::HAS_FLIGHT_DATE,
        }
    }

    fn signature(&self) -> (EntityKind, NamedNodeRef<'static>) {
        match self {
            Attribute::IataCode | Attribute::IcaoCode | Attribute::Coordinates => {
                (EntityKind::Airport, xsd::STRING)
            }
            Attribute::RunwayLength => (EntityKind::Runway, xsd::STRING),
            Attribute::DepartureTime | Attribute::ArrivalTime => (EntityKind::Flight, xsd::STRING),
            Attribute::Duration | Attribute::Distance => (EntityKind::Flight, xsd::INTEGER),
            Attribute::FlightDate => (EntityKind::Flight, xsd::DATE),
        }
    }
}

/// Write the class and property declarations into the store.
///
/// Nothing is written when the store already declares any of the classes,
/// so a loaded base ontology keeps its own domains and ranges. Returns the
/// number of triples that were actually new.
pub fn declare(store: &GraphStore) -> Result<usize> {
    for kind in EntityKind::ALL {
        if store.contains(TripleRef::new(kind.class(), rdf::TYPE, owl::CLASS))? {
            debug!("Schema already declared ({} is a class)", kind.class().as_str());
            return Ok(0);
        }
    }

    let mut added = 0;

    for kind in EntityKind::ALL {
        added += store.insert(TripleRef::new(kind.class(), rdf::TYPE, owl::CLASS))? as usize;
    }

    for relation in Relation::ALL {
        let predicate = relation.predicate();
        let (domain, range) = relation.signature();
        added += store.insert(TripleRef::new(predicate, rdf::TYPE, owl::OBJECT_PROPERTY))? as usize;
        if let Some(domain) = domain {
            added += store.insert(TripleRef::new(predicate, rdfs::DOMAIN, domain.class()))? as usize;
        }
        added += store.insert(TripleRef::new(predicate, rdfs::RANGE, range.class()))? as usize;
    }

    for attribute in Attribute::ALL {
        let predicate = attribute.predicate();
        let (domain, range) = attribute.signature();
        added +=
            store.insert(TripleRef::new(predicate, rdf::TYPE, owl::DATATYPE_PROPERTY))? as usize;
        added += store.insert(TripleRef::new(predicate, rdfs::DOMAIN, domain.class()))? as usize;
        added += store.insert(TripleRef::new(predicate, rdfs::RANGE, range))? as usize;
    }

    Ok(added)
}
