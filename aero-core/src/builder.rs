//! Graph assembly from airport and flight records.
//!
//! A [`GraphBuilder`] owns one [`Resolver`] for the length of a build and
//! writes into a borrowed [`GraphStore`]. Airport records are processed in
//! three passes (countries, then cities, then airports with their runways)
//! so that every link target exists before anything points at it. Flights
//! come after airports because they resolve their endpoints by IATA code.

use oxigraph::model::Literal;
use std::time::Instant;
use tracing::info;

use crate::entity::EntityRef;
use crate::error::Result;
use crate::events::{BuildEvent, BuildReport, EventSink, Stage};
use crate::linker;
use crate::normalize::normalize_row;
use crate::records::{AirportRecord, FlightRecord};
use crate::resolver::{EntitySpec, Resolver};
use crate::schema::{self, Attribute, EntityKind, Relation};
use crate::store::GraphStore;
use crate::vocab::xsd;

fn plain(value: Option<&str>) -> Option<Literal> {
    value.map(Literal::new_simple_literal)
}

/// Builds entities and relationships into a store.
pub struct GraphBuilder<'s> {
    store: &'s GraphStore,
    resolver: Resolver,
    report: BuildReport,
    started: Instant,
}

impl<'s> GraphBuilder<'s> {
    /// Declare the schema in `store` and seed the resolver from the entities
    /// it already holds.
    pub fn new(store: &'s GraphStore) -> Result<Self> {
        let started = Instant::now();
        let triples_before = store.len()?;
        let declared = schema::declare(store)?;
        if declared > 0 {
            info!("Declared {} schema triples", declared);
        }
        let resolver = Resolver::seeded_from(store)?;
        Ok(Self {
            store,
            resolver,
            report: BuildReport {
                triples_before,
                ..BuildReport::default()
            },
            started,
        })
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    fn note(&mut self, sink: &mut dyn EventSink, event: BuildEvent) {
        self.report.record(&event);
        sink.emit(event);
    }

    fn resolve(&mut self, spec: EntitySpec<'_>, sink: &mut dyn EventSink) -> Result<(EntityRef, bool)> {
        let resolution = self.resolver.resolve(self.store, spec)?;
        if resolution.created {
            self.note(
                sink,
                BuildEvent::EntityCreated {
                    kind: resolution.entity.kind,
                    key: resolution.entity.key.clone(),
                },
            );
        }
        Ok((resolution.entity, resolution.created))
    }

    fn connect(
        &mut self,
        subject: &EntityRef,
        relation: Relation,
        object: &EntityRef,
        sink: &mut dyn EventSink,
    ) -> Result<()> {
        if linker::link(self.store, subject, relation, object)? {
            self.note(sink, BuildEvent::LinkAdded);
        }
        Ok(())
    }

    /// Link `subject` to an entity by raw source id, if that entity exists.
    ///
    /// `subject` must already be known to the resolver.
    fn connect_to(
        &mut self,
        subject: &EntityRef,
        relation: Relation,
        kind: EntityKind,
        raw_id: Option<&str>,
        sink: &mut dyn EventSink,
    ) -> Result<()> {
        let Some(raw_id) = raw_id else {
            return Ok(());
        };
        let added = linker::link_keys(
            self.store,
            &self.resolver,
            (subject.kind, subject.key.as_str()),
            relation,
            (kind, raw_id),
        )?;
        if added {
            self.note(sink, BuildEvent::LinkAdded);
        }
        Ok(())
    }

    /// Add countries, cities, airports and runways from airport records.
    pub fn add_airports(&mut self, records: &[AirportRecord], sink: &mut dyn EventSink) -> Result<()> {
        let start = Instant::now();
        self.note(
            sink,
            BuildEvent::StageStarted {
                stage: Stage::Airports,
                records: records.len(),
            },
        );

        // Optional columns are tested for presence; a bound empty value counts.
        for record in records {
            if let Some(country) = record.country.as_deref() {
                let spec = EntitySpec::new(EntityKind::Country, country)
                    .label(record.country_label.as_deref())
                    .same_as(Some(country));
                self.resolve(spec, sink)?;
            }
        }

        // A city is placed in the country of the row that first mentions it.
        for record in records {
            if let Some(city) = record.city.as_deref() {
                let spec = EntitySpec::new(EntityKind::City, city)
                    .label(record.city_label.as_deref())
                    .same_as(Some(city));
                let (city, created) = self.resolve(spec, sink)?;
                if created {
                    self.connect_to(
                        &city,
                        Relation::LocatedIn,
                        EntityKind::Country,
                        record.country.as_deref(),
                        sink,
                    )?;
                }
            }
        }

        for (index, record) in records.iter().enumerate() {
            let (Some(airport), Some(label)) =
                (record.airport.as_deref(), record.airport_label.as_deref())
            else {
                let reason = if record.airport.is_none() {
                    "missing airport identifier"
                } else {
                    "missing airport label"
                };
                self.note(
                    sink,
                    BuildEvent::RecordSkipped {
                        stage: Stage::Airports,
                        index,
                        reason: reason.to_string(),
                    },
                );
                continue;
            };

            let spec = EntitySpec::new(EntityKind::Airport, airport)
                .label(Some(label))
                .same_as(Some(airport))
                .attribute(Attribute::IataCode, plain(record.iata.as_deref()))
                .attribute(Attribute::IcaoCode, plain(record.icao.as_deref()))
                .attribute(Attribute::Coordinates, plain(record.coord.as_deref()));
            let (airport, _) = self.resolve(spec, sink)?;

            if let Some(runway) = record.runway.as_deref() {
                let spec = EntitySpec::new(EntityKind::Runway, runway)
                    .label(record.runway_label.as_deref())
                    .attribute(Attribute::RunwayLength, plain(record.runway_length.as_deref()));
                let (runway, _) = self.resolve(spec, sink)?;
                self.connect(&airport, Relation::HasRunway, &runway, sink)?;
            }

            self.connect_to(
                &airport,
                Relation::LocatedIn,
                EntityKind::Country,
                record.country.as_deref(),
                sink,
            )?;
            self.connect_to(
                &airport,
                Relation::LocatedInCity,
                EntityKind::City,
                record.city.as_deref(),
                sink,
            )?;
        }

        self.note(
            sink,
            BuildEvent::StageCompleted {
                stage: Stage::Airports,
                duration_ms: start.elapsed().as_millis() as u64,
            },
        );
        Ok(())
    }

    /// Normalize raw flight rows and add them.
    ///
    /// Rows that cannot be normalized are skipped with an event.
    pub fn add_flight_rows<R, S>(&mut self, rows: &[R], sink: &mut dyn EventSink) -> Result<()>
    where
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let start = Instant::now();
        self.note(
            sink,
            BuildEvent::StageStarted {
                stage: Stage::Flights,
                records: rows.len(),
            },
        );

        for (index, row) in rows.iter().enumerate() {
            match normalize_row(row.as_ref()) {
                Ok(normalized) => {
                    for issue in normalized.issues {
                        self.note(
                            sink,
                            BuildEvent::FieldSkipped {
                                index,
                                field: issue.field.to_string(),
                                value: issue.value,
                            },
                        );
                    }
                    self.add_flight(&normalized.record, sink)?;
                }
                Err(e) => self.note(
                    sink,
                    BuildEvent::RecordSkipped {
                        stage: Stage::Flights,
                        index,
                        reason: e.to_string(),
                    },
                ),
            }
        }

        self.note(
            sink,
            BuildEvent::StageCompleted {
                stage: Stage::Flights,
                duration_ms: start.elapsed().as_millis() as u64,
            },
        );
        Ok(())
    }

    /// Add airlines and flights from already normalized records.
    pub fn add_flights(&mut self, records: &[FlightRecord], sink: &mut dyn EventSink) -> Result<()> {
        let start = Instant::now();
        self.note(
            sink,
            BuildEvent::StageStarted {
                stage: Stage::Flights,
                records: records.len(),
            },
        );
        for record in records {
            self.add_flight(record, sink)?;
        }
        self.note(
            sink,
            BuildEvent::StageCompleted {
                stage: Stage::Flights,
                duration_ms: start.elapsed().as_millis() as u64,
            },
        );
        Ok(())
    }

    fn add_flight(&mut self, record: &FlightRecord, sink: &mut dyn EventSink) -> Result<()> {
        let source = self.resolver.airport_by_iata(&record.source_iata).cloned();
        let destination = self.resolver.airport_by_iata(&record.destination_iata).cloned();
        let (source, destination) = match (source, destination) {
            (Some(source), Some(destination)) => (source, destination),
            (None, _) | (_, None) => {
                let missing = if self.resolver.airport_by_iata(&record.source_iata).is_none() {
                    &record.source_iata
                } else {
                    &record.destination_iata
                };
                self.note(
                    sink,
                    BuildEvent::FlightDropped {
                        key: record.natural_key(),
                        missing_iata: missing.clone(),
                    },
                );
                return Ok(());
            }
        };

        let airline_spec =
            EntitySpec::new(EntityKind::Airline, &record.airline).label(Some(record.airline.as_str()));
        let (airline, _) = self.resolve(airline_spec, sink)?;

        let key = record.natural_key();
        let date = record
            .date
            .map(|d| Literal::new_typed_literal(d.format("%Y-%m-%d").to_string(), xsd::DATE));
        let flight_spec = EntitySpec::new(EntityKind::Flight, &key)
            .attribute(
                Attribute::DepartureTime,
                record
                    .departure_time
                    .as_deref()
                    .map(|t| Literal::new_typed_literal(t, xsd::STRING)),
            )
            .attribute(
                Attribute::ArrivalTime,
                record
                    .arrival_time
                    .as_deref()
                    .map(|t| Literal::new_typed_literal(t, xsd::STRING)),
            )
            .attribute(Attribute::Duration, record.duration_minutes.map(Literal::from))
            .attribute(Attribute::Distance, record.distance.map(Literal::from))
            .attribute(Attribute::FlightDate, date);
        let (flight, _) = self.resolve(flight_spec, sink)?;

        self.connect(&flight, Relation::DepartsFrom, &source, sink)?;
        self.connect(&flight, Relation::ArrivesAt, &destination, sink)?;
        self.connect(&flight, Relation::OperatedBy, &airline, sink)?;
        Ok(())
    }

    /// Finish the build and return its report.
    pub fn finish(mut self) -> Result<BuildReport> {
        self.report.triples_after = self.store.len()?;
        self.report.duration_ms = self.started.elapsed().as_millis() as u64;
        info!(
            "Build added {} triples ({} entities, {} links)",
            self.report.triples_added(),
            self.report.total_created(),
            self.report.links_added
        );
        Ok(self.report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::{self, rdf, rdfs};
    use oxigraph::model::{Term, TripleRef};

    const WD: &str = "http://www.wikidata.org/entity/";

    fn athens() -> AirportRecord {
        AirportRecord::new(format!("{WD}Q9690"), "Athens International Airport")
            .with_codes(Some("ATH"), Some("LGAV"))
            .with_country(format!("{WD}Q41"), "Greece")
            .with_city(format!("{WD}Q1524"), "Athens")
    }

    #[test]
    fn test_runway_rows_share_airport() {
        let store = GraphStore::new().unwrap();
        let mut builder = GraphBuilder::new(&store).unwrap();
        let records = vec![
            athens().with_runway("03R/21L", Some("03R/21L"), Some("4000")),
            athens().with_runway("03L/21R", Some("03L/21R"), Some("3800")),
        ];
        builder.add_airports(&records, &mut Vec::<BuildEvent>::new()).unwrap();
        let report = builder.finish().unwrap();

        assert_eq!(report.created(EntityKind::Airport), 1);
        assert_eq!(report.created(EntityKind::Runway), 2);
        let airport = EntityRef::new(EntityKind::Airport, "Q9690").unwrap();
        assert_eq!(store.objects(airport.node(), vocab::HAS_RUNWAY).unwrap().len(), 2);
    }

    #[test]
    fn test_airport_without_label_is_skipped() {
        let store = GraphStore::new().unwrap();
        let mut builder = GraphBuilder::new(&store).unwrap();
        let mut record = athens();
        record.airport_label = None;

        let mut events: Vec<BuildEvent> = Vec::new();
        builder.add_airports(&[record], &mut events).unwrap();
        let report = builder.finish().unwrap();

        assert_eq!(report.records_skipped, 1);
        assert_eq!(report.created(EntityKind::Airport), 0);
        // country and city still come from the row
        assert_eq!(report.created(EntityKind::Country), 1);
        assert!(events.iter().any(|e| matches!(
            e,
            BuildEvent::RecordSkipped { reason, .. } if reason == "missing airport label"
        )));
    }

    #[test]
    fn test_blank_columns_count_as_present() {
        let store = GraphStore::new().unwrap();
        let mut builder = GraphBuilder::new(&store).unwrap();
        let record = AirportRecord::new(format!("{WD}Q1"), "").with_codes(Some(""), None);

        let mut events: Vec<BuildEvent> = Vec::new();
        builder.add_airports(&[record], &mut events).unwrap();
        let report = builder.finish().unwrap();

        assert_eq!(report.created(EntityKind::Airport), 1);
        assert_eq!(report.records_skipped, 0);
        let airport = EntityRef::new(EntityKind::Airport, "Q1").unwrap();
        let iata = store.literal(airport.node(), vocab::HAS_IATA_CODE).unwrap().unwrap();
        assert_eq!(iata.value(), "");
        assert_eq!(store.objects(airport.node(), rdfs::LABEL).unwrap().len(), 1);
    }

    #[test]
    fn test_links_skip_absent_columns() {
        let store = GraphStore::new().unwrap();
        let mut builder = GraphBuilder::new(&store).unwrap();
        let mut record = athens();
        record.country = None;

        builder.add_airports(&[record], &mut Vec::<BuildEvent>::new()).unwrap();
        let report = builder.finish().unwrap();

        // only the airport to city edge; the city has no country to point at
        assert_eq!(report.links_added, 1);
        let airport = EntityRef::new(EntityKind::Airport, "Q9690").unwrap();
        assert!(store.objects(airport.node(), vocab::IS_LOCATED_IN).unwrap().is_empty());
        assert_eq!(store.objects(airport.node(), vocab::IS_LOCATED_IN_CITY).unwrap().len(), 1);
    }

    #[test]
    fn test_flight_attributes_and_links() {
        let store = GraphStore::new().unwrap();
        let mut builder = GraphBuilder::new(&store).unwrap();
        builder
            .add_airports(
                &[
                    AirportRecord::new(format!("{WD}Q8685"), "JFK").with_codes(Some("JFK"), None),
                    AirportRecord::new(format!("{WD}Q8727"), "LAX").with_codes(Some("LAX"), None),
                ],
                &mut Vec::<BuildEvent>::new(),
            )
            .unwrap();

        let mut flight = FlightRecord::new("JFK", "LAX", "American Airlines Inc.", "11");
        flight.departure_time = Some("09:30".into());
        flight.duration_minutes = Some(330);
        flight.date = chrono::NaiveDate::from_ymd_opt(2013, 1, 1);
        builder.add_flights(&[flight], &mut Vec::<BuildEvent>::new()).unwrap();
        let report = builder.finish().unwrap();

        assert_eq!(report.created(EntityKind::Flight), 1);
        assert_eq!(report.created(EntityKind::Airline), 1);

        let node = EntityRef::new(EntityKind::Flight, "JFK_LAX_American_Airlines_Inc__11").unwrap();
        assert!(store
            .contains(TripleRef::new(node.node(), rdf::TYPE, vocab::FLIGHT))
            .unwrap());
        let duration = store.literal(node.node(), vocab::HAS_DURATION).unwrap().unwrap();
        assert_eq!(duration.value(), "330");
        assert_eq!(duration.datatype(), xsd::INTEGER);
        let date = store.literal(node.node(), vocab::HAS_FLIGHT_DATE).unwrap().unwrap();
        assert_eq!(date.value(), "2013-01-01");

        let airline = EntityRef::new(EntityKind::Airline, "American_Airlines_Inc_").unwrap();
        assert_eq!(
            store.objects(node.node(), vocab::OPERATED_BY).unwrap(),
            vec![Term::from(airline.iri)]
        );
        assert!(store.literal(node.node(), vocab::HAS_ARRIVAL_TIME).unwrap().is_none());
    }

    #[test]
    fn test_flight_rows_report_issues() {
        let store = GraphStore::new().unwrap();
        let mut builder = GraphBuilder::new(&store).unwrap();
        let short = vec!["1".to_string(), "2013".to_string()];
        let mut events: Vec<BuildEvent> = Vec::new();
        builder.add_flight_rows(&[short], &mut events).unwrap();
        let report = builder.finish().unwrap();

        assert_eq!(report.records_skipped, 1);
        assert_eq!(report.created(EntityKind::Flight), 0);
    }
}
