//! End-to-end build scenarios.
//!
//! Each test drives a [`GraphBuilder`] over in-memory records and checks the
//! resulting graph through the public store API.

use aero_core::vocab::{self, rdf, rdfs};
use aero_core::{
    AirportRecord, BuildEvent, EntityKind, EntityRef, FlightRecord, GraphBuilder, GraphStore,
};
use oxigraph::model::{Term, TripleRef};
use tempfile::tempdir;

const WD: &str = "http://www.wikidata.org/entity/";

fn wd(id: &str) -> String {
    format!("{}{}", WD, id)
}

fn athens() -> AirportRecord {
    AirportRecord::new(wd("Q9690"), "Athens Intl")
        .with_codes(Some("ATH"), Some("LGAV"))
        .with_country(wd("Q41"), "Greece")
        .with_city(wd("Q1524"), "Athens")
}

fn build_airports(store: &GraphStore, records: &[AirportRecord]) -> Vec<BuildEvent> {
    let mut events: Vec<BuildEvent> = Vec::new();
    let mut builder = GraphBuilder::new(store).expect("Failed to create builder");
    builder
        .add_airports(records, &mut events)
        .expect("Airport stage failed");
    builder.finish().expect("Failed to finish build");
    events
}

fn count(store: &GraphStore, kind: EntityKind) -> usize {
    store.stats().unwrap().entity_counts[&kind]
}

fn entity(kind: EntityKind, key: &str) -> EntityRef {
    EntityRef::new(kind, key).unwrap()
}

#[test]
fn test_shared_country_created_once() {
    let store = GraphStore::new().unwrap();
    let thessaloniki = AirportRecord::new(wd("Q1431955"), "Thessaloniki Airport")
        .with_codes(Some("SKG"), None)
        .with_country(wd("Q41"), "Greece");

    build_airports(&store, &[athens(), thessaloniki]);

    assert_eq!(count(&store, EntityKind::Country), 1);
    assert_eq!(count(&store, EntityKind::Airport), 2);
}

#[test]
fn test_first_label_wins_without_error() {
    let store = GraphStore::new().unwrap();
    let renamed = AirportRecord::new(wd("Q9690"), "Eleftherios Venizelos")
        .with_country(wd("Q41"), "Hellenic Republic");

    let events = build_airports(&store, &[athens(), renamed]);
    assert!(!events
        .iter()
        .any(|e| matches!(e, BuildEvent::RecordSkipped { .. })));

    let country = entity(EntityKind::Country, "Q41");
    let labels = store.objects(country.node(), rdfs::LABEL).unwrap();
    assert_eq!(labels.len(), 1);
    match &labels[0] {
        Term::Literal(l) => {
            assert_eq!(l.value(), "Greece");
            assert_eq!(l.language(), Some("en"));
        }
        other => panic!("unexpected label {:?}", other),
    }

    let airport = entity(EntityKind::Airport, "Q9690");
    let label = store.literal(airport.node(), rdfs::LABEL).unwrap().unwrap();
    assert_eq!(label.value(), "Athens Intl");
}

#[test]
fn test_flight_to_unknown_airport_is_dropped() {
    let store = GraphStore::new().unwrap();
    build_airports(&store, &[athens()]);
    let before = store.len().unwrap();

    let mut events: Vec<BuildEvent> = Vec::new();
    let mut builder = GraphBuilder::new(&store).unwrap();
    builder
        .add_flights(
            &[FlightRecord::new("ATH", "ZZZ", "Aegean Airlines", "600")],
            &mut events,
        )
        .unwrap();
    let report = builder.finish().unwrap();

    assert_eq!(report.flights_dropped, 1);
    assert_eq!(count(&store, EntityKind::Flight), 0);
    assert_eq!(count(&store, EntityKind::Airline), 0);
    assert_eq!(store.len().unwrap(), before);
    assert!(events.iter().any(|e| matches!(
        e,
        BuildEvent::FlightDropped { missing_iata, .. } if missing_iata == "ZZZ"
    )));
}

#[test]
fn test_departure_time_normalization() {
    let store = GraphStore::new().unwrap();
    build_airports(
        &store,
        &[
            athens(),
            AirportRecord::new(wd("Q9688"), "Heraklion").with_codes(Some("HER"), None),
        ],
    );

    let mut row = vec![String::new(); 21];
    row[1] = "2013".into();
    row[2] = "1".into();
    row[3] = "1".into();
    row[4] = "930".into();
    row[7] = "".into();
    row[11] = "600".into();
    row[13] = "ATH".into();
    row[14] = "HER".into();
    row[20] = "Aegean Airlines".into();
    let mut early = row.clone();
    early[4] = "5".into();
    early[11] = "601".into();

    let mut builder = GraphBuilder::new(&store).unwrap();
    builder
        .add_flight_rows(&[row, early], &mut Vec::<BuildEvent>::new())
        .unwrap();
    builder.finish().unwrap();

    let flight = entity(EntityKind::Flight, "ATH_HER_Aegean_Airlines_600");
    let departure = store
        .literal(flight.node(), vocab::HAS_DEPARTURE_TIME)
        .unwrap()
        .unwrap();
    assert_eq!(departure.value(), "09:30");
    assert!(store
        .literal(flight.node(), vocab::HAS_ARRIVAL_TIME)
        .unwrap()
        .is_none());

    let early = entity(EntityKind::Flight, "ATH_HER_Aegean_Airlines_601");
    let departure = store
        .literal(early.node(), vocab::HAS_DEPARTURE_TIME)
        .unwrap()
        .unwrap();
    assert_eq!(departure.value(), "00:05");
}

#[test]
fn test_sanitized_runway_ids_collide() {
    let store = GraphStore::new().unwrap();
    build_airports(
        &store,
        &[
            athens().with_runway("09/27", Some("09/27"), Some("3000")),
            athens().with_runway("09_27", Some("09_27"), Some("3100")),
        ],
    );

    assert_eq!(count(&store, EntityKind::Runway), 1);
    let runway = entity(EntityKind::Runway, "09_27");
    let length = store
        .literal(runway.node(), vocab::HAS_RUNWAY_LEN)
        .unwrap()
        .unwrap();
    assert_eq!(length.value(), "3000");
}

#[test]
fn test_reload_does_not_duplicate() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("populated_airports.owl");
    let records = vec![athens().with_runway("03R/21L", None, Some("4000"))];
    let flight = FlightRecord::new("ATH", "ATH", "Aegean Airlines", "1");

    {
        let store = GraphStore::new().unwrap();
        let mut builder = GraphBuilder::new(&store).unwrap();
        builder.add_airports(&records, &mut Vec::<BuildEvent>::new()).unwrap();
        builder
            .add_flights(std::slice::from_ref(&flight), &mut Vec::<BuildEvent>::new())
            .unwrap();
        builder.finish().unwrap();
        store.save(&path).unwrap();
    }

    let store = GraphStore::open(&path).unwrap();
    let before = store.len().unwrap();
    let stats_before = store.stats().unwrap();

    let renamed = vec![AirportRecord::new(wd("Q9690"), "Renamed")
        .with_codes(Some("XXX"), None)
        .with_country(wd("Q41"), "Hellas")
        .with_city(wd("Q1524"), "Athina")
        .with_runway("03R/21L", None, Some("9999"))];
    let mut builder = GraphBuilder::new(&store).unwrap();
    builder.add_airports(&records, &mut Vec::<BuildEvent>::new()).unwrap();
    builder.add_airports(&renamed, &mut Vec::<BuildEvent>::new()).unwrap();
    builder
        .add_flights(&[flight], &mut Vec::<BuildEvent>::new())
        .unwrap();
    let report = builder.finish().unwrap();

    assert_eq!(report.total_created(), 0);
    assert_eq!(store.len().unwrap(), before);
    assert_eq!(
        store.stats().unwrap().entity_counts,
        stats_before.entity_counts
    );
}

#[test]
fn test_country_city_airport_ordering() {
    let store = GraphStore::new().unwrap();
    build_airports(&store, &[athens()]);

    assert_eq!(count(&store, EntityKind::Country), 1);
    assert_eq!(count(&store, EntityKind::City), 1);
    assert_eq!(count(&store, EntityKind::Airport), 1);

    let country = entity(EntityKind::Country, "Q41");
    let city = entity(EntityKind::City, "Q1524");
    let airport = entity(EntityKind::Airport, "Q9690");

    assert!(store
        .contains(TripleRef::new(city.node(), vocab::IS_LOCATED_IN, country.node()))
        .unwrap());
    assert!(store
        .contains(TripleRef::new(airport.node(), vocab::IS_LOCATED_IN, country.node()))
        .unwrap());
    assert!(store
        .contains(TripleRef::new(airport.node(), vocab::IS_LOCATED_IN_CITY, city.node()))
        .unwrap());
    assert!(store
        .contains(TripleRef::new(airport.node(), rdf::TYPE, vocab::AIRPORT))
        .unwrap());
}

#[test]
fn test_canned_query_over_built_graph() {
    let store = GraphStore::new().unwrap();
    build_airports(&store, &[athens()]);

    let query = aero_core::QuerySuite::Airports.get("2").unwrap();
    let table = store.query(&query.sparql()).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(
        table.columns,
        vec!["airport", "airportLabel", "country", "countryLabel"]
    );
}
