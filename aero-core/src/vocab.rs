//! IRIs used by the airport graph.
//!
//! Every entity and property lives in the fixed application namespace
//! [`NS`]. Typing and labeling use the standard RDF, RDFS, OWL and XSD
//! vocabularies.

use oxigraph::model::NamedNodeRef;

pub use oxigraph::model::vocab::{rdf, rdfs, xsd};

/// Application namespace for all entity and property IRIs.
pub const NS: &str = "http://www.semanticweb.org/marikaitiprimenta/ontologies/2025/4/airports#";

/// Wikidata entity namespace (source identifiers).
pub const WD: &str = "http://www.wikidata.org/entity/";

/// Prefix declarations prepended to canned queries.
pub const SPARQL_PREFIXES: &str = "\
PREFIX airport: <http://www.semanticweb.org/marikaitiprimenta/ontologies/2025/4/airports#>
PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>
PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
PREFIX owl: <http://www.w3.org/2002/07/owl#>
PREFIX xsd: <http://www.w3.org/2001/XMLSchema#>
";

/// The subset of OWL the schema needs.
pub mod owl {
    use oxigraph::model::NamedNodeRef;

    pub const CLASS: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Class");
    pub const OBJECT_PROPERTY: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#ObjectProperty");
    pub const DATATYPE_PROPERTY: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#DatatypeProperty");
    pub const SAME_AS: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#sameAs");
}

macro_rules! app_terms {
    ($($name:ident => $local:literal),* $(,)?) => {
        $(
            pub const $name: NamedNodeRef<'static> = NamedNodeRef::new_unchecked(concat!(
                "http://www.semanticweb.org/marikaitiprimenta/ontologies/2025/4/airports#",
                $local
            ));
        )*
    };
}

// Classes
app_terms! {
    COUNTRY => "Country",
    CITY => "City",
    AIRPORT => "Airport",
    RUNWAY => "Runway",
    AIRLINE => "Airline",
    FLIGHT => "Flight",
}

// Object properties
app_terms! {
    IS_LOCATED_IN => "isLocatedIn",
    IS_LOCATED_IN_CITY => "isLocatedInCity",
    HAS_RUNWAY => "hasRunway",
    HAS_DEPARTURE_AIRPORT => "hasDepartureAirport",
    HAS_ARRIVAL_AIRPORT => "hasArrivalAirport",
    OPERATED_BY => "operatedBy",
}

// Datatype properties
app_terms! {
    HAS_IATA_CODE => "hasIATACode",
    HAS_ICAO_CODE => "hasICAOCode",
    HAS_COORDINATES => "hasCoordinates",
    HAS_RUNWAY_LEN => "hasRunwayLen",
    HAS_DEPARTURE_TIME => "hasDepartureTime",
    HAS_ARRIVAL_TIME => "hasArrivalTime",
    HAS_DURATION => "hasDuration",
    HAS_DISTANCE => "hasDistance",
    HAS_FLIGHT_DATE => "hasFlightDate",
}

/// Shorten an IRI to its trailing fragment, or its last path segment when
/// there is no fragment.
pub fn local_name(iri: &str) -> &str {
    match iri.rsplit_once('#') {
        Some((_, fragment)) => fragment,
        None => iri.rsplit('/').next().unwrap_or(iri),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terms_live_in_namespace() {
        assert!(AIRPORT.as_str().starts_with(NS));
        assert_eq!(HAS_IATA_CODE.as_str(), format!("{}hasIATACode", NS));
    }

    #[test]
    fn test_local_name_fragment() {
        assert_eq!(local_name(COUNTRY.as_str()), "Country");
        assert_eq!(local_name("http://www.wikidata.org/entity/Q41"), "Q41");
        assert_eq!(local_name("plain"), "plain");
    }

    #[test]
    fn test_prefixes_match_namespace() {
        assert!(SPARQL_PREFIXES.contains(NS));
    }
}
