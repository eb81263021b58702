//! Wikidata airport query and result decoding.
//!
//! The remote endpoint answers with the SPARQL 1.1 JSON results format.
//! Optional variables that did not bind are absent from a binding object,
//! so they decode to `None`.

use serde::Deserialize;
use std::collections::HashMap;

use crate::error::Result;
use crate::records::AirportRecord;

/// Default public endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://query.wikidata.org/sparql";

/// Default row limit for [`airport_query`].
pub const DEFAULT_LIMIT: usize = 2000;

/// Media type requested from the endpoint.
pub const RESULTS_MEDIA_TYPE: &str = "application/sparql-results+json";

/// Airports with codes, coordinates, country, city and runways. One row per
/// runway.
pub fn airport_query(limit: usize) -> String {
    format!(
        r#"SELECT ?airport ?airportLabel ?iata ?icao ?city ?cityLabel ?country ?countryLabel ?coord ?runway ?runwayLabel ?runwayLength
WHERE {{
    ?airport wdt:P31 wd:Q1248784 .
    OPTIONAL {{ ?airport wdt:P238 ?iata. }}
    OPTIONAL {{ ?airport wdt:P239 ?icao. }}
    OPTIONAL {{ ?airport wdt:P625 ?coord. }}
    OPTIONAL {{ ?airport wdt:P17 ?country. }}
    OPTIONAL {{ ?airport wdt:P131 ?city. }}
    OPTIONAL {{
        ?airport p:P529 ?runwayStatement .
        ?runwayStatement ps:P529 ?runway .
        OPTIONAL {{ ?runwayStatement pq:P2043 ?runwayLength. }}
    }}
    SERVICE wikibase:label {{
        bd:serviceParam wikibase:language "en" .
        ?airport rdfs:label ?airportLabel .
        ?country rdfs:label ?countryLabel .
        ?city rdfs:label ?cityLabel .
        ?runway rdfs:label ?runwayLabel .
    }}
}}
LIMIT {limit}
"#
    )
}

#[derive(Debug, Deserialize)]
struct SparqlResults {
    #[serde(default)]
    head: Head,
    results: Bindings,
}

#[derive(Debug, Default, Deserialize)]
struct Head {
    #[serde(default)]
    vars: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Bindings {
    bindings: Vec<HashMap<String, BindingValue>>,
}

#[derive(Debug, Deserialize)]
struct BindingValue {
    value: String,
}

/// Decode a SPARQL JSON results document into airport records.
pub fn decode_airports(body: &str) -> Result<Vec<AirportRecord>> {
    let results: SparqlResults = serde_json::from_str(body)?;
    tracing::debug!(
        "Decoding {} bindings over {:?}",
        results.results.bindings.len(),
        results.head.vars
    );
    Ok(results
        .results
        .bindings
        .into_iter()
        .map(|mut row| {
            let mut take = |name: &str| row.remove(name).map(|b| b.value);
            AirportRecord {
                airport: take("airport"),
                airport_label: take("airportLabel"),
                iata: take("iata"),
                icao: take("icao"),
                coord: take("coord"),
                country: take("country"),
                country_label: take("countryLabel"),
                city: take("city"),
                city_label: take("cityLabel"),
                runway: take("runway"),
                runway_label: take("runwayLabel"),
                runway_length: take("runwayLength"),
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
      "head": {"vars": ["airport", "airportLabel", "iata", "country", "countryLabel", "runway"]},
      "results": {"bindings": [
        {
          "airport": {"type": "uri", "value": "http://www.wikidata.org/entity/Q9690"},
          "airportLabel": {"xml:lang": "en", "type": "literal", "value": "Athens International Airport"},
          "iata": {"type": "literal", "value": "ATH"},
          "country": {"type": "uri", "value": "http://www.wikidata.org/entity/Q41"},
          "countryLabel": {"xml:lang": "en", "type": "literal", "value": "Greece"},
          "runway": {"type": "literal", "value": "03R/21L"}
        },
        {
          "airportLabel": {"type": "literal", "value": "Nameless"}
        }
      ]}
    }"#;

    #[test]
    fn test_decode_presence() {
        let records = decode_airports(SAMPLE).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].iata.as_deref(), Some("ATH"));
        assert_eq!(records[0].runway.as_deref(), Some("03R/21L"));
        assert!(records[0].icao.is_none());
        assert!(records[1].airport.is_none());
        assert_eq!(records[1].airport_label.as_deref(), Some("Nameless"));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_airports("<html>busy</html>").is_err());
        assert!(decode_airports(r#"{"head": {}}"#).is_err());
    }

    #[test]
    fn test_query_limit() {
        let query = airport_query(25);
        assert!(query.trim_end().ends_with("LIMIT 25"));
        assert!(query.contains("?runwayLength"));
    }
}
