//! Canned SPARQL queries.
//!
//! Two suites: `airports` inspects the output of the airport stage,
//! `flights` joins flights with airports, airlines and countries. Query
//! bodies rely on the prefixes in [`SPARQL_PREFIXES`], which
//! [`CannedQuery::sparql`] prepends.

use serde::Serialize;
use std::fmt;

use crate::vocab::SPARQL_PREFIXES;

/// A named query in a suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CannedQuery {
    /// Menu key ("1".."9")
    pub key: &'static str,
    pub name: &'static str,
    #[serde(skip)]
    pub body: &'static str,
}

impl CannedQuery {
    /// Full query text with prefix declarations.
    pub fn sparql(&self) -> String {
        format!("{}{}", SPARQL_PREFIXES, self.body)
    }
}

/// Which set of canned queries to offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuerySuite {
    Airports,
    Flights,
}

impl QuerySuite {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuerySuite::Airports => "airports",
            QuerySuite::Flights => "flights",
        }
    }

    pub fn queries(&self) -> &'static [CannedQuery] {
        match self {
            QuerySuite::Airports => AIRPORT_QUERIES,
            QuerySuite::Flights => FLIGHT_QUERIES,
        }
    }

    /// Look up a menu selection. Surrounding whitespace is ignored.
    pub fn get(&self, selection: &str) -> Option<&'static CannedQuery> {
        let selection = selection.trim();
        self.queries().iter().find(|q| q.key == selection)
    }
}

impl fmt::Display for QuerySuite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

static AIRPORT_QUERIES: &[CannedQuery] = &[
    CannedQuery {
        key: "1",
        name: "List all airports",
        body: r#"
SELECT ?airport ?label ?iata ?icao
WHERE {
    ?airport rdf:type airport:Airport .
    ?airport rdfs:label ?label .
    OPTIONAL { ?airport airport:hasIATACode ?iata }
    OPTIONAL { ?airport airport:hasICAOCode ?icao }
}
ORDER BY ?label
LIMIT 20
"#,
    },
    CannedQuery {
        key: "2",
        name: "Airports by country",
        body: r#"
SELECT ?airport ?airportLabel ?country ?countryLabel
WHERE {
    ?airport rdf:type airport:Airport .
    ?airport rdfs:label ?airportLabel .
    ?airport airport:isLocatedIn ?country .
    ?country rdfs:label ?countryLabel .
}
ORDER BY ?countryLabel ?airportLabel
LIMIT 20
"#,
    },
    CannedQuery {
        key: "3",
        name: "Airports with IATA code starting with 'L'",
        body: r#"
SELECT ?airport ?label ?iata
WHERE {
    ?airport rdf:type airport:Airport .
    ?airport rdfs:label ?label .
    ?airport airport:hasIATACode ?iata .
    FILTER(STRSTARTS(?iata, "L"))
}
ORDER BY ?iata
LIMIT 20
"#,
    },
    CannedQuery {
        key: "4",
        name: "Count airports by country",
        body: r#"
SELECT ?countryLabel (COUNT(?airport) AS ?airportCount)
WHERE {
    ?airport rdf:type airport:Airport .
    ?airport airport:isLocatedIn ?country .
    ?country rdfs:label ?countryLabel .
}
GROUP BY ?countryLabel
ORDER BY DESC(?airportCount)
LIMIT 10
"#,
    },
];

static FLIGHT_QUERIES: &[CannedQuery] = &[
    CannedQuery {
        key: "1",
        name: "List all flights with departure and arrival airport details",
        body: r#"
SELECT ?flight ?depAirportLabel ?depIATA ?arrAirportLabel ?arrIATA ?airline ?depTime ?arrTime
WHERE {
    ?flight rdf:type airport:Flight .
    ?flight airport:hasDepartureAirport ?depAirport .
    ?flight airport:hasArrivalAirport ?arrAirport .
    ?flight airport:operatedBy ?airline .

    ?depAirport rdfs:label ?depAirportLabel .
    ?depAirport airport:hasIATACode ?depIATA .

    ?arrAirport rdfs:label ?arrAirportLabel .
    ?arrAirport airport:hasIATACode ?arrIATA .

    OPTIONAL { ?flight airport:hasDepartureTime ?depTime }
    OPTIONAL { ?flight airport:hasArrivalTime ?arrTime }
}
ORDER BY ?depIATA ?arrIATA
LIMIT 20
"#,
    },
    CannedQuery {
        key: "2",
        name: "Flights by airline with airport countries",
        body: r#"
SELECT ?airlineLabel ?depAirportLabel ?depCountryLabel ?arrAirportLabel ?arrCountryLabel ?depTime
WHERE {
    ?flight rdf:type airport:Flight .
    ?flight airport:hasDepartureAirport ?depAirport .
    ?flight airport:hasArrivalAirport ?arrAirport .
    ?flight airport:operatedBy ?airline .
    ?airline rdfs:label ?airlineLabel .

    ?depAirport rdfs:label ?depAirportLabel .
    ?arrAirport rdfs:label ?arrAirportLabel .

    ?depAirport airport:isLocatedIn ?depCountry .
    ?depCountry rdfs:label ?depCountryLabel .

    ?arrAirport airport:isLocatedIn ?arrCountry .
    ?arrCountry rdfs:label ?arrCountryLabel .

    OPTIONAL { ?flight airport:hasDepartureTime ?depTime }
}
ORDER BY ?airlineLabel ?depTime
LIMIT 15
"#,
    },
    CannedQuery {
        key: "3",
        name: "International flights (different departure and arrival countries)",
        body: r#"
SELECT ?flight ?depAirportLabel ?depCountryLabel ?arrAirportLabel ?arrCountryLabel ?airline ?duration
WHERE {
    ?flight rdf:type airport:Flight .
    ?flight airport:hasDepartureAirport ?depAirport .
    ?flight airport:hasArrivalAirport ?arrAirport .
    ?flight airport:operatedBy ?airline .

    ?depAirport rdfs:label ?depAirportLabel .
    ?arrAirport rdfs:label ?arrAirportLabel .

    ?depAirport airport:isLocatedIn ?depCountry .
    ?depCountry rdfs:label ?depCountryLabel .

    ?arrAirport airport:isLocatedIn ?arrCountry .
    ?arrCountry rdfs:label ?arrCountryLabel .

    OPTIONAL { ?flight airport:hasDuration ?duration }

    FILTER(?depCountry != ?arrCountry)
}
ORDER BY ?depCountryLabel ?arrCountryLabel
LIMIT 15
"#,
    },
    CannedQuery {
        key: "4",
        name: "Long-haul flights with country information",
        body: r#"
SELECT ?flight ?depAirportLabel ?depCountryLabel ?arrAirportLabel ?arrCountryLabel ?airline ?duration
WHERE {
    ?flight rdf:type airport:Flight .
    ?flight airport:hasDepartureAirport ?depAirport .
    ?flight airport:hasArrivalAirport ?arrAirport .
    ?flight airport:operatedBy ?airline .
    ?flight airport:hasDuration ?duration .

    ?depAirport rdfs:label ?depAirportLabel .
    ?arrAirport rdfs:label ?arrAirportLabel .

    ?depAirport airport:isLocatedIn ?depCountry .
    ?depCountry rdfs:label ?depCountryLabel .

    ?arrAirport airport:isLocatedIn ?arrCountry .
    ?arrCountry rdfs:label ?arrCountryLabel .

    FILTER(?duration > 180)
}
ORDER BY DESC(?duration)
LIMIT 15
"#,
    },
    CannedQuery {
        key: "5",
        name: "Countries with most airport connectivity (flight routes)",
        // BIND must follow both airport patterns.
        body: r#"
SELECT ?countryLabel (COUNT(DISTINCT ?route) AS ?routeCount)
WHERE {
    ?flight rdf:type airport:Flight .

    ?flight airport:hasDepartureAirport ?depAirport .
    ?depAirport airport:isLocatedIn ?country .
    ?country rdfs:label ?countryLabel .

    ?flight airport:hasArrivalAirport ?arrAirport .

    BIND(CONCAT(STR(?depAirport), "-", STR(?arrAirport)) AS ?route)
}
GROUP BY ?countryLabel
ORDER BY DESC(?routeCount)
LIMIT 10
"#,
    },
    CannedQuery {
        key: "6",
        name: "Morning international flights by country pairs",
        body: r#"
SELECT ?depCountryLabel ?arrCountryLabel (COUNT(?flight) AS ?flightCount)
WHERE {
    ?flight rdf:type airport:Flight .
    ?flight airport:hasDepartureAirport ?depAirport .
    ?flight airport:hasArrivalAirport ?arrAirport .
    ?flight airport:hasDepartureTime ?depTime .

    ?depAirport airport:isLocatedIn ?depCountry .
    ?depCountry rdfs:label ?depCountryLabel .

    ?arrAirport airport:isLocatedIn ?arrCountry .
    ?arrCountry rdfs:label ?arrCountryLabel .

    FILTER(?depCountry != ?arrCountry)
    FILTER(STRSTARTS(?depTime, "0") || STRSTARTS(?depTime, "1"))
}
GROUP BY ?depCountryLabel ?arrCountryLabel
ORDER BY DESC(?flightCount)
LIMIT 15
"#,
    },
    CannedQuery {
        key: "7",
        name: "Airlines operating international flights",
        body: r#"
SELECT ?airlineLabel (COUNT(?flight) AS ?intlFlightCount)
WHERE {
    ?flight rdf:type airport:Flight .
    ?flight airport:hasDepartureAirport ?depAirport .
    ?flight airport:hasArrivalAirport ?arrAirport .
    ?flight airport:operatedBy ?airline .
    ?airline rdfs:label ?airlineLabel .

    ?depAirport airport:isLocatedIn ?depCountry .
    ?arrAirport airport:isLocatedIn ?arrCountry .

    FILTER(?depCountry != ?arrCountry)
}
GROUP BY ?airlineLabel
ORDER BY DESC(?intlFlightCount)
LIMIT 10
"#,
    },
    CannedQuery {
        key: "8",
        name: "Airport pairs with most connecting flights",
        body: r#"
SELECT ?depAirportLabel ?depIATA ?arrAirportLabel ?arrIATA (COUNT(?flight) AS ?flightCount)
WHERE {
    ?flight rdf:type airport:Flight .
    ?flight airport:hasDepartureAirport ?depAirport .
    ?flight airport:hasArrivalAirport ?arrAirport .

    ?depAirport rdfs:label ?depAirportLabel .
    ?depAirport airport:hasIATACode ?depIATA .

    ?arrAirport rdfs:label ?arrAirportLabel .
    ?arrAirport airport:hasIATACode ?arrIATA .
}
GROUP BY ?depAirportLabel ?depIATA ?arrAirportLabel ?arrIATA
ORDER BY DESC(?flightCount)
LIMIT 15
"#,
    },
    CannedQuery {
        key: "9",
        name: "Marking international flights",
        body: r#"
CONSTRUCT {
    ?flight airport:isInternational true .
}
WHERE {
    ?flight rdf:type airport:Flight .
    ?flight airport:hasDepartureAirport ?dep .
    ?flight airport:hasArrivalAirport ?arr .
    ?dep airport:isLocatedIn ?c1 .
    ?arr airport:isLocatedIn ?c2 .
    FILTER(?c1 != ?c2)
}
"#,
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::GraphStore;

    #[test]
    fn test_suite_sizes() {
        assert_eq!(QuerySuite::Airports.queries().len(), 4);
        assert_eq!(QuerySuite::Flights.queries().len(), 9);
    }

    #[test]
    fn test_get_selection() {
        let query = QuerySuite::Airports.get(" 3 ").unwrap();
        assert_eq!(query.name, "Airports with IATA code starting with 'L'");
        assert!(QuerySuite::Airports.get("5").is_none());
        assert!(QuerySuite::Flights.get("12").is_none());
        assert!(QuerySuite::Flights.get("").is_none());
    }

    #[test]
    fn test_all_queries_evaluate_on_empty_graph() {
        let store = GraphStore::new().unwrap();
        for suite in [QuerySuite::Airports, QuerySuite::Flights] {
            for query in suite.queries() {
                let table = store
                    .query(&query.sparql())
                    .unwrap_or_else(|e| panic!("{} #{}: {}", suite, query.key, e));
                assert!(table.is_empty(), "{} #{}", suite, query.key);
            }
        }
    }
}
