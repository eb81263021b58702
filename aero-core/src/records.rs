//! Input record types.
//!
//! Every optional source column is an `Option`, so presence is decided when
//! the record is decoded rather than by probing a map at build time.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entity::sanitize;

/// One row of the remote airport query.
///
/// A single airport can appear on several rows (one per runway), each
/// repeating the airport, country and city columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirportRecord {
    /// Source IRI of the airport (`http://www.wikidata.org/entity/Q9690`)
    pub airport: Option<String>,
    pub airport_label: Option<String>,
    pub iata: Option<String>,
    pub icao: Option<String>,
    /// WKT point literal as returned by the source
    pub coord: Option<String>,
    pub country: Option<String>,
    pub country_label: Option<String>,
    pub city: Option<String>,
    pub city_label: Option<String>,
    pub runway: Option<String>,
    pub runway_label: Option<String>,
    pub runway_length: Option<String>,
}

impl AirportRecord {
    /// Start a record for an airport with identifier and label set.
    pub fn new(airport: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            airport: Some(airport.into()),
            airport_label: Some(label.into()),
            ..Self::default()
        }
    }

    pub fn with_codes(mut self, iata: Option<&str>, icao: Option<&str>) -> Self {
        self.iata = iata.map(str::to_string);
        self.icao = icao.map(str::to_string);
        self
    }

    pub fn with_coord(mut self, coord: impl Into<String>) -> Self {
        self.coord = Some(coord.into());
        self
    }

    pub fn with_country(mut self, country: impl Into<String>, label: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self.country_label = Some(label.into());
        self
    }

    pub fn with_city(mut self, city: impl Into<String>, label: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self.city_label = Some(label.into());
        self
    }

    pub fn with_runway(
        mut self,
        runway: impl Into<String>,
        label: Option<&str>,
        length: Option<&str>,
    ) -> Self {
        self.runway = Some(runway.into());
        self.runway_label = label.map(str::to_string);
        self.runway_length = length.map(str::to_string);
        self
    }
}

/// One normalized flight row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightRecord {
    pub source_iata: String,
    pub destination_iata: String,
    /// Airline display name, verbatim
    pub airline: String,
    pub flight_number: String,
    /// "HH:MM"
    pub departure_time: Option<String>,
    /// "HH:MM"
    pub arrival_time: Option<String>,
    /// Air time in minutes
    pub duration_minutes: Option<i64>,
    pub distance: Option<i64>,
    pub date: Option<NaiveDate>,
}

impl FlightRecord {
    pub fn new(
        source_iata: impl Into<String>,
        destination_iata: impl Into<String>,
        airline: impl Into<String>,
        flight_number: impl Into<String>,
    ) -> Self {
        Self {
            source_iata: source_iata.into(),
            destination_iata: destination_iata.into(),
            airline: airline.into(),
            flight_number: flight_number.into(),
            ..Self::default()
        }
    }

    /// Composite natural key: source, destination, airline and flight number.
    pub fn natural_key(&self) -> String {
        format!(
            "{}_{}_{}_{}",
            sanitize(&self.source_iata),
            sanitize(&self.destination_iata),
            sanitize(&self.airline),
            sanitize(&self.flight_number)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_airport_builder() {
        let record = AirportRecord::new("http://www.wikidata.org/entity/Q9690", "Athens Intl")
            .with_codes(Some("ATH"), None)
            .with_country("http://www.wikidata.org/entity/Q41", "Greece");
        assert_eq!(record.iata.as_deref(), Some("ATH"));
        assert!(record.icao.is_none());
        assert!(record.city.is_none());
        assert_eq!(record.country_label.as_deref(), Some("Greece"));
    }

    #[test]
    fn test_flight_natural_key() {
        let flight = FlightRecord::new("JFK", "LAX", "American Airlines Inc.", "11");
        assert_eq!(flight.natural_key(), "JFK_LAX_American_Airlines_Inc__11");
    }
}
