use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Normalize an airport code: trim surrounding whitespace, upper-case
pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Reference metadata for one airport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirportInfo {
    pub name: String,
    pub city: String,
    pub country: String,
}

impl AirportInfo {
    /// City and country, only when both are present
    ///
    /// A City node is keyed by both values, so a half-filled entry yields no
    /// location at all.
    pub fn location(&self) -> Option<(&str, &str)> {
        let city = self.city.trim();
        let country = self.country.trim();
        if city.is_empty() || country.is_empty() {
            None
        } else {
            Some((city, country))
        }
    }

    /// Full airport name, if the reference table had one
    pub fn display_name(&self) -> Option<&str> {
        let name = self.name.trim();
        (!name.is_empty()).then_some(name)
    }
}

/// A validated, normalized flight row ready for upsert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightRecord {
    /// Natural key taken from the source record id
    pub flight_id: String,
    pub adep: String,
    pub adep_lat: f64,
    pub adep_lon: f64,
    pub ades: String,
    pub ades_lat: f64,
    pub ades_lon: f64,
    pub operator: String,
    pub ac_type: String,
    pub off_block: NaiveDateTime,
    pub arrival: NaiveDateTime,
    /// Calendar date of the off-block time
    pub day: NaiveDate,
    pub duration_min: i64,
    pub distance_nm: i64,
    pub adep_info: Option<AirportInfo>,
    pub ades_info: Option<AirportInfo>,
}

impl FlightRecord {
    /// ISO-8601 off-block timestamp (`2018-03-01T10:00:00`)
    pub fn off_block_iso(&self) -> String {
        self.off_block.format("%Y-%m-%dT%H:%M:%S").to_string()
    }

    /// ISO-8601 arrival timestamp
    pub fn arrival_iso(&self) -> String {
        self.arrival.format("%Y-%m-%dT%H:%M:%S").to_string()
    }

    /// ISO calendar date key (`2018-03-01`)
    pub fn day_key(&self) -> String {
        self.day.format("%Y-%m-%d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_code("  epwa "), "EPWA");
        assert_eq!(normalize_code("KJFK"), "KJFK");
        assert_eq!(normalize_code("   "), "");
    }

    #[test]
    fn test_location_requires_city_and_country() {
        let full = AirportInfo {
            name: "Chopin".into(),
            city: "Warsaw".into(),
            country: "Poland".into(),
        };
        assert_eq!(full.location(), Some(("Warsaw", "Poland")));

        let no_country = AirportInfo {
            country: " ".into(),
            ..full.clone()
        };
        assert_eq!(no_country.location(), None);

        let no_name = AirportInfo {
            name: String::new(),
            ..full
        };
        assert_eq!(no_name.display_name(), None);
    }
}
