//! Property-graph vocabulary: node labels, relationship types and node keys
//!
//! Every node is identified by its label plus the values of that label's
//! key properties. Stores compare keys through `NodeKey::canonical`, so two
//! keys are the same node exactly when label and key values match.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Node property map, ordered for deterministic serialization
pub type Props = BTreeMap<String, Value>;

/// Node labels of the flight graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Label {
    Airport,
    Flight,
    Airline,
    AircraftType,
    Day,
    Country,
    City,
    CountryStats,
}

impl Label {
    pub const ALL: [Label; 8] = [
        Label::Airport,
        Label::Flight,
        Label::Airline,
        Label::AircraftType,
        Label::Day,
        Label::Country,
        Label::City,
        Label::CountryStats,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Airport => "Airport",
            Label::Flight => "Flight",
            Label::Airline => "Airline",
            Label::AircraftType => "AircraftType",
            Label::Day => "Day",
            Label::Country => "Country",
            Label::City => "City",
            Label::CountryStats => "CountryStats",
        }
    }

    /// Property names forming the uniqueness key, in key order
    pub fn key_properties(&self) -> &'static [&'static str] {
        match self {
            Label::Airport => &["code"],
            Label::Flight => &["id"],
            Label::Airline => &["code"],
            Label::AircraftType => &["type"],
            Label::Day => &["date"],
            Label::Country => &["name"],
            Label::City => &["name", "countryName"],
            Label::CountryStats => &["countryName", "year"],
        }
    }

    pub fn parse(s: &str) -> Option<Label> {
        Label::ALL.into_iter().find(|l| l.as_str() == s)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relationship types; an edge is unique per (type, source, target)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RelType {
    DepartsFrom,
    ArrivesTo,
    OperatedBy,
    Aircraft,
    OnDay,
    InCountry,
    InCity,
    HasStats,
}

impl RelType {
    pub const ALL: [RelType; 8] = [
        RelType::DepartsFrom,
        RelType::ArrivesTo,
        RelType::OperatedBy,
        RelType::Aircraft,
        RelType::OnDay,
        RelType::InCountry,
        RelType::InCity,
        RelType::HasStats,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RelType::DepartsFrom => "DEPARTS_FROM",
            RelType::ArrivesTo => "ARRIVES_TO",
            RelType::OperatedBy => "OPERATED_BY",
            RelType::Aircraft => "AIRCRAFT",
            RelType::OnDay => "ON_DAY",
            RelType::InCountry => "IN_COUNTRY",
            RelType::InCity => "IN_CITY",
            RelType::HasStats => "HAS_STATS",
        }
    }

    pub fn parse(s: &str) -> Option<RelType> {
        RelType::ALL.into_iter().find(|r| r.as_str() == s)
    }
}

impl fmt::Display for RelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single key component
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyValue {
    Int(i64),
    Text(String),
}

impl KeyValue {
    pub fn to_json(&self) -> Value {
        match self {
            KeyValue::Int(i) => Value::from(*i),
            KeyValue::Text(s) => Value::from(s.as_str()),
        }
    }
}

impl From<&str> for KeyValue {
    fn from(s: &str) -> Self {
        KeyValue::Text(s.to_string())
    }
}

impl From<String> for KeyValue {
    fn from(s: String) -> Self {
        KeyValue::Text(s)
    }
}

impl From<i64> for KeyValue {
    fn from(i: i64) -> Self {
        KeyValue::Int(i)
    }
}

/// Identity of a node: label plus key values
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeKey {
    label: Label,
    values: Vec<KeyValue>,
}

impl NodeKey {
    fn new(label: Label, values: Vec<KeyValue>) -> Self {
        debug_assert_eq!(label.key_properties().len(), values.len());
        Self { label, values }
    }

    pub fn airport(code: &str) -> Self {
        Self::new(Label::Airport, vec![code.into()])
    }

    pub fn flight(id: &str) -> Self {
        Self::new(Label::Flight, vec![id.into()])
    }

    pub fn airline(code: &str) -> Self {
        Self::new(Label::Airline, vec![code.into()])
    }

    pub fn aircraft_type(ac_type: &str) -> Self {
        Self::new(Label::AircraftType, vec![ac_type.into()])
    }

    pub fn day(date: &str) -> Self {
        Self::new(Label::Day, vec![date.into()])
    }

    pub fn country(name: &str) -> Self {
        Self::new(Label::Country, vec![name.into()])
    }

    pub fn city(name: &str, country: &str) -> Self {
        Self::new(Label::City, vec![name.into(), country.into()])
    }

    pub fn country_stats(country: &str, year: i64) -> Self {
        Self::new(Label::CountryStats, vec![country.into(), year.into()])
    }

    pub fn label(&self) -> Label {
        self.label
    }

    pub fn values(&self) -> &[KeyValue] {
        &self.values
    }

    /// Canonical JSON array of key values, e.g. `["Springfield","USA"]`
    pub fn canonical(&self) -> String {
        Value::Array(self.values.iter().map(KeyValue::to_json).collect()).to_string()
    }

    /// Key properties as a property map (`{"code": "EPWA"}`)
    pub fn key_props(&self) -> Props {
        self.label
            .key_properties()
            .iter()
            .zip(&self.values)
            .map(|(name, value)| (name.to_string(), value.to_json()))
            .collect()
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.label, self.canonical())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composite_city_key_distinguishes_countries() {
        let a = NodeKey::city("Springfield", "United States");
        let b = NodeKey::city("Springfield", "Australia");
        assert_ne!(a, b);
        assert_ne!(a.canonical(), b.canonical());
        assert_eq!(a.canonical(), r#"["Springfield","United States"]"#);
    }

    #[test]
    fn test_key_props_use_label_key_names() {
        let key = NodeKey::country_stats("Poland", 2019);
        let props = key.key_props();
        assert_eq!(props["countryName"], Value::from("Poland"));
        assert_eq!(props["year"], Value::from(2019));
    }

    #[test]
    fn test_label_and_rel_names_round_trip() {
        for label in Label::ALL {
            assert_eq!(Label::parse(label.as_str()), Some(label));
        }
        for rel in RelType::ALL {
            assert_eq!(RelType::parse(rel.as_str()), Some(rel));
        }
    }

    #[test]
    fn test_display_names_node() {
        assert_eq!(NodeKey::airport("EPWA").to_string(), r#"Airport["EPWA"]"#);
    }
}
