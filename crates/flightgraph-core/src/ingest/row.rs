//! Raw flight-event rows and their validation into [`FlightRecord`]s

use crate::errors::{FlightGraphError, Result};
use crate::model::flight::normalize_code;
use crate::model::FlightRecord;
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::path::Path;

/// Timestamp layout of the source files (`01-03-2018 10:00:00`)
pub const TIMESTAMP_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// One data row as it appears in the file; every field still text
#[derive(Debug, Clone, Deserialize)]
pub struct RawFlightRow {
    #[serde(rename = "ECTRL ID")]
    pub flight_id: String,
    #[serde(rename = "ADEP")]
    pub adep: String,
    #[serde(rename = "ADEP Latitude")]
    pub adep_lat: String,
    #[serde(rename = "ADEP Longitude")]
    pub adep_lon: String,
    #[serde(rename = "ADES")]
    pub ades: String,
    #[serde(rename = "ADES Latitude")]
    pub ades_lat: String,
    #[serde(rename = "ADES Longitude")]
    pub ades_lon: String,
    #[serde(rename = "AC Operator")]
    pub operator: String,
    #[serde(rename = "AC Type")]
    pub ac_type: String,
    #[serde(rename = "ACTUAL OFF BLOCK TIME")]
    pub off_block: String,
    #[serde(rename = "ACTUAL ARRIVAL TIME")]
    pub arrival: String,
    #[serde(rename = "Actual Distance Flown (nm)")]
    pub distance_nm: String,
}

struct RowContext<'a> {
    path: &'a Path,
    line: u64,
}

impl RowContext<'_> {
    fn error(&self, field: &str, value: &str, reason: impl Into<String>) -> FlightGraphError {
        FlightGraphError::RowParse {
            path: self.path.to_path_buf(),
            line: self.line,
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    fn text(&self, field: &str, value: &str) -> Result<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(self.error(field, value, "required value is empty"));
        }
        Ok(trimmed.to_string())
    }

    fn code(&self, field: &str, value: &str) -> Result<String> {
        let code = normalize_code(value);
        if code.is_empty() {
            return Err(self.error(field, value, "airport code is empty"));
        }
        Ok(code)
    }

    fn coordinate(&self, field: &str, value: &str) -> Result<f64> {
        let parsed: f64 = value
            .trim()
            .parse()
            .map_err(|e: std::num::ParseFloatError| self.error(field, value, e.to_string()))?;
        if !parsed.is_finite() {
            return Err(self.error(field, value, "not a finite number"));
        }
        Ok(parsed)
    }

    fn timestamp(&self, field: &str, value: &str) -> Result<NaiveDateTime> {
        NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT).map_err(|e| {
            self.error(
                field,
                value,
                format!("{} (expected DD-MM-YYYY HH:MM:SS)", e),
            )
        })
    }

    /// Integer, or a finite float truncated toward zero (`512.0`)
    ///
    /// Floats whose integer part does not fit in `i64` are rejected rather
    /// than saturated.
    fn integer(&self, field: &str, value: &str) -> Result<i64> {
        let trimmed = value.trim();
        if let Ok(i) = trimmed.parse::<i64>() {
            return Ok(i);
        }
        // 2^63, exact in f64
        let bound = -(i64::MIN as f64);
        match trimmed.parse::<f64>() {
            Ok(f) if f.is_finite() => {
                let whole = f.trunc();
                if (-bound..bound).contains(&whole) {
                    Ok(whole as i64)
                } else {
                    Err(self.error(field, value, "integer out of range"))
                }
            }
            _ => Err(self.error(field, value, "not an integer")),
        }
    }
}

/// Whole minutes between two timestamps, truncated toward zero
pub fn duration_minutes(off_block: NaiveDateTime, arrival: NaiveDateTime) -> i64 {
    (arrival - off_block).num_seconds() / 60
}

impl RawFlightRow {
    /// Validate and normalize into an import record
    ///
    /// `line` is the 1-based data row number used in error reports.
    ///
    /// # Errors
    ///
    /// `RowParse` naming the first offending column.
    pub fn parse(self, path: &Path, line: u64) -> Result<FlightRecord> {
        let ctx = RowContext { path, line };

        let off_block = ctx.timestamp("ACTUAL OFF BLOCK TIME", &self.off_block)?;
        let arrival = ctx.timestamp("ACTUAL ARRIVAL TIME", &self.arrival)?;

        Ok(FlightRecord {
            flight_id: ctx.text("ECTRL ID", &self.flight_id)?,
            adep: ctx.code("ADEP", &self.adep)?,
            adep_lat: ctx.coordinate("ADEP Latitude", &self.adep_lat)?,
            adep_lon: ctx.coordinate("ADEP Longitude", &self.adep_lon)?,
            ades: ctx.code("ADES", &self.ades)?,
            ades_lat: ctx.coordinate("ADES Latitude", &self.ades_lat)?,
            ades_lon: ctx.coordinate("ADES Longitude", &self.ades_lon)?,
            operator: ctx.text("AC Operator", &self.operator)?,
            ac_type: ctx.text("AC Type", &self.ac_type)?,
            off_block,
            arrival,
            day: off_block.date(),
            duration_min: duration_minutes(off_block, arrival),
            distance_nm: ctx.integer("Actual Distance Flown (nm)", &self.distance_nm)?,
            adep_info: None,
            ades_info: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn raw(off_block: &str, arrival: &str, distance: &str) -> RawFlightRow {
        RawFlightRow {
            flight_id: "186858226".into(),
            adep: " epwa".into(),
            adep_lat: "52.1657".into(),
            adep_lon: "20.9671".into(),
            ades: "EGLL ".into(),
            ades_lat: "51.4775".into(),
            ades_lon: "-0.461389".into(),
            operator: "LOT".into(),
            ac_type: "B738".into(),
            off_block: off_block.into(),
            arrival: arrival.into(),
            distance_nm: distance.into(),
        }
    }

    #[test]
    fn test_duration_truncates_to_whole_minutes() {
        let record = raw("01-03-2018 10:00:00", "01-03-2018 11:32:30", "800")
            .parse(Path::new("f.csv"), 1)
            .unwrap();
        assert_eq!(record.duration_min, 92);
    }

    #[test]
    fn test_day_is_departure_date_and_codes_normalized() {
        let record = raw("31-12-2018 23:50:00", "01-01-2019 02:10:00", "1200")
            .parse(Path::new("f.csv"), 1)
            .unwrap();
        assert_eq!(record.day, NaiveDate::from_ymd_opt(2018, 12, 31).unwrap());
        assert_eq!(record.day_key(), "2018-12-31");
        assert_eq!(record.adep, "EPWA");
        assert_eq!(record.ades, "EGLL");
        assert_eq!(record.off_block_iso(), "2018-12-31T23:50:00");
    }

    #[test]
    fn test_float_distance_is_truncated() {
        let record = raw("01-03-2018 10:00:00", "01-03-2018 11:00:00", "512.0")
            .parse(Path::new("f.csv"), 1)
            .unwrap();
        assert_eq!(record.distance_nm, 512);
    }

    #[test]
    fn test_malformed_timestamp_is_row_error() {
        let err = raw("2018-03-01 10:00:00", "01-03-2018 11:00:00", "1")
            .parse(Path::new("f.csv"), 4)
            .unwrap_err();
        match err {
            FlightGraphError::RowParse { line, field, .. } => {
                assert_eq!(line, 4);
                assert_eq!(field, "ACTUAL OFF BLOCK TIME");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_non_numeric_distance_is_row_error() {
        let err = raw("01-03-2018 10:00:00", "01-03-2018 11:00:00", "far")
            .parse(Path::new("f.csv"), 2)
            .unwrap_err();
        assert!(matches!(err, FlightGraphError::RowParse { ref field, .. } if field == "Actual Distance Flown (nm)"));
    }

    #[test]
    fn test_out_of_range_distance_is_row_error() {
        for distance in ["1e300", "-1e19", "9223372036854775808.0"] {
            let err = raw("01-03-2018 10:00:00", "01-03-2018 11:00:00", distance)
                .parse(Path::new("f.csv"), 3)
                .unwrap_err();
            match err {
                FlightGraphError::RowParse { value, reason, .. } => {
                    assert_eq!(value, distance);
                    assert_eq!(reason, "integer out of range");
                }
                other => panic!("unexpected error {other:?}"),
            }
        }

        let record = raw("01-03-2018 10:00:00", "01-03-2018 11:00:00", "-12.9")
            .parse(Path::new("f.csv"), 3)
            .unwrap();
        assert_eq!(record.distance_nm, -12);
    }
}
