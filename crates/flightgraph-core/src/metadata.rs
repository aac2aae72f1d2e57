//! Airport metadata resolution
//!
//! The reference table is a header-less CSV with positional columns
//! `icao, name, city, country, iata`. Both codes of a row alias the same
//! entry; the first row claiming a code wins. Resolution happens once per
//! distinct code per batch, and codes without metadata are collected in a
//! run-scoped set that is reported once at the end of the run.

use crate::errors::{FlightGraphError, Result};
use crate::log_op_progress;
use crate::model::flight::normalize_code;
use crate::model::{AirportInfo, FlightRecord};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const REQUIRED_COLUMNS: usize = 5;

/// Code → metadata mapping loaded from the reference table
#[derive(Debug, Clone, Default)]
pub struct AirportDirectory {
    entries: Vec<AirportInfo>,
    index: HashMap<String, usize>,
}

impl AirportDirectory {
    /// Load the reference table from a file
    ///
    /// # Errors
    ///
    /// `ReferenceRead` when the file cannot be opened or is not valid CSV.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| FlightGraphError::ReferenceRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_reader(file).map_err(|e| match e {
            FlightGraphError::Io { message, .. } => FlightGraphError::ReferenceRead {
                path: path.to_path_buf(),
                reason: message,
            },
            other => other,
        })
    }

    /// Load the reference table from any reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut directory = Self::default();
        for row in csv_reader.records() {
            let row = row?;
            if row.len() < REQUIRED_COLUMNS {
                continue;
            }
            let field = |i: usize| row.get(i).unwrap_or("").trim();
            let info = AirportInfo {
                name: field(1).to_string(),
                city: field(2).to_string(),
                country: field(3).to_string(),
            };
            if info.location().is_none() {
                continue;
            }
            directory.insert(&[field(0), field(4)], info);
        }
        Ok(directory)
    }

    fn insert(&mut self, codes: &[&str], info: AirportInfo) {
        let slot = self.entries.len();
        let mut used = false;
        for code in codes {
            let code = normalize_code(code);
            if code.is_empty() || self.index.contains_key(&code) {
                continue;
            }
            self.index.insert(code, slot);
            used = true;
        }
        if used {
            self.entries.push(info);
        }
    }

    /// Look up a code after normalization
    pub fn get(&self, code: &str) -> Option<&AirportInfo> {
        self.index
            .get(&normalize_code(code))
            .and_then(|&slot| self.entries.get(slot))
    }

    /// Number of registered codes (aliases counted separately)
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

/// What to do with a flight whose endpoint has no metadata
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingMetadataPolicy {
    /// Exclude the flight from the batch
    #[default]
    Drop,
    /// Import the flight without city/country/name for that endpoint
    ImportUnenriched,
}

/// A flight excluded from the graph for lack of metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedFlight {
    pub flight_id: String,
    pub missing: Vec<String>,
}

/// One batch after the metadata join
#[derive(Debug, Clone, Default)]
pub struct EnrichedBatch {
    pub records: Vec<FlightRecord>,
    pub dropped: Vec<DroppedFlight>,
}

/// Run-scoped resolver: reference mapping plus the missing-code set
///
/// Constructed once per run and discarded with it.
#[derive(Debug, Clone, Default)]
pub struct MetadataResolver {
    directory: Option<AirportDirectory>,
    policy: MissingMetadataPolicy,
    missing: BTreeSet<String>,
}

impl MetadataResolver {
    pub fn new(directory: AirportDirectory, policy: MissingMetadataPolicy) -> Self {
        Self {
            directory: Some(directory),
            policy,
            missing: BTreeSet::new(),
        }
    }

    /// Resolver for runs with enrichment switched off: nothing is looked up,
    /// dropped or reported
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.directory.is_some()
    }

    pub fn policy(&self) -> MissingMetadataPolicy {
        self.policy
    }

    /// Resolve one code, recording it as missing when absent
    pub fn resolve(&mut self, code: &str) -> Option<AirportInfo> {
        let directory = self.directory.as_ref()?;
        let normalized = normalize_code(code);
        if normalized.is_empty() {
            return None;
        }
        match directory.get(&normalized) {
            Some(info) => Some(info.clone()),
            None => {
                self.missing.insert(normalized);
                None
            }
        }
    }

    /// Join a batch against the reference mapping
    ///
    /// Each distinct code in the batch is looked up once. Under
    /// [`MissingMetadataPolicy::Drop`] a flight with either endpoint
    /// unresolved is removed from the batch.
    pub fn enrich_batch(&mut self, records: Vec<FlightRecord>) -> EnrichedBatch {
        if !self.is_enabled() {
            return EnrichedBatch {
                records,
                dropped: Vec::new(),
            };
        }

        let codes: BTreeSet<&str> = records
            .iter()
            .flat_map(|r| [r.adep.as_str(), r.ades.as_str()])
            .collect();
        let resolved: BTreeMap<String, Option<AirportInfo>> = codes
            .into_iter()
            .map(|code| (code.to_string(), self.resolve(code)))
            .collect();

        let mut batch = EnrichedBatch::default();
        for mut record in records {
            let adep_info = resolved.get(&record.adep).cloned().flatten();
            let ades_info = resolved.get(&record.ades).cloned().flatten();

            if self.policy == MissingMetadataPolicy::Drop
                && (adep_info.is_none() || ades_info.is_none())
            {
                let missing: Vec<String> = [(&record.adep, &adep_info), (&record.ades, &ades_info)]
                    .into_iter()
                    .filter(|(_, info)| info.is_none())
                    .map(|(code, _)| code.clone())
                    .collect();
                log_op_progress!(
                    "enrich",
                    format!(
                        "dropping flight {}: no metadata for {}",
                        record.flight_id,
                        missing.join(", ")
                    ),
                    flight_id = record.flight_id.as_str(),
                    missing = missing.join(",").as_str()
                );
                batch.dropped.push(DroppedFlight {
                    flight_id: record.flight_id,
                    missing,
                });
                continue;
            }

            record.adep_info = adep_info;
            record.ades_info = ades_info;
            batch.records.push(record);
        }
        batch
    }

    /// Codes seen without metadata during this run, sorted and deduplicated
    pub fn missing_codes(&self) -> &BTreeSet<String> {
        &self.missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE: &str = "\
EPWA,Warsaw Chopin Airport,Warsaw,Poland,WAW
EGLL,London Heathrow,London,United Kingdom,LHR
KXYZ,Nowhere Field,,United States,XYZ
SHORT,Too,Few
EPWR,Wroclaw Airport,Wroclaw,Poland,WAW
";

    #[test]
    fn test_load_registers_both_aliases() {
        let directory = AirportDirectory::from_reader(REFERENCE.as_bytes()).unwrap();
        assert_eq!(directory.get("EPWA"), directory.get("waw"));
        assert_eq!(directory.get(" lhr ").unwrap().city, "London");
    }

    #[test]
    fn test_load_skips_short_rows_and_missing_city() {
        let directory = AirportDirectory::from_reader(REFERENCE.as_bytes()).unwrap();
        assert!(directory.get("KXYZ").is_none());
        assert!(directory.get("SHORT").is_none());
    }

    #[test]
    fn test_alias_collision_first_seen_wins() {
        let directory = AirportDirectory::from_reader(REFERENCE.as_bytes()).unwrap();
        assert_eq!(directory.get("WAW").unwrap().city, "Warsaw");
        assert_eq!(directory.get("EPWR").unwrap().city, "Wroclaw");
    }

    #[test]
    fn test_resolve_records_missing_once() {
        let directory = AirportDirectory::from_reader(REFERENCE.as_bytes()).unwrap();
        let mut resolver = MetadataResolver::new(directory, MissingMetadataPolicy::Drop);

        assert!(resolver.resolve("zzzz").is_none());
        assert!(resolver.resolve("ZZZZ ").is_none());
        assert!(resolver.resolve("EPWA").is_some());

        let missing: Vec<&str> = resolver.missing_codes().iter().map(String::as_str).collect();
        assert_eq!(missing, vec!["ZZZZ"]);
    }

    #[test]
    fn test_disabled_resolver_never_reports() {
        let mut resolver = MetadataResolver::disabled();
        assert!(resolver.resolve("ZZZZ").is_none());
        assert!(resolver.missing_codes().is_empty());
    }
}
