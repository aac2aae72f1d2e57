//! CSV source files, plain or gzip-compressed

use crate::errors::{FlightGraphError, Result};
use crate::ingest::row::RawFlightRow;
use crate::model::FlightRecord;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// Columns every flight-event file must carry
pub const REQUIRED_COLUMNS: [&str; 12] = [
    "ECTRL ID",
    "ADEP",
    "ADEP Latitude",
    "ADEP Longitude",
    "ADES",
    "ADES Latitude",
    "ADES Longitude",
    "AC Operator",
    "AC Type",
    "ACTUAL OFF BLOCK TIME",
    "ACTUAL ARRIVAL TIME",
    "Actual Distance Flown (nm)",
];

/// Compression inferred from the file name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
}

impl Compression {
    /// Infer compression from the last extension
    ///
    /// # Errors
    ///
    /// `UnsupportedCompression` for archive formats we do not decode.
    pub fn for_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("gz") | Some("gzip") => Ok(Compression::Gzip),
            Some("bz2") | Some("zip") | Some("xz") | Some("zst") | Some("tar") => {
                Err(FlightGraphError::UnsupportedCompression {
                    path: path.to_path_buf(),
                })
            }
            _ => Ok(Compression::None),
        }
    }
}

/// Open a header-based CSV reader over a plain or gzip file
pub fn open_csv(path: &Path) -> Result<csv::Reader<Box<dyn Read>>> {
    let compression = Compression::for_path(path)?;
    let file = File::open(path).map_err(|e| FlightGraphError::Io {
        op: "open_source".to_string(),
        message: format!("{}: {}", path.display(), e),
    })?;

    let reader: Box<dyn Read> = match compression {
        Compression::Gzip => Box::new(GzDecoder::new(BufReader::new(file))),
        Compression::None => Box::new(BufReader::new(file)),
    };

    Ok(csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader))
}

/// One flight-event file
#[derive(Debug, Clone)]
pub struct FlightSource {
    path: PathBuf,
}

impl FlightSource {
    /// # Errors
    ///
    /// `SourceNotFound` if the file does not exist, `UnsupportedCompression`
    /// for archive formats.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.is_file() {
            return Err(FlightGraphError::SourceNotFound { path });
        }
        Compression::for_path(&path)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name for progress lines
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Count data rows with a streaming pass (no parsing)
    pub fn count_rows(&self) -> Result<u64> {
        let mut reader = open_csv(&self.path)?;
        let mut record = csv::ByteRecord::new();
        let mut count = 0;
        while reader
            .read_byte_record(&mut record)
            .map_err(|e| self.row_error(count + 1, e))?
        {
            count += 1;
        }
        Ok(count)
    }

    /// Validated rows, in file order
    ///
    /// # Errors
    ///
    /// `MissingColumn` when the header lacks a required column.
    pub fn rows(&self) -> Result<FlightRows> {
        let mut reader = open_csv(&self.path)?;
        let headers = reader.headers()?.clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h.trim() == column) {
                return Err(FlightGraphError::MissingColumn {
                    path: self.path.clone(),
                    column: column.to_string(),
                });
            }
        }
        let trimmed: csv::StringRecord = headers.iter().map(str::trim).collect();
        reader.set_headers(trimmed);

        Ok(FlightRows {
            path: self.path.clone(),
            inner: reader.into_deserialize(),
            line: 0,
        })
    }

    fn row_error(&self, line: u64, err: csv::Error) -> FlightGraphError {
        FlightGraphError::RowParse {
            path: self.path.clone(),
            line,
            field: "record".to_string(),
            value: String::new(),
            reason: err.to_string(),
        }
    }
}

/// Iterator of validated flight records
pub struct FlightRows {
    path: PathBuf,
    inner: csv::DeserializeRecordsIntoIter<Box<dyn Read>, RawFlightRow>,
    line: u64,
}

impl Iterator for FlightRows {
    type Item = Result<FlightRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let raw = self.inner.next()?;
        self.line += 1;
        Some(match raw {
            Ok(raw) => raw.parse(&self.path, self.line),
            Err(e) => Err(FlightGraphError::RowParse {
                path: self.path.clone(),
                line: self.line,
                field: "record".to_string(),
                value: String::new(),
                reason: e.to_string(),
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compression_inference() {
        assert_eq!(
            Compression::for_path(Path::new("a/flights.csv")).unwrap(),
            Compression::None
        );
        assert_eq!(
            Compression::for_path(Path::new("flights.csv.gz")).unwrap(),
            Compression::Gzip
        );
        assert!(matches!(
            Compression::for_path(Path::new("flights.csv.bz2")),
            Err(FlightGraphError::UnsupportedCompression { .. })
        ));
    }

    #[test]
    fn test_missing_source_is_reported() {
        let err = FlightSource::new("does/not/exist.csv").unwrap_err();
        assert!(matches!(err, FlightGraphError::SourceNotFound { .. }));
    }
}
