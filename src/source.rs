//! Record source abstraction for flexible data ingestion.
//!
//! The pipeline core consumes ordered streams of raw 7-field records; this
//! module supplies them. A trait keeps the core independent of where rows
//! come from, with two implementations: an in-memory vector (tests and
//! simulations) and a CSV reader over files or any `io::Read`.
//!
//! # Example
//!
//! ```
//! use market_divergence::{RawRecord, RecordSource, VecSource};
//!
//! let rows = vec![RawRecord::new("01/02/2020", "10", "11", "9", "10.5", "100", "50")];
//! let source = VecSource::new(rows).with_name("demo");
//!
//! assert_eq!(source.name(), "demo");
//! let records: Vec<_> = source.records().unwrap().collect();
//! assert_eq!(records.len(), 1);
//! ```

use std::fs::File;
use std::io;
use std::path::Path;

use crate::error::{DivergenceError, Result};
use crate::types::RawRecord;

/// A named, ordered stream of raw input records.
///
/// `records()` consumes `self` to allow single-pass iteration. The name
/// becomes the series name and the error-report identity, so it should be
/// stable and human-readable (a file's base name, a ticker).
pub trait RecordSource {
    /// The iterator type for records.
    type RecordIter: Iterator<Item = RawRecord>;

    /// Source name, used as the series name.
    fn name(&self) -> &str;

    /// Consume the source and return its records in input order.
    fn records(self) -> Result<Self::RecordIter>;
}

// ============================================================================
// Vector source (for testing)
// ============================================================================

/// A simple in-memory source.
pub struct VecSource {
    name: String,
    records: Vec<RawRecord>,
}

impl VecSource {
    /// Create a new vector source named "memory".
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self {
            name: "memory".to_string(),
            records,
        }
    }

    /// Set the source name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl RecordSource for VecSource {
    type RecordIter = std::vec::IntoIter<RawRecord>;

    fn name(&self) -> &str {
        &self.name
    }

    fn records(self) -> Result<Self::RecordIter> {
        Ok(self.records.into_iter())
    }
}

// ============================================================================
// CSV source
// ============================================================================

/// A source reading 7-field rows from CSV.
///
/// Rows are read without header interpretation by default; files carrying a
/// single leading header row can opt in to skipping it. Short rows are
/// padded with empty fields and surface downstream as parse failures with
/// the right row number attached, rather than killing the whole source.
///
/// # Example
///
/// ```
/// use market_divergence::{CsvSource, RecordSource};
///
/// let data = "01/02/2020,10,11,9,10.5,100,50\n01/03/2020,10.5,12,10,11.5,120,55\n";
/// let source = CsvSource::from_reader("corn", data.as_bytes());
/// let records: Vec<_> = source.records().unwrap().collect();
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[0].close, "10.5");
/// ```
pub struct CsvSource<R: io::Read> {
    name: String,
    reader: csv::Reader<R>,
    skip_header_row: bool,
}

impl CsvSource<File> {
    /// Open a CSV file; the source name is the file stem.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("source")
            .to_string();
        let reader = reader_builder()
            .from_path(path)
            .map_err(|e| DivergenceError::source(&name, e.to_string()))?;
        Ok(Self {
            name,
            reader,
            skip_header_row: false,
        })
    }
}

impl<R: io::Read> CsvSource<R> {
    /// Wrap any reader with an explicit source name.
    pub fn from_reader(name: impl Into<String>, reader: R) -> Self {
        Self {
            name: name.into(),
            reader: reader_builder().from_reader(reader),
            skip_header_row: false,
        }
    }

    /// Skip a single leading header row.
    pub fn skip_header_row(mut self, skip: bool) -> Self {
        self.skip_header_row = skip;
        self
    }
}

fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All);
    builder
}

impl<R: io::Read> RecordSource for CsvSource<R> {
    type RecordIter = std::vec::IntoIter<RawRecord>;

    fn name(&self) -> &str {
        &self.name
    }

    fn records(mut self) -> Result<Self::RecordIter> {
        let mut out = Vec::new();
        for (idx, result) in self.reader.records().enumerate() {
            let record =
                result.map_err(|e| DivergenceError::source(&self.name, e.to_string()))?;
            if idx == 0 && self.skip_header_row {
                continue;
            }
            let field = |i: usize| record.get(i).unwrap_or("").to_string();
            out.push(RawRecord::new(
                field(0),
                field(1),
                field(2),
                field(3),
                field(4),
                field(5),
                field(6),
            ));
        }
        Ok(out.into_iter())
    }
}
