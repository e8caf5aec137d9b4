//! Core data types for daily price observations.
//!
//! These types carry a row of daily price data through the three stages of
//! the pipeline: raw text fields, a validated observation with its close
//! delta, and finally a scored observation carrying an SNR value.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format used by all input files and reports (`MM/DD/YYYY`).
pub const DATE_FORMAT: &str = "%m/%d/%Y";

/// One raw input row: the seven fields exactly as read, untyped.
///
/// Kept verbatim so rejected rows can round-trip into error reports without
/// any reformatting, including fields that never parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub date: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub volume: String,
    pub open_interest: String,
}

impl RawRecord {
    /// Create a record from its seven fields.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        date: impl Into<String>,
        open: impl Into<String>,
        high: impl Into<String>,
        low: impl Into<String>,
        close: impl Into<String>,
        volume: impl Into<String>,
        open_interest: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            open: open.into(),
            high: high.into(),
            low: low.into(),
            close: close.into(),
            volume: volume.into(),
            open_interest: open_interest.into(),
        }
    }

    /// The seven fields in input order, for report rendering.
    pub fn fields(&self) -> [&str; 7] {
        [
            &self.date,
            &self.open,
            &self.high,
            &self.low,
            &self.close,
            &self.volume,
            &self.open_interest,
        ]
    }
}

/// Rolling SNR result for one observation.
///
/// A tagged value rather than a sentinel number: downstream averaging must
/// be able to discriminate a real ratio from "not enough history" without
/// inspecting float contents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SnrValue {
    /// A computed signal-to-noise ratio.
    Value(f64),
    /// Fewer than `period` preceding observations, or zero window noise.
    Insufficient,
}

impl SnrValue {
    /// Returns true if this is a computed ratio.
    #[inline]
    pub fn is_value(&self) -> bool {
        matches!(self, SnrValue::Value(_))
    }

    /// The computed ratio, if any.
    #[inline]
    pub fn value(&self) -> Option<f64> {
        match self {
            SnrValue::Value(v) => Some(*v),
            SnrValue::Insufficient => None,
        }
    }
}

impl std::fmt::Display for SnrValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnrValue::Value(v) => write!(f, "{v}"),
            SnrValue::Insufficient => write!(f, "insufficient data"),
        }
    }
}

/// One accepted daily observation.
///
/// Constructed once per accepted input row, then written exactly twice:
/// `close_delta` during series assembly and `snr` during the rolling pass.
/// Both derived fields start at their neutral values and are never
/// user-supplied. Volume and open interest are opaque pass-through fields;
/// no computation reads them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Calendar date, day precision
    pub date: NaiveDate,

    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,

    /// Opaque numeric field, round-tripped but never used in computation
    pub volume: f64,

    /// Opaque numeric field, round-tripped but never used in computation
    pub open_interest: f64,

    /// Absolute difference from the previous accepted close; 0.0 for the
    /// first observation of a series
    pub close_delta: f64,

    /// Rolling SNR, set by the scoring pass
    pub snr: SnrValue,
}

impl Observation {
    /// Create a new observation with derived fields at their neutral values.
    pub fn new(
        date: NaiveDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        open_interest: f64,
    ) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
            open_interest,
            close_delta: 0.0,
            snr: SnrValue::Insufficient,
        }
    }
}

/// A rejected input row: the raw fields, the 1-based source row number, and
/// a human-readable reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedRow {
    /// The seven raw fields, possibly unparsed or partial
    pub fields: RawRecord,

    /// 1-based row number within the source's record stream
    pub row: usize,

    /// Why the row was rejected
    pub reason: String,
}
