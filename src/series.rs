//! Series assembly from raw record streams.
//!
//! One named source yields an ordered stream of raw rows. Each row is parsed
//! into an [`Observation`], validated against the last accepted observation,
//! and annotated with its close delta. Rejections land in an error list that
//! never leaves the source it came from.
//!
//! Two failure classes with different blast radius:
//!
//! - **Validation failure** (OHLC inconsistency, non-monotonic date): the row
//!   is dropped and recorded, scanning continues.
//! - **Parse failure** (malformed date or number): fatal to the remainder of
//!   this source's stream. One error entry records the row number and the
//!   underlying parse message; rows already accepted are kept.
//!
//! Persisting a non-empty error list is the caller's responsibility; this
//! module only produces the data.

use chrono::NaiveDate;

use crate::types::{Observation, RawRecord, RejectedRow, DATE_FORMAT};
use crate::validate::validate_bar;

/// A named, date-ascending sequence of accepted observations.
///
/// The date-ordering invariant is enforced at construction by
/// [`build_series`]; there is no way to push an out-of-order observation.
/// Merge progress bookkeeping (the per-series cursor) is owned by the
/// merger, not stored here.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    name: String,
    observations: Vec<Observation>,
}

impl Series {
    /// The source-derived name, e.g. a file's base name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Accepted observations in ascending date order.
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Mutable access for the scoring pass. Crate-private so the ordering
    /// invariant cannot be broken from outside.
    pub(crate) fn observations_mut(&mut self) -> &mut [Observation] {
        &mut self.observations
    }

    /// Number of accepted observations.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// True if no rows were accepted.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Date of the first observation, if any.
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.observations.first().map(|o| o.date)
    }

    /// Date of the last observation, if any.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.observations.last().map(|o| o.date)
    }
}

/// Consume a raw record stream for one named source.
///
/// Returns the accepted series plus the rejection list (possibly empty).
/// Row numbers in the rejection list are 1-based positions within the
/// record stream as handed in.
///
/// # Example
///
/// ```
/// use market_divergence::{build_series, RawRecord};
///
/// let rows = vec![
///     RawRecord::new("01/02/2020", "10", "11", "9", "10.5", "100", "50"),
///     RawRecord::new("01/03/2020", "10.5", "12", "10", "11.5", "120", "55"),
/// ];
/// let (series, rejected) = build_series("corn", rows);
/// assert_eq!(series.len(), 2);
/// assert!(rejected.is_empty());
/// assert_eq!(series.observations()[1].close_delta, 1.0);
/// ```
pub fn build_series(
    name: impl Into<String>,
    records: impl IntoIterator<Item = RawRecord>,
) -> (Series, Vec<RejectedRow>) {
    let name = name.into();
    let mut observations: Vec<Observation> = Vec::new();
    let mut rejected: Vec<RejectedRow> = Vec::new();

    for (idx, record) in records.into_iter().enumerate() {
        let row = idx + 1;

        let mut obs = match parse_record(&record) {
            Ok(obs) => obs,
            Err(reason) => {
                // Parse failures poison the rest of this stream; keep what
                // was accepted so far.
                rejected.push(RejectedRow {
                    fields: record,
                    row,
                    reason,
                });
                break;
            }
        };

        if let Err(err) = validate_bar(&obs, observations.last()) {
            rejected.push(RejectedRow {
                fields: record,
                row,
                reason: err.to_string(),
            });
            continue;
        }

        obs.close_delta = observations
            .last()
            .map(|prev| (obs.close - prev.close).abs())
            .unwrap_or(0.0);
        observations.push(obs);
    }

    (Series { name, observations }, rejected)
}

/// Parse one raw record into an observation, or a reason string carrying the
/// underlying parse failure.
fn parse_record(record: &RawRecord) -> Result<Observation, String> {
    let date = NaiveDate::parse_from_str(record.date.trim(), DATE_FORMAT)
        .map_err(|e| format!("unparseable date '{}': {e}", record.date))?;
    let open = parse_field("open", &record.open)?;
    let high = parse_field("high", &record.high)?;
    let low = parse_field("low", &record.low)?;
    let close = parse_field("close", &record.close)?;
    let volume = parse_field("volume", &record.volume)?;
    let open_interest = parse_field("open interest", &record.open_interest)?;

    Ok(Observation::new(
        date,
        open,
        high,
        low,
        close,
        volume,
        open_interest,
    ))
}

fn parse_field(field: &str, raw: &str) -> Result<f64, String> {
    raw.trim()
        .parse::<f64>()
        .map_err(|e| format!("unparseable {field} '{raw}': {e}"))
}
