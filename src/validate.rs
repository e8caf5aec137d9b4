//! Row-level validation for daily price bars.
//!
//! A candidate observation is checked for internal OHLC consistency and for
//! monotonic date ordering against the previous accepted observation of the
//! same series. Checks run in a fixed precedence order and the first failing
//! check wins; only one reason is ever reported per row:
//!
//! 1. high < low
//! 2. open > high
//! 3. open < low
//! 4. close > high
//! 5. close < low
//! 6. date equals the previous accepted date
//! 7. date earlier than the previous accepted date
//!
//! Field parse failures are a different error class, surfaced by the series
//! builder, not here. A bar that passes all seven checks is accepted and
//! becomes part of its series.

use thiserror::Error;

use crate::types::Observation;

/// Reason a row failed validation.
///
/// The `Display` strings are the exact reason texts written into error
/// reports.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("high is less than low")]
    HighBelowLow,

    #[error("open is greater than high")]
    OpenAboveHigh,

    #[error("open is less than low")]
    OpenBelowLow,

    #[error("close is greater than high")]
    CloseAboveHigh,

    #[error("close is less than low")]
    CloseBelowLow,

    #[error("duplicate date")]
    DuplicateDate,

    #[error("descending date")]
    DescendingDate,
}

/// Validate a candidate bar against the previous accepted observation.
///
/// `prev` is `None` for the first row of a series, in which case only the
/// OHLC checks apply. Equality at the boundaries is allowed: `low <= open <=
/// high` and `low <= close <= high` are valid bars.
pub fn validate_bar(
    candidate: &Observation,
    prev: Option<&Observation>,
) -> Result<(), ValidationError> {
    if candidate.high < candidate.low {
        return Err(ValidationError::HighBelowLow);
    }
    if candidate.open > candidate.high {
        return Err(ValidationError::OpenAboveHigh);
    }
    if candidate.open < candidate.low {
        return Err(ValidationError::OpenBelowLow);
    }
    if candidate.close > candidate.high {
        return Err(ValidationError::CloseAboveHigh);
    }
    if candidate.close < candidate.low {
        return Err(ValidationError::CloseBelowLow);
    }

    if let Some(prev) = prev {
        if candidate.date == prev.date {
            return Err(ValidationError::DuplicateDate);
        }
        if candidate.date < prev.date {
            return Err(ValidationError::DescendingDate);
        }
    }

    Ok(())
}
