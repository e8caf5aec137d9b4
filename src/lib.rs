//! # market-divergence
//!
//! Rolling Signal-to-Noise Ratio (SNR) and cross-series Market Divergence
//! Index (MDI) for daily price data.
//!
//! The crate is a batch pipeline: independently-dated daily OHLC series go
//! in, a date-ordered wide table comes out. Each series is validated row by
//! row, annotated with close deltas, scored with a rolling SNR, and finally
//! merged with every other series into one table carrying a per-date MDI.
//! Bad rows are segregated into per-source error reports instead of
//! poisoning the run.
//!
//! ## Quick start
//!
//! ```
//! use market_divergence::{DivergencePipeline, PipelineConfig, RawRecord, VecSource};
//!
//! let rows = vec![
//!     RawRecord::new("01/02/2020", "10", "11", "9", "10.5", "100", "50"),
//!     RawRecord::new("01/03/2020", "10.5", "12", "10", "11.5", "120", "55"),
//!     RawRecord::new("01/06/2020", "11.5", "12", "11", "11.75", "90", "52"),
//! ];
//! let source = VecSource::new(rows).with_name("demo");
//!
//! let pipeline = DivergencePipeline::with_config(PipelineConfig { period: 2 })?;
//! let run = pipeline.process(vec![source])?;
//!
//! assert_eq!(run.table.columns(), &["demo".to_string()]);
//! assert_eq!(run.table.rows().len(), 3);
//! # Ok::<(), market_divergence::DivergenceError>(())
//! ```
//!
//! ## Module overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`types`] | Core types: `RawRecord`, `Observation`, `SnrValue`, `RejectedRow` |
//! | [`validate`] | OHLC consistency and date-ordering checks |
//! | [`series`] | Series assembly: raw rows in, `Series` + rejections out |
//! | [`snr`] | Rolling SNR engine |
//! | [`merge`] | Multi-series date-ordered merge with MDI |
//! | [`source`] | Record sources: in-memory vectors, CSV files |
//! | [`report`] | CSV writers for merged tables and error reports |
//! | [`pipeline`] | End-to-end orchestration and run statistics |
//!
//! ## The statistics
//!
//! For window length `P`, the SNR at index `i` compares the net move
//! `|close[i] - close[i-P]|` against the sum of absolute day-to-day moves
//! inside the window `[i-P+1, i]`. Values near 1.0 mean the series went
//! somewhere; values near 0.0 mean it churned. The MDI for a date is the
//! average SNR across all merged series, defined only when every series has
//! a numeric SNR that date.

pub mod error;
pub mod merge;
pub mod pipeline;
pub mod report;
pub mod series;
pub mod snr;
pub mod source;
pub mod types;
pub mod validate;

// Re-exports - Core types
pub use error::{DivergenceError, Result};
pub use types::{Observation, RawRecord, RejectedRow, SnrValue, DATE_FORMAT};

// Re-exports - Pipeline stages
pub use merge::{merge_series, MergedRow, MergedTable};
pub use series::{build_series, Series};
pub use snr::{score_series, snr_at};
pub use validate::{validate_bar, ValidationError};

// Re-exports - Sources and reports
pub use report::{write_error_report, write_history, write_recent, ErrorReport};
pub use source::{CsvSource, RecordSource, VecSource};

// Re-exports - Orchestration
pub use pipeline::{
    DivergencePipeline, PipelineConfig, PipelineRun, RunStats, DEFAULT_PERIOD,
};
