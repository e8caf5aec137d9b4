//! End-to-end orchestration: sources in, merged table and reports out.
//!
//! The pipeline runs each source through series assembly and SNR scoring,
//! then merges everything into one wide table. Partial success is the norm:
//! a source that cannot be read is logged and skipped, a source with bad
//! rows contributes its good rows plus an error report, and neither affects
//! any other source.

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::Result;
use crate::merge::{merge_series, MergedTable};
use crate::report::ErrorReport;
use crate::series::build_series;
use crate::snr::score_series;
use crate::source::RecordSource;

/// Default rolling window length.
pub const DEFAULT_PERIOD: usize = 97;

/// Pipeline configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PipelineConfig {
    /// Rolling window length P: the number of trailing observations
    /// (including the current one) in each SNR window, and the data-row
    /// count of the recent report.
    pub period: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            period: DEFAULT_PERIOD,
        }
    }
}

impl PipelineConfig {
    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.period == 0 {
            return Err(crate::error::DivergenceError::InvalidPeriod(0));
        }
        Ok(())
    }
}

/// Counters for one pipeline run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStats {
    /// Sources handed to the pipeline
    pub sources: usize,

    /// Sources that could not be read at all
    pub sources_failed: usize,

    /// Rows accepted across all sources
    pub rows_accepted: u64,

    /// Rows rejected across all sources
    pub rows_rejected: u64,

    /// Rejection counts per offending source, in processing order
    pub rows_rejected_by_source: IndexMap<String, u64>,

    /// Series that made it into the merge
    pub series_merged: usize,

    /// Data rows in the merged table
    pub merged_rows: usize,
}

/// Everything one run produces.
#[derive(Debug)]
pub struct PipelineRun {
    /// The merged wide table (full history; the recent view is a slice of it)
    pub table: MergedTable,

    /// One error report per source with at least one rejection
    pub reports: Vec<ErrorReport>,

    /// Run counters
    pub stats: RunStats,
}

/// The batch pipeline: validate, score, merge.
///
/// # Example
///
/// ```
/// use market_divergence::{DivergencePipeline, PipelineConfig, RawRecord, SnrValue, VecSource};
///
/// let rows = vec![
///     RawRecord::new("01/02/2020", "10", "11", "9", "10.5", "100", "50"),
///     RawRecord::new("01/03/2020", "10.5", "12", "10", "11.5", "100", "50"),
///     RawRecord::new("01/06/2020", "11.5", "12", "11", "11.75", "100", "50"),
/// ];
/// let source = VecSource::new(rows).with_name("demo");
///
/// let pipeline = DivergencePipeline::with_config(PipelineConfig { period: 1 })?;
/// let run = pipeline.process(vec![source])?;
///
/// assert_eq!(run.table.rows().len(), 3);
/// assert!(matches!(run.table.rows()[1].mdi, SnrValue::Value(_)));
/// # Ok::<(), market_divergence::DivergenceError>(())
/// ```
#[derive(Debug, Clone)]
pub struct DivergencePipeline {
    config: PipelineConfig,
}

impl DivergencePipeline {
    /// Create a pipeline with the default window length.
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
        }
    }

    /// Create a pipeline with an explicit configuration.
    pub fn with_config(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configured window length.
    pub fn period(&self) -> usize {
        self.config.period
    }

    /// Run the full pipeline over a set of sources.
    ///
    /// Source order only matters for tie-breaking column order when two
    /// series share a first date. A source that fails to read is skipped
    /// and counted; its failure never reaches the other sources.
    pub fn process<S: RecordSource>(&self, sources: Vec<S>) -> Result<PipelineRun> {
        let mut stats = RunStats::default();
        let mut reports = Vec::new();
        let mut scored = Vec::new();

        for source in sources {
            stats.sources += 1;
            let name = source.name().to_string();

            let records = match source.records() {
                Ok(records) => records,
                Err(err) => {
                    log::error!("skipping source '{name}': {err}");
                    stats.sources_failed += 1;
                    continue;
                }
            };

            let (mut series, rejected) = build_series(name.clone(), records);
            stats.rows_accepted += series.len() as u64;
            stats.rows_rejected += rejected.len() as u64;
            if !rejected.is_empty() {
                log::info!("source '{name}': {} row(s) rejected", rejected.len());
                stats
                    .rows_rejected_by_source
                    .insert(name.clone(), rejected.len() as u64);
                reports.push(ErrorReport::new(name.clone(), rejected));
            }

            score_series(&mut series, self.config.period);
            log::debug!("scored {} observation(s) for '{name}'", series.len());
            scored.push(series);
        }

        let table = merge_series(scored);
        stats.series_merged = table.columns().len();
        stats.merged_rows = table.rows().len();

        Ok(PipelineRun {
            table,
            reports,
            stats,
        })
    }
}

impl Default for DivergencePipeline {
    fn default() -> Self {
        Self::new()
    }
}
