//! CSV rendering of merged tables and per-source error reports.
//!
//! Writers take any `io::Write`, so the caller decides placement: files for
//! the CLI, byte buffers for tests. Both merged reports carry the same two
//! header rows; the recent report is the trailing window of the historical
//! one, headers verbatim.

use std::io::Write;

use serde::Serialize;

use crate::error::Result;
use crate::merge::{MergedRow, MergedTable};
use crate::types::{RejectedRow, DATE_FORMAT};

/// Column labels of the error report.
pub const ERROR_REPORT_HEADER: [&str; 9] = [
    "Date",
    "Open",
    "High",
    "Low",
    "Close",
    "Volume",
    "OpenInt",
    "Row",
    "Reason",
];

/// All rejections from one source.
///
/// Emitted only when a source has at least one rejected row; a clean source
/// produces no report. One report never mixes rows from different sources.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    /// The offending source's name
    pub source: String,

    /// Rejections in scan order
    pub rows: Vec<RejectedRow>,
}

impl ErrorReport {
    pub fn new(source: impl Into<String>, rows: Vec<RejectedRow>) -> Self {
        Self {
            source: source.into(),
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Write the full historical report: two header rows plus every data row.
pub fn write_history<W: Write>(table: &MergedTable, writer: W) -> Result<()> {
    write_rows(table, table.rows(), writer)
}

/// Write the recent report: the same two header rows plus the trailing
/// `period` data rows.
pub fn write_recent<W: Write>(table: &MergedTable, period: usize, writer: W) -> Result<()> {
    write_rows(table, table.recent_rows(period), writer)
}

fn write_rows<W: Write>(table: &MergedTable, rows: &[MergedRow], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    for header in table.header_rows() {
        wtr.write_record(&header)?;
    }

    let width = 2 * table.columns().len() + 2;
    for row in rows {
        let mut record = Vec::with_capacity(width);
        record.push(row.date.format(DATE_FORMAT).to_string());
        for cell in &row.cells {
            match cell {
                Some((close, snr)) => {
                    record.push(close.to_string());
                    record.push(snr.to_string());
                }
                None => {
                    record.push(String::new());
                    record.push(String::new());
                }
            }
        }
        record.push(row.mdi.to_string());
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write one source's error report: header row, then the seven raw fields,
/// the 1-based row number, and the reason per rejection.
pub fn write_error_report<W: Write>(report: &ErrorReport, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(ERROR_REPORT_HEADER)?;
    for rejected in &report.rows {
        let fields = rejected.fields.fields();
        let mut record: Vec<String> = fields.iter().map(|f| f.to_string()).collect();
        record.push(rejected.row.to_string());
        record.push(rejected.reason.clone());
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::merge_series;
    use crate::series::build_series;
    use crate::snr::score_series;
    use crate::types::RawRecord;

    fn demo_table() -> MergedTable {
        let a_rows = vec![
            RawRecord::new("01/01/2020", "10", "11", "9", "10", "100", "50"),
            RawRecord::new("01/02/2020", "10", "12", "10", "11", "100", "50"),
            RawRecord::new("01/03/2020", "11", "12", "10", "12", "100", "50"),
        ];
        let b_rows = vec![
            RawRecord::new("01/02/2020", "20", "21", "19", "20", "100", "50"),
            RawRecord::new("01/03/2020", "20", "22", "20", "21", "100", "50"),
        ];
        let (mut a, _) = build_series("a", a_rows);
        let (mut b, _) = build_series("b", b_rows);
        score_series(&mut a, 1);
        score_series(&mut b, 1);
        merge_series(vec![a, b])
    }

    fn lines(bytes: Vec<u8>) -> Vec<String> {
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(|l| l.to_string())
            .collect()
    }

    #[test]
    fn test_history_layout() {
        let table = demo_table();
        let mut out = Vec::new();
        write_history(&table, &mut out).unwrap();

        let lines = lines(out);
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], ",a,,b,,");
        assert_eq!(lines[1], "Date,Close,SNR,Close,SNR,MDI");
        assert_eq!(
            lines[2],
            "01/01/2020,10,insufficient data,,,insufficient data"
        );
        assert_eq!(lines[3], "01/02/2020,11,1,20,insufficient data,insufficient data");
        assert_eq!(lines[4], "01/03/2020,12,1,21,1,1");
    }

    #[test]
    fn test_recent_is_trailing_slice_with_same_headers() {
        let table = demo_table();

        let mut history = Vec::new();
        write_history(&table, &mut history).unwrap();
        let history = lines(history);

        let mut recent = Vec::new();
        write_recent(&table, 2, &mut recent).unwrap();
        let recent = lines(recent);

        assert_eq!(recent.len(), 4);
        assert_eq!(&recent[..2], &history[..2]);
        assert_eq!(&recent[2..], &history[3..]);
    }

    #[test]
    fn test_recent_short_history_is_whole_output() {
        let table = demo_table();

        let mut history = Vec::new();
        write_history(&table, &mut history).unwrap();
        let mut recent = Vec::new();
        write_recent(&table, 97, &mut recent).unwrap();

        assert_eq!(history, recent);
    }

    #[test]
    fn test_error_report_rows() {
        let rows = vec![
            RawRecord::new("01/01/2020", "10", "9", "11", "10", "100", "50"),
            RawRecord::new("01/02/2020", "10", "11", "9", "10", "100", "50"),
        ];
        let (series, rejected) = build_series("corn", rows);
        assert_eq!(series.len(), 1);
        let report = ErrorReport::new("corn", rejected);
        assert_eq!(report.len(), 1);

        let mut out = Vec::new();
        write_error_report(&report, &mut out).unwrap();
        let lines = lines(out);

        assert_eq!(lines[0], "Date,Open,High,Low,Close,Volume,OpenInt,Row,Reason");
        assert_eq!(
            lines[1],
            "01/01/2020,10,9,11,10,100,50,1,high is less than low"
        );
    }
}
