//! Date-ordered merge of independently-dated series.
//!
//! N scored series, each with its own date range, become one wide table with
//! one row per distinct date. Column order is fixed up front by each series'
//! first observation date (stable sort, ties keep input order). Row order is
//! driven by a multi-way merge: the current date is the minimum date among
//! all unconsumed observations, each series either contributes its
//! observation for that date and advances, or leaves a gap and waits.
//!
//! Each row also carries the Market Divergence Index: the average of the
//! SNR values contributed that date, defined only when every series in the
//! merge contributed a numeric SNR. Partial contribution never yields a
//! partial average.
//!
//! The per-series merge cursor is bookkeeping owned by this module's merge
//! loop. It lives in a local vector, not in [`Series`] itself.

use chrono::NaiveDate;

use crate::series::Series;
use crate::types::SnrValue;

/// One output row: a date, one optional `(close, SNR)` cell per series in
/// column order, and the aggregate MDI.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRow {
    pub date: NaiveDate,

    /// One entry per merged series, `None` when that series has no
    /// observation on this date
    pub cells: Vec<Option<(f64, SnrValue)>>,

    /// Cross-series average SNR, or the insufficiency marker
    pub mdi: SnrValue,
}

/// The merged wide table: column names in merge order plus the date-ordered
/// rows. Header rows are structural metadata produced on demand, not stored
/// as rows.
#[derive(Debug, Clone, Default)]
pub struct MergedTable {
    columns: Vec<String>,
    rows: Vec<MergedRow>,
}

impl MergedTable {
    /// Series names in column order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All data rows, ascending by date.
    pub fn rows(&self) -> &[MergedRow] {
        &self.rows
    }

    /// True if the merge produced no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The trailing `period` data rows. When fewer rows exist, the whole
    /// table is returned; a short history is not an error.
    pub fn recent_rows(&self, period: usize) -> &[MergedRow] {
        let start = self.rows.len().saturating_sub(period);
        &self.rows[start..]
    }

    /// The two header rows shared by the historical and recent reports.
    ///
    /// Row 1 spaces each series name across its two value columns; row 2
    /// labels every column and closes with the MDI label.
    pub fn header_rows(&self) -> [Vec<String>; 2] {
        let width = 2 * self.columns.len() + 2;
        let mut names = Vec::with_capacity(width);
        let mut labels = Vec::with_capacity(width);

        names.push(String::new());
        labels.push("Date".to_string());
        for column in &self.columns {
            names.push(column.clone());
            names.push(String::new());
            labels.push("Close".to_string());
            labels.push("SNR".to_string());
        }
        names.push(String::new());
        labels.push("MDI".to_string());

        [names, labels]
    }
}

/// Merge scored series into one wide table.
///
/// Series that accepted no observations cannot participate (they have no
/// first date to order by and could never satisfy the MDI contract); they
/// are dropped with a warning.
pub fn merge_series(series: Vec<Series>) -> MergedTable {
    let mut series: Vec<Series> = series
        .into_iter()
        .filter(|s| {
            if s.is_empty() {
                log::warn!("series '{}' has no observations, excluded from merge", s.name());
                false
            } else {
                true
            }
        })
        .collect();

    // Column order: ascending first-observation date, stable on ties.
    series.sort_by_key(|s| s.first_date());

    let columns: Vec<String> = series.iter().map(|s| s.name().to_string()).collect();
    let mut cursors = vec![0usize; series.len()];
    let mut rows = Vec::new();

    while let Some(date) = next_date(&series, &cursors) {
        let mut cells = Vec::with_capacity(series.len());
        for (s, cursor) in series.iter().zip(cursors.iter_mut()) {
            let obs = s.observations().get(*cursor);
            match obs {
                Some(obs) if obs.date == date => {
                    cells.push(Some((obs.close, obs.snr)));
                    *cursor += 1;
                }
                _ => cells.push(None),
            }
        }
        let mdi = compute_mdi(&cells);
        rows.push(MergedRow { date, cells, mdi });
    }

    MergedTable { columns, rows }
}

/// Minimum date among all unconsumed observations, or `None` when every
/// cursor is exhausted.
fn next_date(series: &[Series], cursors: &[usize]) -> Option<NaiveDate> {
    let mut min: Option<NaiveDate> = None;
    for (s, &cursor) in series.iter().zip(cursors.iter()) {
        if let Some(obs) = s.observations().get(cursor) {
            min = Some(match min {
                Some(current) if current <= obs.date => current,
                _ => obs.date,
            });
        }
    }
    min
}

/// All-or-nothing average: numeric only when every merged series supplied a
/// numeric SNR for this date.
fn compute_mdi(cells: &[Option<(f64, SnrValue)>]) -> SnrValue {
    let mut sum = 0.0;
    let mut numeric = 0usize;
    for cell in cells {
        if let Some((_, SnrValue::Value(v))) = cell {
            sum += *v;
            numeric += 1;
        }
    }
    if numeric > 0 && numeric == cells.len() {
        SnrValue::Value(sum / numeric as f64)
    } else {
        SnrValue::Insufficient
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::build_series;
    use crate::snr::score_series;
    use crate::types::RawRecord;

    fn series_with(name: &str, bars: &[(&str, f64)], period: usize) -> Series {
        let records: Vec<RawRecord> = bars
            .iter()
            .map(|(date, close)| {
                RawRecord::new(*date, "0", "1000", "0", close.to_string(), "0", "0")
            })
            .collect();
        let (mut series, rejected) = build_series(name, records);
        assert!(rejected.is_empty());
        score_series(&mut series, period);
        series
    }

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%m/%d/%Y").unwrap()
    }

    #[test]
    fn test_offset_ranges_produce_gaps() {
        let a = series_with(
            "a",
            &[("01/01/2020", 10.0), ("01/02/2020", 11.0), ("01/03/2020", 12.0)],
            1,
        );
        let b = series_with("b", &[("01/02/2020", 20.0), ("01/03/2020", 21.0)], 1);

        let table = merge_series(vec![a, b]);

        assert_eq!(table.columns(), &["a".to_string(), "b".to_string()]);
        assert_eq!(table.rows().len(), 3);

        let rows = table.rows();
        assert_eq!(rows[0].date, d("01/01/2020"));
        assert!(rows[0].cells[0].is_some());
        assert!(rows[0].cells[1].is_none());

        assert_eq!(rows[1].date, d("01/02/2020"));
        assert!(rows[1].cells[0].is_some());
        assert!(rows[1].cells[1].is_some());

        assert_eq!(rows[2].date, d("01/03/2020"));
        assert_eq!(rows[2].cells[0], Some((12.0, SnrValue::Value(1.0))));
    }

    #[test]
    fn test_mdi_all_or_nothing() {
        // With P=1: a scores Insufficient, 1.0, 1.0; b scores Insufficient,
        // 1.0 on its two dates.
        let a = series_with(
            "a",
            &[("01/01/2020", 10.0), ("01/02/2020", 11.0), ("01/03/2020", 12.0)],
            1,
        );
        let b = series_with("b", &[("01/02/2020", 20.0), ("01/03/2020", 21.0)], 1);

        let table = merge_series(vec![a, b]);
        let rows = table.rows();

        // 01/01: b absent, no average even though a is present.
        assert_eq!(rows[0].mdi, SnrValue::Insufficient);
        // 01/02: both present but b's first bar is unscored.
        assert_eq!(rows[1].mdi, SnrValue::Insufficient);
        // 01/03: both numeric.
        assert!((rows[2].mdi.value().unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_every_observation_lands_exactly_once() {
        let a = series_with(
            "a",
            &[("01/01/2020", 10.0), ("01/03/2020", 11.0), ("01/07/2020", 12.0)],
            1,
        );
        let b = series_with(
            "b",
            &[("01/02/2020", 20.0), ("01/03/2020", 21.0), ("01/04/2020", 22.0)],
            1,
        );
        let a_dates: Vec<NaiveDate> = a.observations().iter().map(|o| o.date).collect();
        let b_dates: Vec<NaiveDate> = b.observations().iter().map(|o| o.date).collect();

        let table = merge_series(vec![a, b]);

        let mut seen_a = Vec::new();
        let mut seen_b = Vec::new();
        for row in table.rows() {
            if row.cells[0].is_some() {
                seen_a.push(row.date);
            }
            if row.cells[1].is_some() {
                seen_b.push(row.date);
            }
        }
        assert_eq!(seen_a, a_dates);
        assert_eq!(seen_b, b_dates);

        // Rows ascend strictly by date.
        for pair in table.rows().windows(2) {
            assert!(pair[0].date < pair[1].date);
        }
    }

    #[test]
    fn test_column_order_by_first_date_stable() {
        let late = series_with("late", &[("03/01/2020", 1.0)], 1);
        let early_one = series_with("early_one", &[("01/01/2020", 1.0)], 1);
        let early_two = series_with("early_two", &[("01/01/2020", 2.0)], 1);

        let table = merge_series(vec![late, early_one, early_two]);
        assert_eq!(
            table.columns(),
            &[
                "early_one".to_string(),
                "early_two".to_string(),
                "late".to_string()
            ]
        );
    }

    #[test]
    fn test_empty_series_excluded() {
        let (empty, _) = build_series("empty", Vec::new());
        let a = series_with("a", &[("01/01/2020", 10.0), ("01/02/2020", 11.0)], 1);

        let table = merge_series(vec![empty, a]);
        assert_eq!(table.columns(), &["a".to_string()]);
        assert_eq!(table.rows().len(), 2);
        // With the empty series gone, the survivor alone decides the MDI.
        assert!(table.rows()[1].mdi.is_value());
    }

    #[test]
    fn test_no_series_at_all() {
        let table = merge_series(Vec::new());
        assert!(table.is_empty());
        assert!(table.columns().is_empty());
        assert_eq!(table.recent_rows(10), &[]);
    }

    #[test]
    fn test_recent_rows_trailing_slice() {
        let a = series_with(
            "a",
            &[
                ("01/01/2020", 10.0),
                ("01/02/2020", 11.0),
                ("01/03/2020", 12.0),
                ("01/06/2020", 13.0),
                ("01/07/2020", 14.0),
            ],
            2,
        );
        let table = merge_series(vec![a]);

        let recent = table.recent_rows(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent, &table.rows()[3..]);

        // Short history degrades gracefully.
        assert_eq!(table.recent_rows(100).len(), 5);
    }

    #[test]
    fn test_header_rows_layout() {
        let a = series_with("corn", &[("01/01/2020", 10.0)], 1);
        let b = series_with("wheat", &[("01/02/2020", 20.0)], 1);
        let table = merge_series(vec![a, b]);

        let [names, labels] = table.header_rows();
        assert_eq!(names, vec!["", "corn", "", "wheat", "", ""]);
        assert_eq!(labels, vec!["Date", "Close", "SNR", "Close", "SNR", "MDI"]);
    }
}
