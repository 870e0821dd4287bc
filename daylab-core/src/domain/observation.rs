//! Observation — one trading day of market data, and the table that holds them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::data::provider::DataSource;

/// Daily OHLCV observation for a single symbol.
///
/// Price fields are passed through from the provider untouched. A value the
/// provider omitted is NaN (prices) or 0 (volume).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationRow {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
    pub volume: u64,
}

impl ObservationRow {
    /// Row carrying only a date, every numeric field missing.
    pub fn dated(date: NaiveDate) -> Self {
        Self {
            date,
            open: f64::NAN,
            high: f64::NAN,
            low: f64::NAN,
            close: f64::NAN,
            adj_close: f64::NAN,
            volume: 0,
        }
    }

    /// Returns true if every price field is NaN.
    pub fn is_void(&self) -> bool {
        self.open.is_nan()
            && self.high.is_nan()
            && self.low.is_nan()
            && self.close.is_nan()
            && self.adj_close.is_nan()
    }
}

/// Ordered daily observations for one symbol, ascending by date.
///
/// Unique, strictly increasing dates are expected from a well-behaved provider
/// but are not enforced here; see [`ObservationTable::is_strictly_ascending`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationTable {
    pub symbol: String,
    pub source: DataSource,
    pub rows: Vec<ObservationRow>,
}

impl ObservationTable {
    pub fn new(symbol: impl Into<String>, source: DataSource, rows: Vec<ObservationRow>) -> Self {
        Self {
            symbol: symbol.into(),
            source,
            rows,
        }
    }

    /// Empty table for a symbol.
    pub fn empty(symbol: impl Into<String>, source: DataSource) -> Self {
        Self::new(symbol, source, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ObservationRow> {
        self.rows.iter()
    }

    /// Dates of every row, in table order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.rows.iter().map(|r| r.date)
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.rows.first().map(|r| r.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.rows.last().map(|r| r.date)
    }

    /// True when dates are unique and strictly increasing.
    pub fn is_strictly_ascending(&self) -> bool {
        self.rows.windows(2).all(|w| w[0].date < w[1].date)
    }
}

impl<'a> IntoIterator for &'a ObservationTable {
    type Item = &'a ObservationRow;
    type IntoIter = std::slice::Iter<'a, ObservationRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_row(d: NaiveDate) -> ObservationRow {
        ObservationRow {
            date: d,
            open: 21_700.0,
            high: 21_800.0,
            low: 21_650.0,
            close: 21_750.0,
            adj_close: 21_750.0,
            volume: 250_000,
        }
    }

    #[test]
    fn dated_row_is_void() {
        let row = ObservationRow::dated(date(2024, 1, 2));
        assert!(row.is_void());
        assert_eq!(row.volume, 0);
    }

    #[test]
    fn populated_row_is_not_void() {
        assert!(!sample_row(date(2024, 1, 2)).is_void());
    }

    #[test]
    fn ascending_check_detects_duplicates_and_disorder() {
        let mut table = ObservationTable::new(
            "^NSEI",
            DataSource::Synthetic,
            vec![sample_row(date(2024, 1, 1)), sample_row(date(2024, 1, 2))],
        );
        assert!(table.is_strictly_ascending());

        table.rows.push(sample_row(date(2024, 1, 2)));
        assert!(!table.is_strictly_ascending());

        table.rows.pop();
        table.rows.insert(0, sample_row(date(2024, 1, 5)));
        assert!(!table.is_strictly_ascending());
    }

    #[test]
    fn bounds_follow_table_order() {
        let table = ObservationTable::new(
            "^NSEI",
            DataSource::Synthetic,
            vec![sample_row(date(2024, 1, 1)), sample_row(date(2024, 1, 12))],
        );
        assert_eq!(table.first_date(), Some(date(2024, 1, 1)));
        assert_eq!(table.last_date(), Some(date(2024, 1, 12)));
    }

    #[test]
    fn empty_table_has_no_bounds() {
        let table = ObservationTable::empty("^NSEI", DataSource::Synthetic);
        assert!(table.is_empty());
        assert!(table.is_strictly_ascending());
        assert_eq!(table.first_date(), None);
        assert_eq!(table.last_date(), None);
    }
}
