//! CSV import provider for offline runs.
//!
//! Reads a yfinance-style export with a `Date` column and the usual price
//! columns: `Date,Open,High,Low,Close,Adj Close,Volume`. `Adj Close` may be
//! absent; empty or unparseable numeric cells become NaN (prices) or 0 (volume).

use super::provider::{DataError, DataProvider, DataSource};
use crate::domain::{ObservationRow, ObservationTable};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Open", default, deserialize_with = "csv::invalid_option")]
    open: Option<f64>,
    #[serde(rename = "High", default, deserialize_with = "csv::invalid_option")]
    high: Option<f64>,
    #[serde(rename = "Low", default, deserialize_with = "csv::invalid_option")]
    low: Option<f64>,
    #[serde(rename = "Close", default, deserialize_with = "csv::invalid_option")]
    close: Option<f64>,
    #[serde(rename = "Adj Close", default, deserialize_with = "csv::invalid_option")]
    adj_close: Option<f64>,
    #[serde(rename = "Volume", default, deserialize_with = "csv::invalid_option")]
    volume: Option<f64>,
}

/// Parse the date part of a date cell.
///
/// Exports with timestamps (`2024-01-02 00:00:00+05:30`, `2024-01-02T00:00:00`)
/// keep everything before the first space or `T`. Month and day may be unpadded.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.trim().split([' ', 'T']).next()?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Provider backed by a single CSV file.
pub struct CsvProvider {
    path: PathBuf,
}

impl CsvProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every row in the file, sorted by date ascending.
    pub fn read_all(&self) -> Result<Vec<ObservationRow>, DataError> {
        let mut reader = csv::Reader::from_path(&self.path)
            .map_err(|e| DataError::CsvError(format!("{}: {e}", self.path.display())))?;

        let mut rows = Vec::new();
        for (i, record) in reader.deserialize::<CsvRecord>().enumerate() {
            // Header is line 1.
            let line = i + 2;
            let record = record.map_err(|e| {
                DataError::CsvError(format!("{} line {line}: {e}", self.path.display()))
            })?;

            let date = parse_date(&record.date).ok_or_else(|| {
                DataError::CsvError(format!(
                    "{} line {line}: invalid date '{}'",
                    self.path.display(),
                    record.date
                ))
            })?;

            let close = record.close.unwrap_or(f64::NAN);
            rows.push(ObservationRow {
                date,
                open: record.open.unwrap_or(f64::NAN),
                high: record.high.unwrap_or(f64::NAN),
                low: record.low.unwrap_or(f64::NAN),
                close,
                adj_close: record.adj_close.unwrap_or(close),
                volume: record.volume.map(|v| v.max(0.0) as u64).unwrap_or(0),
            });
        }

        rows.sort_by_key(|r| r.date);
        debug!(path = %self.path.display(), rows = rows.len(), "read CSV");
        Ok(rows)
    }
}

impl DataProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv_import"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<ObservationTable, DataError> {
        let rows: Vec<ObservationRow> = self
            .read_all()?
            .into_iter()
            .filter(|r| start <= r.date && r.date < end)
            .collect();
        info!(symbol, rows = rows.len(), path = %self.path.display(), "loaded from CSV");
        Ok(ObservationTable::new(symbol, DataSource::CsvImport, rows))
    }
}
