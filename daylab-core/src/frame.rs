//! Polars views of observation and annotated tables.
//!
//! The date is an ordinary `Date` column (`"Date"`), not an index, followed by
//! the price columns under their yfinance names.

use chrono::{Datelike, NaiveDate};
use polars::prelude::*;

use crate::calendar::{
    weekday_name, weekday_ordinal, AnnotatedTable, LabelStyle, WeekdayCounts, WeekdayLabel,
};
use crate::domain::{ObservationRow, ObservationTable};

pub const DATE_COLUMN: &str = "Date";
pub const WEEKDAY_COLUMN: &str = "Day of Week";
pub const COUNT_COLUMN: &str = "count";

/// `num_days_from_ce()` of 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

fn epoch_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

/// Date and price columns for a sequence of rows.
fn observation_columns<'a, I>(rows: I) -> PolarsResult<Vec<Column>>
where
    I: IntoIterator<Item = &'a ObservationRow>,
{
    let rows: Vec<&ObservationRow> = rows.into_iter().collect();
    let dates: Vec<i32> = rows.iter().map(|r| epoch_days(r.date)).collect();
    let opens: Vec<f64> = rows.iter().map(|r| r.open).collect();
    let highs: Vec<f64> = rows.iter().map(|r| r.high).collect();
    let lows: Vec<f64> = rows.iter().map(|r| r.low).collect();
    let closes: Vec<f64> = rows.iter().map(|r| r.close).collect();
    let adj_closes: Vec<f64> = rows.iter().map(|r| r.adj_close).collect();
    let volumes: Vec<u64> = rows.iter().map(|r| r.volume).collect();

    Ok(vec![
        Column::new(DATE_COLUMN.into(), dates).cast(&DataType::Date)?,
        Column::new("Open".into(), opens),
        Column::new("High".into(), highs),
        Column::new("Low".into(), lows),
        Column::new("Close".into(), closes),
        Column::new("Adj Close".into(), adj_closes),
        Column::new("Volume".into(), volumes),
    ])
}

/// Observation table as a frame with `Date` as a column.
pub fn observations_to_frame(table: &ObservationTable) -> PolarsResult<DataFrame> {
    DataFrame::new(observation_columns(table.iter())?)
}

/// Annotated table as a frame, with the weekday label as the last column.
///
/// Name labels produce a string column, ordinal labels a `u32` column.
pub fn annotated_to_frame(table: &AnnotatedTable) -> PolarsResult<DataFrame> {
    let mut columns = observation_columns(table.rows.iter().map(|r| &r.observation))?;

    let weekday = match table.style {
        LabelStyle::Name => {
            let names: Vec<String> = table.rows.iter().map(|r| r.weekday.to_string()).collect();
            Column::new(WEEKDAY_COLUMN.into(), names)
        }
        LabelStyle::Ordinal => {
            let ordinals: Vec<u32> = table
                .rows
                .iter()
                .map(|r| match r.weekday {
                    WeekdayLabel::Ordinal(n) => n,
                    WeekdayLabel::Name(_) => weekday_ordinal(r.observation.date.weekday()),
                })
                .collect();
            Column::new(WEEKDAY_COLUMN.into(), ordinals)
        }
    };
    columns.push(weekday);

    DataFrame::new(columns)
}

/// Weekday frequencies as a two-column frame, most frequent first.
pub fn counts_to_frame(counts: &WeekdayCounts) -> PolarsResult<DataFrame> {
    let entries = counts.by_frequency();
    let names: Vec<&str> = entries.iter().map(|(day, _)| weekday_name(*day)).collect();
    let values: Vec<u64> = entries.iter().map(|(_, count)| *count as u64).collect();

    DataFrame::new(vec![
        Column::new(WEEKDAY_COLUMN.into(), names),
        Column::new(COUNT_COLUMN.into(), values),
    ])
}
