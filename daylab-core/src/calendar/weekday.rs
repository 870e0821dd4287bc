//! Weekday annotation and frequency counting.
//!
//! Two derivations are computed from each row's date, independently:
//! - the label stored on the row (day name or ordinal, per [`LabelStyle`])
//! - the weekday used for counting
//!
//! Counting never reads the stored label, so switching the label style cannot
//! change the frequency table.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::domain::{ObservationRow, ObservationTable};

/// The seven weekdays, Monday first.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// English day name, e.g. `"Monday"`.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Day-of-week ordinal, Monday = 0 .. Sunday = 6.
pub fn weekday_ordinal(day: Weekday) -> u32 {
    day.num_days_from_monday()
}

/// How the weekday stored on each row is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelStyle {
    #[default]
    Name,
    Ordinal,
}

impl FromStr for LabelStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "ordinal" => Ok(Self::Ordinal),
            other => Err(format!("unknown label style '{other}'. Valid: name, ordinal")),
        }
    }
}

impl fmt::Display for LabelStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => f.write_str("name"),
            Self::Ordinal => f.write_str("ordinal"),
        }
    }
}

/// Weekday classification carried by an annotated row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum WeekdayLabel {
    Name(&'static str),
    Ordinal(u32),
}

impl WeekdayLabel {
    pub fn classify(date: NaiveDate, style: LabelStyle) -> Self {
        let day = date.weekday();
        match style {
            LabelStyle::Name => Self::Name(weekday_name(day)),
            LabelStyle::Ordinal => Self::Ordinal(weekday_ordinal(day)),
        }
    }
}

impl fmt::Display for WeekdayLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Ordinal(n) => write!(f, "{n}"),
        }
    }
}

/// An observation plus its weekday label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedRow {
    #[serde(flatten)]
    pub observation: ObservationRow,
    pub weekday: WeekdayLabel,
}

/// Observation table with a weekday column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedTable {
    pub symbol: String,
    pub style: LabelStyle,
    pub rows: Vec<AnnotatedRow>,
}

impl AnnotatedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First `n` rows (fewer if the table is shorter).
    pub fn head(&self, n: usize) -> &[AnnotatedRow] {
        &self.rows[..n.min(self.rows.len())]
    }
}

/// Row count per weekday.
///
/// Only weekdays that occur are reported, so a zero count never appears in
/// [`WeekdayCounts::iter`] or in the serialized form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeekdayCounts {
    counts: [usize; 7],
}

impl WeekdayCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_dates<I>(dates: I) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let mut counts = Self::new();
        for date in dates {
            counts.record(date);
        }
        counts
    }

    pub fn record(&mut self, date: NaiveDate) {
        self.counts[date.weekday().num_days_from_monday() as usize] += 1;
    }

    pub fn get(&self, day: Weekday) -> usize {
        self.counts[day.num_days_from_monday() as usize]
    }

    /// Sum of all counts; equals the number of rows counted.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Number of distinct weekdays seen.
    pub fn len(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Non-zero counts, Monday to Sunday.
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, usize)> + '_ {
        WEEKDAYS
            .iter()
            .map(move |&day| (day, self.get(day)))
            .filter(|&(_, count)| count > 0)
    }

    /// Non-zero counts, most frequent first. Ties keep Monday-to-Sunday order.
    pub fn by_frequency(&self) -> Vec<(Weekday, usize)> {
        let mut entries: Vec<(Weekday, usize)> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
    }
}

impl Serialize for WeekdayCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (day, count) in self.iter() {
            map.serialize_entry(weekday_name(day), &count)?;
        }
        map.end()
    }
}

/// Output of [`WeekdayAnnotator::annotate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub table: AnnotatedTable,
    pub counts: WeekdayCounts,
}

/// Attaches a weekday label to every row and tallies weekdays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeekdayAnnotator {
    style: LabelStyle,
}

impl WeekdayAnnotator {
    pub fn new(style: LabelStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> LabelStyle {
        self.style
    }

    /// Weekday frequencies of a table, derived from the row dates.
    pub fn count(table: &ObservationTable) -> WeekdayCounts {
        WeekdayCounts::from_dates(table.dates())
    }

    /// Label every row, keeping table order.
    pub fn label(&self, table: ObservationTable) -> AnnotatedTable {
        let rows = table
            .rows
            .into_iter()
            .map(|observation| AnnotatedRow {
                weekday: WeekdayLabel::classify(observation.date, self.style),
                observation,
            })
            .collect();
        AnnotatedTable {
            symbol: table.symbol,
            style: self.style,
            rows,
        }
    }

    pub fn annotate(&self, table: ObservationTable) -> Annotation {
        let counts = Self::count(&table);
        Annotation {
            table: self.label(table),
            counts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::provider::DataSource;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn table_of(dates: &[NaiveDate]) -> ObservationTable {
        ObservationTable::new(
            "^NSEI",
            DataSource::Synthetic,
            dates.iter().map(|&d| ObservationRow::dated(d)).collect(),
        )
    }

    #[test]
    fn names_and_ordinals_line_up() {
        for (i, day) in WEEKDAYS.iter().enumerate() {
            assert_eq!(weekday_ordinal(*day), i as u32);
        }
        assert_eq!(weekday_name(Weekday::Mon), "Monday");
        assert_eq!(weekday_name(Weekday::Sun), "Sunday");
    }

    #[test]
    fn first_three_days_of_2024() {
        let table = table_of(&[date(2024, 1, 1), date(2024, 1, 2), date(2024, 1, 3)]);
        let out = WeekdayAnnotator::default().annotate(table);

        assert_eq!(out.counts.get(Weekday::Mon), 1);
        assert_eq!(out.counts.get(Weekday::Tue), 1);
        assert_eq!(out.counts.get(Weekday::Wed), 1);
        assert_eq!(out.counts.len(), 3);
        assert_eq!(out.counts.total(), 3);

        let labels: Vec<String> = out.table.rows.iter().map(|r| r.weekday.to_string()).collect();
        assert_eq!(labels, ["Monday", "Tuesday", "Wednesday"]);
    }

    #[test]
    fn ordinal_labels_start_at_monday_zero() {
        let table = table_of(&[date(2024, 1, 1), date(2024, 1, 7)]);
        let out = WeekdayAnnotator::new(LabelStyle::Ordinal).annotate(table);
        assert_eq!(out.table.rows[0].weekday, WeekdayLabel::Ordinal(0));
        assert_eq!(out.table.rows[1].weekday, WeekdayLabel::Ordinal(6));
        assert_eq!(out.table.style, LabelStyle::Ordinal);
    }

    #[test]
    fn label_style_does_not_change_counts() {
        let dates = [date(2024, 1, 1), date(2024, 1, 8), date(2024, 1, 12)];
        let by_name = WeekdayAnnotator::new(LabelStyle::Name).annotate(table_of(&dates));
        let by_ordinal = WeekdayAnnotator::new(LabelStyle::Ordinal).annotate(table_of(&dates));
        assert_eq!(by_name.counts, by_ordinal.counts);
        assert_eq!(by_name.counts.get(Weekday::Mon), 2);
        assert_eq!(by_name.counts.get(Weekday::Fri), 1);
    }

    #[test]
    fn empty_table_gives_empty_outputs() {
        let out = WeekdayAnnotator::default().annotate(table_of(&[]));
        assert!(out.table.is_empty());
        assert!(out.counts.is_empty());
        assert_eq!(out.counts.len(), 0);
        assert_eq!(out.counts.iter().count(), 0);
    }

    #[test]
    fn by_frequency_orders_descending_with_stable_ties() {
        let counts = WeekdayCounts::from_dates([
            date(2024, 1, 5), // Fri
            date(2024, 1, 12), // Fri
            date(2024, 1, 2), // Tue
            date(2024, 1, 1), // Mon
        ]);
        let ordered: Vec<Weekday> = counts.by_frequency().into_iter().map(|(d, _)| d).collect();
        assert_eq!(ordered, [Weekday::Fri, Weekday::Mon, Weekday::Tue]);
    }

    #[test]
    fn counts_serialize_as_name_map_without_zeros() {
        let counts = WeekdayCounts::from_dates([date(2024, 1, 1), date(2024, 1, 3)]);
        let json = serde_json::to_string(&counts).unwrap();
        assert_eq!(json, r#"{"Monday":1,"Wednesday":1}"#);
    }

    #[test]
    fn annotated_row_serializes_flat() {
        let table = table_of(&[date(2024, 1, 1)]);
        let out = WeekdayAnnotator::default().annotate(table);
        let value = serde_json::to_value(&out.table.rows[0]).unwrap();
        assert_eq!(value["date"], "2024-01-01");
        assert_eq!(value["weekday"], "Monday");
    }

    #[test]
    fn label_style_parses_case_insensitively() {
        assert_eq!("Name".parse::<LabelStyle>().unwrap(), LabelStyle::Name);
        assert_eq!(" ordinal ".parse::<LabelStyle>().unwrap(), LabelStyle::Ordinal);
        assert!("dow".parse::<LabelStyle>().is_err());
    }

    #[test]
    fn head_clamps_to_table_length() {
        let out = WeekdayAnnotator::default().annotate(table_of(&[date(2024, 1, 1)]));
        assert_eq!(out.table.head(5).len(), 1);
        assert_eq!(out.table.head(0).len(), 0);
    }
}
