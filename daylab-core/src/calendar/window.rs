//! Observation window — the `[start, end)` range requested from a provider.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Half-open date range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObservationWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ObservationWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Number of calendar days covered (`end - start`).
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

impl fmt::Display for ObservationWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Derives the observation window ending at a reference date.
///
/// Subtraction is done in whole months, so Feb 29 lands on Feb 28 when the
/// target year is not a leap year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowCalculator {
    years: u32,
}

impl WindowCalculator {
    pub const DEFAULT_YEARS: u32 = 2;

    pub fn new(years: u32) -> Self {
        Self { years }
    }

    pub fn years(&self) -> u32 {
        self.years
    }

    /// `(today - years, today)`. Saturates at the earliest representable date.
    pub fn window_ending(&self, today: NaiveDate) -> ObservationWindow {
        let start = today
            .checked_sub_months(Months::new(self.years.saturating_mul(12)))
            .unwrap_or(NaiveDate::MIN);
        ObservationWindow::new(start, today)
    }

    /// Window ending at the local current date.
    pub fn window_ending_today(&self) -> ObservationWindow {
        self.window_ending(chrono::Local::now().date_naive())
    }
}

impl Default for WindowCalculator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_YEARS)
    }
}
