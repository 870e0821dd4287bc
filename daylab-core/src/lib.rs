//! DayLab Core — observation window, weekday annotation, market-data providers.
//!
//! This crate contains:
//! - Domain types (observation rows and tables)
//! - The two-year observation window calculator
//! - Weekday labelling and frequency counting
//! - Data providers (Yahoo Finance chart API, CSV import)
//! - Polars frame views for display
//! - TOML scan configuration and the scan pipeline

pub mod calendar;
pub mod config;
pub mod data;
pub mod domain;
pub mod frame;
pub mod pipeline;

pub use calendar::{
    Annotation, LabelStyle, ObservationWindow, WeekdayAnnotator, WeekdayCounts, WindowCalculator,
};
pub use config::{ConfigError, ScanConfig, ScanOverrides};
pub use domain::{ObservationRow, ObservationTable};
pub use pipeline::{run_scan, ScanReport};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: data types and providers are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<ObservationTable>();
        require_sync::<ObservationTable>();
        require_send::<Annotation>();
        require_sync::<Annotation>();
        require_send::<ScanReport>();
        require_sync::<ScanReport>();
        require_send::<data::YahooProvider>();
        require_sync::<data::YahooProvider>();
        require_send::<data::CsvProvider>();
        require_sync::<data::CsvProvider>();
    }
}
