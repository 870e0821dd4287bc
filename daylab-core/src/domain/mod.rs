//! Domain types for DayLab

pub mod observation;

pub use observation::{ObservationRow, ObservationTable};
