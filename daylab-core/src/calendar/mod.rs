//! Calendar logic: the observation window and weekday classification.

pub mod weekday;
pub mod window;

pub use weekday::{
    weekday_name, weekday_ordinal, AnnotatedRow, AnnotatedTable, Annotation, LabelStyle,
    WeekdayAnnotator, WeekdayCounts, WeekdayLabel, WEEKDAYS,
};
pub use window::{ObservationWindow, WindowCalculator};
