//! The scan pipeline: fetch the window, then annotate and count weekdays.

use serde::Serialize;
use tracing::{info, warn};

use crate::calendar::{Annotation, ObservationWindow, WeekdayAnnotator};
use crate::data::{DataError, DataProvider, DataSource};

/// Everything a scan produces, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanReport {
    pub symbol: String,
    pub window: ObservationWindow,
    pub source: DataSource,
    #[serde(flatten)]
    pub annotation: Annotation,
}

impl ScanReport {
    /// Number of observations fetched.
    pub fn row_count(&self) -> usize {
        self.annotation.table.len()
    }
}

/// Fetch `symbol` over `window` and annotate the result.
///
/// Provider errors are returned unchanged. An empty fetch is not an error and
/// yields an empty table and empty counts.
pub fn run_scan(
    provider: &dyn DataProvider,
    symbol: &str,
    window: ObservationWindow,
    annotator: &WeekdayAnnotator,
) -> Result<ScanReport, DataError> {
    info!(symbol, %window, provider = provider.name(), "fetching observations");
    let table = provider.fetch(symbol, window.start, window.end)?;

    if let (Some(first), Some(last)) = (table.first_date(), table.last_date()) {
        info!(symbol, %first, %last, rows = table.len(), "fetched date span");
        if !table.is_strictly_ascending() {
            warn!(symbol, "observation dates are not strictly increasing");
        }
        let void = table.iter().filter(|r| r.is_void()).count();
        if void > 0 {
            warn!(symbol, void, "observations without any price");
        }
    } else {
        warn!(symbol, %window, "provider returned no observations");
    }

    let source = table.source;
    let annotation = annotator.annotate(table);
    info!(
        symbol,
        rows = annotation.table.len(),
        weekdays = annotation.counts.len(),
        "annotated observations"
    );

    Ok(ScanReport {
        symbol: symbol.to_string(),
        window,
        source,
        annotation,
    })
}
