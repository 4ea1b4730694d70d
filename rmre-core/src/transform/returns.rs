//! Level → log-return transform.

use crate::domain::ObservationSeries;

/// `ln(value[t] / value[t-1])` over the date-ordered series.
///
/// The first observation has no predecessor and is dropped. Pairs whose
/// ratio has no finite logarithm (non-positive levels) are dropped as well.
pub fn log_returns(levels: &ObservationSeries) -> ObservationSeries {
    log_returns_counted(levels).0
}

/// [`log_returns`] plus the number of pairs skipped for a non-finite result.
pub fn log_returns_counted(levels: &ObservationSeries) -> (ObservationSeries, usize) {
    levels.map_pairs(|prev, cur| (cur / prev).ln())
}
