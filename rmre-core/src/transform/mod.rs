//! Series transforms: range filter, log-returns, resampling.

pub mod range;
pub mod resample;
pub mod returns;

pub use range::{filter_range, DateBounds, RangeFiltered, WeekendBoundary};
pub use resample::resample;
pub use returns::{log_returns, log_returns_counted};
