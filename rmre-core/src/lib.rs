//! RMRE core: the Colombian representative market exchange rate (TRM) as a
//! clean, date-indexed series.
//!
//! - Two-step fetch (open-data JSON endpoint, then the public HTML table)
//! - Normalization of raw rows into a sorted, de-duplicated series
//! - Date-range filter with weekend boundary warnings
//! - Optional log-returns and period resampling
//! - Polars frame export and a renderer seam for the optional chart
//! - Auxiliary indicator series (policy rate, inflation, interbank rate)

pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod frame;
pub mod pipeline;
pub mod render;
pub mod transform;

pub use config::{Indicator, SourceConfig};
pub use domain::{Aggregation, DateRange, Frequency, ObservationSeries, Period, RmreSeries};
pub use error::{Result, RmreError};
pub use pipeline::{fetch_series, fetch_series_with, Pipeline, SeriesOutput, SeriesRequest};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: pipeline values can cross thread boundaries.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Observation>();
        require_sync::<domain::Observation>();
        require_send::<ObservationSeries>();
        require_sync::<ObservationSeries>();
        require_send::<RmreSeries>();
        require_sync::<RmreSeries>();
        require_send::<DateRange>();
        require_sync::<DateRange>();

        require_send::<SeriesRequest>();
        require_sync::<SeriesRequest>();
        require_send::<pipeline::SeriesQuery>();
        require_sync::<pipeline::SeriesQuery>();
        require_send::<SeriesOutput>();
        require_sync::<SeriesOutput>();

        require_send::<data::RawTable>();
        require_sync::<data::RawTable>();
        require_send::<data::IndicatorSeries>();
        require_sync::<data::IndicatorSeries>();
        require_send::<SourceConfig>();
        require_sync::<SourceConfig>();

        require_send::<RmreError>();
        require_sync::<RmreError>();
    }

    /// The renderer seam receives plain data only.
    #[test]
    fn renderer_takes_chart_spec_only() {
        fn _check_trait_object_builds(
            renderer: &dyn render::SeriesRenderer,
            chart: &render::ChartSpec,
        ) -> std::result::Result<(), render::RenderError> {
            renderer.render(chart)
        }
    }
}
