//! Output writers for the `series` and `indicator` commands.
//!
//! - **CSV**: index column plus value column, headers named like the frame;
//!   values in shortest round-trip form
//! - **JSON**: the full output record, including range and warnings

use anyhow::{Context, Result};
use rmre_core::data::IndicatorSeries;
use rmre_core::domain::{ObservationSeries, RmreSeries};
use rmre_core::SeriesOutput;

// ─── CSV export ─────────────────────────────────────────────────────

/// `Date,rmre` / `Month,log_return` / ... one row per period.
pub fn series_csv(series: &RmreSeries) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([series.index_name(), series.column_name()])?;
    for point in &series.points {
        wtr.write_record([point.period.to_string(), point.value.to_string()])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// `Date,<value_name>` for a plain observation series.
pub fn observations_csv(series: &ObservationSeries, value_name: &str) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["Date", value_name])?;
    for obs in series {
        wtr.write_record([obs.date.to_string(), obs.value.to_string()])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── JSON export ────────────────────────────────────────────────────

pub fn series_json(output: &SeriesOutput) -> Result<String> {
    serde_json::to_string_pretty(output).context("failed to serialize series output to JSON")
}

pub fn indicator_json(indicator: &IndicatorSeries) -> Result<String> {
    serde_json::to_string_pretty(indicator).context("failed to serialize indicator to JSON")
}
