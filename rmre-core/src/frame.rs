//! Tabular (polars) views of pipeline output.
//!
//! Daily output carries a `Date` column of dtype `Date`; resampled output
//! carries the period label (`Month`, `Quarter`, `Semester`) as a string.

use crate::domain::{Frequency, ObservationSeries, Period, RmreSeries};
use crate::error::Result;
use chrono::NaiveDate;
use polars::prelude::*;

/// Two-column frame: index column plus `rmre` or `log_return`.
pub fn series_frame(series: &RmreSeries) -> Result<DataFrame> {
    let index = if series.frequency == Frequency::Daily {
        let dates: Vec<NaiveDate> = series
            .points
            .iter()
            .map(|p| match p.period {
                Period::Day(d) => d,
                other => other.start_date(),
            })
            .collect();
        date_column(series.index_name(), &dates)?
    } else {
        Series::new(series.index_name().into(), series.labels())
    };
    let values = Series::new(series.column_name().into(), series.values());

    Ok(DataFrame::new(vec![index.into_column(), values.into_column()])?)
}

/// `Date` + named value column for a plain observation series.
pub fn observation_frame(series: &ObservationSeries, value_name: &str) -> Result<DataFrame> {
    let dates: Vec<NaiveDate> = series.iter().map(|o| o.date).collect();
    let index = date_column("Date", &dates)?;
    let values = Series::new(value_name.into(), series.values());

    Ok(DataFrame::new(vec![index.into_column(), values.into_column()])?)
}

fn date_column(name: &str, dates: &[NaiveDate]) -> Result<Series> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();
    let days: Vec<i32> = dates
        .iter()
        .map(|d| (*d - epoch).num_days() as i32)
        .collect();
    Ok(Series::new(name.into(), days).cast(&DataType::Date)?)
}
