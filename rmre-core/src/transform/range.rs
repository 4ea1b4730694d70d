//! Date-window validation, resolution, and filtering.
//!
//! Boundaries are matched against the end-of-validity date. A boundary that
//! falls on a weekend produces a warning claiming the next trading day will
//! be used, but the filter keeps the literal boundary.

use crate::domain::{DateRange, ObservationSeries};
use crate::error::{Result, RmreError};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;
use std::fmt;

/// Caller-supplied bounds after format validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateBounds {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateBounds {
    /// Validate raw `YYYY-MM-DD` arguments.
    ///
    /// Fails with `InvalidDateFormat` on a malformed date and with
    /// `InvalidRange` when both are given and `start > end`.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self> {
        let start = start.map(|s| parse_date_arg("start_date", s)).transpose()?;
        let end = end.map(|s| parse_date_arg("end_date", s)).transpose()?;
        if let (Some(s), Some(e)) = (start, end) {
            DateRange::new(s, e)?;
        }
        Ok(Self { start, end })
    }

    /// Fill missing bounds with the series' first/last date.
    ///
    /// Returns `None` only when a bound is missing and the series is empty.
    pub fn resolve(&self, series: &ObservationSeries) -> Result<Option<DateRange>> {
        let start = match self.start.or_else(|| series.first_date()) {
            Some(d) => d,
            None => return Ok(None),
        };
        let end = match self.end.or_else(|| series.last_date()) {
            Some(d) => d,
            None => return Ok(None),
        };
        DateRange::new(start, end).map(Some)
    }
}

/// Parse a `YYYY-MM-DD` argument, rejecting any other shape.
pub fn parse_date_arg(field: &'static str, raw: &str) -> Result<NaiveDate> {
    let invalid = || RmreError::InvalidDateFormat {
        field,
        value: raw.to_string(),
    };

    let bytes = raw.as_bytes();
    let shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| invalid())
}

/// Which end of the window a warning refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Boundary {
    Start,
    End,
}

/// Non-fatal notice that a boundary falls on a weekend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeekendBoundary {
    pub boundary: Boundary,
    pub date: NaiveDate,
}

impl fmt::Display for WeekendBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let which = match self.boundary {
            Boundary::Start => "start_date",
            Boundary::End => "end_date",
        };
        write!(
            f,
            "{which} {} is a holiday or weekend; the information will be obtained from the next business day",
            self.date
        )
    }
}

/// Weekend checks for both ends of a resolved window.
pub fn weekend_boundaries(range: &DateRange) -> Vec<WeekendBoundary> {
    [(Boundary::Start, range.start()), (Boundary::End, range.end())]
        .into_iter()
        .filter(|(_, date)| is_weekend(*date))
        .map(|(boundary, date)| WeekendBoundary { boundary, date })
        .collect()
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Output of the range stage.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeFiltered {
    /// `None` when the input was empty and no explicit bounds were given.
    pub range: Option<DateRange>,
    pub series: ObservationSeries,
    pub warnings: Vec<WeekendBoundary>,
}

/// Resolve `bounds` against `series` and keep observations inside.
pub fn filter_range(series: &ObservationSeries, bounds: &DateBounds) -> Result<RangeFiltered> {
    let Some(range) = bounds.resolve(series)? else {
        return Ok(RangeFiltered {
            range: None,
            series: ObservationSeries::default(),
            warnings: Vec::new(),
        });
    };

    let warnings = weekend_boundaries(&range);
    for w in &warnings {
        tracing::warn!("{w}");
    }

    Ok(RangeFiltered {
        range: Some(range),
        series: series.within(&range),
        warnings,
    })
}
