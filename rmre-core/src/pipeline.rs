//! The fetch → normalize → filter → (log-return) → (resample) → (plot) pipeline.
//!
//! Every call is independent: nothing is cached between invocations and the
//! only side effects are the network requests and the optional chart.
//! Request validation runs before any network access.

use crate::config::SourceConfig;
use crate::data::{normalize, Fetcher, RawTable, SourceKind};
use crate::domain::{Aggregation, DateRange, Frequency, RmreSeries, ValueKind};
use crate::error::Result;
use crate::render::{ChartSpec, SeriesRenderer};
use crate::transform::{
    filter_range, log_returns_counted, resample, DateBounds, WeekendBoundary,
};
use serde::Serialize;
use std::fmt;

/// Caller arguments as given, before validation.
///
/// Mode switches stay in their raw form (`frequency` as a number,
/// `aggregation` as text) so that out-of-set values are rejected by
/// [`SeriesRequest::validate`] with `InvalidParameter`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesRequest {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub log_return: bool,
    pub plot_data: bool,
    pub frequency: u32,
    pub aggregation: String,
}

impl Default for SeriesRequest {
    fn default() -> Self {
        Self {
            start_date: None,
            end_date: None,
            log_return: false,
            plot_data: false,
            frequency: Frequency::Daily.periods_per_year(),
            aggregation: Aggregation::LastDate.as_str().to_string(),
        }
    }
}

impl SeriesRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_date(mut self, date: impl Into<String>) -> Self {
        self.start_date = Some(date.into());
        self
    }

    pub fn end_date(mut self, date: impl Into<String>) -> Self {
        self.end_date = Some(date.into());
        self
    }

    pub fn log_return(mut self, on: bool) -> Self {
        self.log_return = on;
        self
    }

    pub fn plot_data(mut self, on: bool) -> Self {
        self.plot_data = on;
        self
    }

    pub fn frequency(mut self, frequency: u32) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn aggregation(mut self, aggregation: impl Into<String>) -> Self {
        self.aggregation = aggregation.into();
        self
    }

    /// Check every argument against its closed set.
    pub fn validate(&self) -> Result<SeriesQuery> {
        let bounds = DateBounds::parse(self.start_date.as_deref(), self.end_date.as_deref())?;
        let aggregation: Aggregation = self.aggregation.parse()?;
        let frequency = Frequency::try_from(self.frequency)?;
        Ok(SeriesQuery {
            bounds,
            log_return: self.log_return,
            plot_data: self.plot_data,
            frequency,
            aggregation,
        })
    }
}

/// A validated request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesQuery {
    pub bounds: DateBounds,
    pub log_return: bool,
    pub plot_data: bool,
    pub frequency: Frequency,
    pub aggregation: Aggregation,
}

impl SeriesQuery {
    pub fn value_kind(&self) -> ValueKind {
        if self.log_return {
            ValueKind::LogReturn
        } else {
            ValueKind::Level
        }
    }
}

/// Non-fatal conditions reported alongside the series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PipelineWarning {
    WeekendBoundary(WeekendBoundary),
    /// Consecutive pairs whose log-return is not finite (a zero or negative level).
    ReturnsSkipped { pairs: usize },
    ChartSkipped { reason: String },
}

impl fmt::Display for PipelineWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineWarning::WeekendBoundary(w) => write!(f, "{w}"),
            PipelineWarning::ReturnsSkipped { pairs } => {
                write!(f, "{pairs} log-return(s) skipped: non-positive level")
            }
            PipelineWarning::ChartSkipped { reason } => write!(f, "chart not rendered: {reason}"),
        }
    }
}

/// Result of one pipeline call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesOutput {
    pub series: RmreSeries,
    /// Window actually applied; `None` when the source had no usable rows.
    pub range: Option<DateRange>,
    pub source: SourceKind,
    /// Source rows dropped for missing or unparsable values.
    pub dropped_rows: usize,
    pub warnings: Vec<PipelineWarning>,
}

/// Fetcher plus optional chart renderer.
pub struct Pipeline {
    fetcher: Fetcher,
    renderer: Option<Box<dyn SeriesRenderer>>,
}

impl Pipeline {
    pub fn new(fetcher: Fetcher) -> Self {
        Self {
            fetcher,
            renderer: None,
        }
    }

    pub fn from_config(config: &SourceConfig) -> Result<Self> {
        Ok(Self::new(Fetcher::from_config(config)?))
    }

    pub fn with_renderer(mut self, renderer: Box<dyn SeriesRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Attach `renderer` if one is given; keep the current one otherwise.
    pub fn with_optional_renderer(self, renderer: Option<Box<dyn SeriesRenderer>>) -> Self {
        match renderer {
            Some(renderer) => self.with_renderer(renderer),
            None => self,
        }
    }

    /// Validate, fetch, transform, and optionally plot.
    pub fn run(&self, request: &SeriesRequest) -> Result<SeriesOutput> {
        let query = request.validate()?;
        let table = self.fetcher.fetch()?;
        let mut output = build_series(&query, &table)?;

        if query.plot_data {
            if let Some(warning) = self.plot(&output.series) {
                output.warnings.push(warning);
            }
        }
        Ok(output)
    }

    fn plot(&self, series: &RmreSeries) -> Option<PipelineWarning> {
        let reason = match &self.renderer {
            None => "no renderer attached".to_string(),
            Some(renderer) => match renderer.render(&ChartSpec::from_series(series)) {
                Ok(()) => return None,
                Err(e) => e.to_string(),
            },
        };
        tracing::warn!("chart not rendered: {reason}");
        Some(PipelineWarning::ChartSkipped { reason })
    }
}

/// Fetch the series with the built-in endpoints and no renderer.
///
/// With `plot_data` set this reports a `ChartSkipped` warning; use
/// [`fetch_series_with`] to supply a renderer.
pub fn fetch_series(request: &SeriesRequest) -> Result<SeriesOutput> {
    fetch_series_with(request, &SourceConfig::default(), None)
}

/// Fetch the series from `config`'s endpoints, drawing through `renderer`
/// when the request asks for a chart.
pub fn fetch_series_with(
    request: &SeriesRequest,
    config: &SourceConfig,
    renderer: Option<Box<dyn SeriesRenderer>>,
) -> Result<SeriesOutput> {
    // Bad arguments never reach the network layer.
    request.validate()?;
    Pipeline::from_config(config)?
        .with_optional_renderer(renderer)
        .run(request)
}

/// Pure part of the pipeline: raw rows in, final series out.
pub fn build_series(query: &SeriesQuery, table: &RawTable) -> Result<SeriesOutput> {
    let normalized = normalize(table)?;
    let filtered = filter_range(&normalized.series, &query.bounds)?;

    let mut warnings: Vec<PipelineWarning> = filtered
        .warnings
        .into_iter()
        .map(PipelineWarning::WeekendBoundary)
        .collect();

    let values = if query.log_return {
        let (returns, skipped) = log_returns_counted(&filtered.series);
        if skipped > 0 {
            tracing::warn!(skipped, "log-returns skipped for non-positive levels");
            warnings.push(PipelineWarning::ReturnsSkipped { pairs: skipped });
        }
        returns
    } else {
        filtered.series
    };

    let series = resample(&values, query.value_kind(), query.frequency, query.aggregation);
    tracing::info!(
        source = %table.source,
        rows = series.len(),
        frequency = %query.frequency,
        "built {} series",
        series.title()
    );

    Ok(SeriesOutput {
        series,
        range: filtered.range,
        source: table.source,
        dropped_rows: normalized.dropped,
        warnings,
    })
}
