//! Renderer seam for the optional line chart.
//!
//! The pipeline hands a `ChartSpec` to whatever `SeriesRenderer` the caller
//! supplies. Renderers receive everything they draw as explicit input and
//! keep no display state between calls.

use crate::domain::RmreSeries;
use thiserror::Error;

/// Why a chart could not be drawn. Never fatal to the pipeline.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no interactive display available: {0}")]
    NoDisplay(String),

    #[error("render I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("nothing to plot: the series is empty")]
    Empty,
}

/// A single line series ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Period labels, one per point.
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSpec {
    pub fn from_series(series: &RmreSeries) -> Self {
        Self {
            title: series.title(),
            x_label: series.index_name().to_string(),
            y_label: series.column_name().to_string(),
            labels: series.labels(),
            values: series.values(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(x, y)` pairs with x as the point index.
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.values
            .iter()
            .enumerate()
            .map(|(i, &v)| (i as f64, v))
            .collect()
    }

    /// Min and max of the values; `None` when empty.
    pub fn value_bounds(&self) -> Option<(f64, f64)> {
        if self.values.is_empty() {
            return None;
        }
        let min = self.values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some((min, max))
    }
}

/// Something that can display a chart.
pub trait SeriesRenderer {
    fn render(&self, chart: &ChartSpec) -> Result<(), RenderError>;
}
