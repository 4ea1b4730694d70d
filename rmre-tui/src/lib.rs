//! Terminal chart for RMRE series.
//!
//! - `SeriesChart`: ratatui widget drawing one `ChartSpec`
//! - `TerminalRenderer`: interactive `SeriesRenderer` for the pipeline
//! - `render_to_string`: off-screen rendering for tests and snapshots

pub mod chart;
pub mod terminal;
pub mod theme;

pub use chart::{render_to_string, SeriesChart};
pub use terminal::TerminalRenderer;
pub use theme::Theme;
