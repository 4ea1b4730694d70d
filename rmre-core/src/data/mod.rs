//! Data retrieval and normalization.

pub mod datos_abiertos;
pub mod fetcher;
pub mod html_table;
pub mod indicators;
pub mod normalize;
pub mod provider;

pub use datos_abiertos::OpenDataSource;
pub use fetcher::{FetchAttempts, Fetcher};
pub use html_table::HtmlTableSource;
pub use indicators::{fetch_indicator, parse_indicator, IndicatorSeries};
pub use normalize::{normalize, Normalized, RateRecord};
pub use provider::{FetchOutcome, RawRow, RawSource, RawTable, SourceKind};
