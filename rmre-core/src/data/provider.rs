//! Raw-row source trait and typed fetch outcomes.
//!
//! The `RawSource` trait abstracts over the JSON endpoint and the HTML-table
//! page so the fetcher's fallback sequence can be exercised with in-memory
//! sources in tests.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// One row as received from a source: column name → cell text.
pub type RawRow = BTreeMap<String, String>;

/// Where a raw table came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SourceKind {
    OpenDataJson,
    HtmlTable,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceKind::OpenDataJson => "open-data JSON",
            SourceKind::HtmlTable => "HTML table",
        };
        f.write_str(name)
    }
}

/// Rows fetched from a single source.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub source: SourceKind,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    pub fn new(source: SourceKind, rows: Vec<RawRow>) -> Self {
        Self { source, rows }
    }

    /// True when at least one row carries `column`.
    pub fn has_column(&self, column: &str) -> bool {
        self.rows.iter().any(|r| r.contains_key(column))
    }
}

/// Result of one fetch attempt.
#[derive(Debug)]
pub enum FetchOutcome {
    Success(RawTable),
    /// The client-side timeout elapsed before a response arrived.
    TimedOut(Duration),
    /// Connection error, non-success status, or malformed body.
    Failed(String),
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success(_))
    }

    /// Short human-readable description for logs and errors.
    pub fn describe(&self) -> String {
        match self {
            FetchOutcome::Success(table) => {
                format!("{} rows from {}", table.rows.len(), table.source)
            }
            FetchOutcome::TimedOut(after) => format!("timed out after {}s", after.as_secs()),
            FetchOutcome::Failed(reason) => reason.clone(),
        }
    }

    /// Classify a transport error from the HTTP client.
    pub fn from_transport(err: reqwest::Error, timeout: Option<Duration>) -> Self {
        match timeout {
            Some(after) if err.is_timeout() => FetchOutcome::TimedOut(after),
            _ => FetchOutcome::Failed(err.to_string()),
        }
    }
}

/// A source of raw RMRE rows.
pub trait RawSource {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Perform exactly one request. Never retries.
    fn attempt(&self) -> FetchOutcome;
}
