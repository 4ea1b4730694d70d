//! Two-step fetch: primary source, then a single fallback.
//!
//! The fallback runs if and only if the primary outcome is not `Success`.
//! A primary answer with zero rows counts as a failure. There are no
//! retries beyond that one step.

use super::provider::{FetchOutcome, RawSource, RawTable};
use crate::config::SourceConfig;
use crate::data::{HtmlTableSource, OpenDataSource};
use crate::error::{Result, RmreError};

/// Outcomes of both steps, kept for inspection.
#[derive(Debug)]
pub struct FetchAttempts {
    pub primary: FetchOutcome,
    /// `None` when the primary succeeded and the fallback was skipped.
    pub fallback: Option<FetchOutcome>,
}

impl FetchAttempts {
    pub fn used_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Collapse the attempts into the first successful table.
    pub fn into_table(self) -> Result<RawTable> {
        if let FetchOutcome::Success(table) = self.primary {
            return Ok(table);
        }
        let primary = self.primary.describe();
        match self.fallback {
            Some(FetchOutcome::Success(table)) => Ok(table),
            Some(other) => Err(RmreError::SourceUnavailable {
                primary,
                fallback: other.describe(),
            }),
            None => Err(RmreError::SourceUnavailable {
                primary,
                fallback: "not attempted".into(),
            }),
        }
    }
}

/// Primary + fallback pair of raw sources.
pub struct Fetcher {
    primary: Box<dyn RawSource>,
    fallback: Box<dyn RawSource>,
}

impl Fetcher {
    pub fn new(primary: Box<dyn RawSource>, fallback: Box<dyn RawSource>) -> Self {
        Self { primary, fallback }
    }

    /// Open-data JSON endpoint with the HTML table as fallback.
    pub fn from_config(config: &SourceConfig) -> Result<Self> {
        Ok(Self::new(
            Box::new(OpenDataSource::new(config)?),
            Box::new(HtmlTableSource::new(config)?),
        ))
    }

    /// Run the attempt sequence and return every outcome.
    pub fn attempt_all(&self) -> FetchAttempts {
        let primary = reject_empty(self.primary.attempt());
        if primary.is_success() {
            tracing::info!(source = self.primary.name(), "{}", primary.describe());
            return FetchAttempts {
                primary,
                fallback: None,
            };
        }

        tracing::warn!(
            source = self.primary.name(),
            fallback = self.fallback.name(),
            "primary source failed ({}), trying fallback",
            primary.describe()
        );
        let fallback = self.fallback.attempt();
        if fallback.is_success() {
            tracing::info!(source = self.fallback.name(), "{}", fallback.describe());
        }

        FetchAttempts {
            primary,
            fallback: Some(fallback),
        }
    }

    /// Fetch raw rows, failing with `SourceUnavailable` if both steps fail.
    pub fn fetch(&self) -> Result<RawTable> {
        self.attempt_all().into_table()
    }
}

fn reject_empty(outcome: FetchOutcome) -> FetchOutcome {
    match outcome {
        FetchOutcome::Success(table) if table.rows.is_empty() => {
            FetchOutcome::Failed(format!("{} returned no rows", table.source))
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::provider::{RawRow, SourceKind};
    use std::cell::Cell;
    use std::rc::Rc;
    use std::time::Duration;

    struct Scripted {
        outcome: fn() -> FetchOutcome,
        calls: Rc<Cell<usize>>,
    }

    impl RawSource for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        fn attempt(&self) -> FetchOutcome {
            self.calls.set(self.calls.get() + 1);
            (self.outcome)()
        }
    }

    fn one_row(source: SourceKind) -> FetchOutcome {
        let mut row = RawRow::new();
        row.insert("valor".into(), "1".into());
        FetchOutcome::Success(RawTable::new(source, vec![row]))
    }

    fn fetcher(
        primary: fn() -> FetchOutcome,
        fallback: fn() -> FetchOutcome,
    ) -> (Fetcher, Rc<Cell<usize>>, Rc<Cell<usize>>) {
        let p = Rc::new(Cell::new(0));
        let f = Rc::new(Cell::new(0));
        let fetcher = Fetcher::new(
            Box::new(Scripted {
                outcome: primary,
                calls: p.clone(),
            }),
            Box::new(Scripted {
                outcome: fallback,
                calls: f.clone(),
            }),
        );
        (fetcher, p, f)
    }

    #[test]
    fn primary_success_skips_fallback() {
        let (fetcher, p, f) = fetcher(
            || one_row(SourceKind::OpenDataJson),
            || panic!("fallback must not run"),
        );
        let attempts = fetcher.attempt_all();
        assert!(!attempts.used_fallback());
        assert_eq!(attempts.into_table().unwrap().source, SourceKind::OpenDataJson);
        assert_eq!((p.get(), f.get()), (1, 0));
    }

    #[test]
    fn timeout_triggers_fallback() {
        let (fetcher, p, f) = fetcher(
            || FetchOutcome::TimedOut(Duration::from_secs(10)),
            || one_row(SourceKind::HtmlTable),
        );
        let table = fetcher.fetch().unwrap();
        assert_eq!(table.source, SourceKind::HtmlTable);
        assert_eq!((p.get(), f.get()), (1, 1));
    }

    #[test]
    fn request_error_triggers_fallback() {
        let (fetcher, _, f) = fetcher(
            || FetchOutcome::Failed("HTTP 500".into()),
            || one_row(SourceKind::HtmlTable),
        );
        assert!(fetcher.fetch().is_ok());
        assert_eq!(f.get(), 1);
    }

    #[test]
    fn empty_primary_triggers_fallback() {
        let (fetcher, p, f) = fetcher(
            || FetchOutcome::Success(RawTable::new(SourceKind::OpenDataJson, Vec::new())),
            || one_row(SourceKind::HtmlTable),
        );
        let attempts = fetcher.attempt_all();
        assert!(attempts.used_fallback());
        assert!(attempts.primary.describe().contains("no rows"));
        assert_eq!(attempts.into_table().unwrap().source, SourceKind::HtmlTable);
        assert_eq!((p.get(), f.get()), (1, 1));
    }

    #[test]
    fn both_failing_is_source_unavailable() {
        let (fetcher, p, f) = fetcher(
            || FetchOutcome::TimedOut(Duration::from_secs(10)),
            || FetchOutcome::Failed("no <table> found".into()),
        );
        match fetcher.fetch() {
            Err(RmreError::SourceUnavailable { primary, fallback }) => {
                assert!(primary.contains("timed out"));
                assert!(fallback.contains("<table>"));
            }
            other => panic!("expected SourceUnavailable, got {other:?}"),
        }
        assert_eq!((p.get(), f.get()), (1, 1));
    }
}
