//! Structured error types for the RMRE pipeline.
//!
//! Validation errors are raised before any network request is made. Network
//! failures on the primary source never surface on their own: they are folded
//! into `SourceUnavailable` only when the fallback fails as well.

use thiserror::Error;

/// Errors produced by the fetch → normalize → filter → resample pipeline.
#[derive(Debug, Error)]
pub enum RmreError {
    #[error("'{field}' should be in 'year-month-day' format (YYYY-MM-DD), got '{value}'")]
    InvalidDateFormat { field: &'static str, value: String },

    #[error("'start_date' ({start}) is greater than 'end_date' ({end})")]
    InvalidRange { start: String, end: String },

    #[error("invalid '{parameter}' argument '{value}': expected one of {expected}")]
    InvalidParameter {
        parameter: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("unexpected source layout: {0}")]
    Schema(String),

    #[error("source unavailable: primary {primary}; fallback {fallback}")]
    SourceUnavailable { primary: String, fallback: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("frame error: {0}")]
    Frame(String),
}

pub type Result<T> = std::result::Result<T, RmreError>;

impl From<polars::prelude::PolarsError> for RmreError {
    fn from(e: polars::prelude::PolarsError) -> Self {
        RmreError::Frame(e.to_string())
    }
}

impl From<toml::de::Error> for RmreError {
    fn from(e: toml::de::Error) -> Self {
        RmreError::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_field() {
        let err = RmreError::InvalidDateFormat {
            field: "start_date",
            value: "2019/01/10".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("start_date"));
        assert!(msg.contains("2019/01/10"));
    }

    #[test]
    fn source_unavailable_reports_both_attempts() {
        let err = RmreError::SourceUnavailable {
            primary: "timed out after 10s".into(),
            fallback: "HTTP 503".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("timed out"));
        assert!(msg.contains("503"));
    }
}
