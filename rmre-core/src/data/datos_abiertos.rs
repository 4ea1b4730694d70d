//! Open-data portal JSON source (primary).
//!
//! The portal returns a JSON array of flat objects. Every field arrives as a
//! string; numbers are tolerated and rendered back to text so the normalizer
//! sees one representation.

use super::provider::{FetchOutcome, RawRow, RawSource, RawTable, SourceKind};
use crate::config::SourceConfig;
use crate::error::{Result, RmreError};
use serde_json::Value;
use std::time::Duration;

/// Primary source: one GET with a bounded client-side timeout.
pub struct OpenDataSource {
    client: reqwest::blocking::Client,
    url: String,
    timeout: Duration,
}

impl OpenDataSource {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let timeout = config.primary_timeout();
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| RmreError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: config.primary_url.clone(),
            timeout,
        })
    }
}

impl RawSource for OpenDataSource {
    fn name(&self) -> &str {
        "datos.gov.co JSON"
    }

    fn attempt(&self) -> FetchOutcome {
        let resp = match self.client.get(&self.url).send() {
            Ok(resp) => resp,
            Err(e) => return FetchOutcome::from_transport(e, Some(self.timeout)),
        };

        let status = resp.status();
        if !status.is_success() {
            return FetchOutcome::Failed(format!("HTTP {status} from {}", self.url));
        }

        let body = match resp.text() {
            Ok(body) => body,
            Err(e) => return FetchOutcome::from_transport(e, Some(self.timeout)),
        };

        match parse_json_rows(&body) {
            Ok(rows) => FetchOutcome::Success(RawTable::new(SourceKind::OpenDataJson, rows)),
            Err(reason) => FetchOutcome::Failed(reason),
        }
    }
}

/// Decode the portal's JSON array into raw rows.
pub fn parse_json_rows(body: &str) -> std::result::Result<Vec<RawRow>, String> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| format!("malformed JSON body: {e}"))?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(obj) if obj.contains_key("error") => {
            let message = obj
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unspecified error");
            return Err(format!("portal returned an error object: {message}"));
        }
        _ => return Err("expected a JSON array of records".into()),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(fields) => Ok(fields
                .into_iter()
                .filter_map(|(k, v)| cell_text(v).map(|text| (k, text)))
                .collect()),
            _ => Err(format!("record {i} is not a JSON object")),
        })
        .collect()
}

fn cell_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_string_records() {
        let body = r#"[
            {"valor":"3250.5","unidad":"COP","vigenciadesde":"2019-01-05T00:00:00.000","vigenciahasta":"2019-01-07T00:00:00.000"},
            {"valor":"3248.1","unidad":"COP","vigenciadesde":"2019-01-08T00:00:00.000","vigenciahasta":"2019-01-08T00:00:00.000"}
        ]"#;
        let rows = parse_json_rows(body).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["valor"], "3250.5");
        assert_eq!(rows[1]["vigenciahasta"], "2019-01-08T00:00:00.000");
    }

    #[test]
    fn numbers_become_text_and_nulls_are_absent() {
        let rows = parse_json_rows(r#"[{"valor": 3100.25, "unidad": null}]"#).unwrap();
        assert_eq!(rows[0]["valor"], "3100.25");
        assert!(!rows[0].contains_key("unidad"));
    }

    #[test]
    fn rejects_non_array_payloads() {
        assert!(parse_json_rows(r#"{"rows": []}"#).is_err());
        assert!(parse_json_rows("<html></html>").is_err());
        assert!(parse_json_rows("[1, 2]").is_err());
    }

    #[test]
    fn surfaces_portal_error_message() {
        let err =
            parse_json_rows(r#"{"error": true, "message": "query timed out"}"#).unwrap_err();
        assert!(err.contains("query timed out"));
    }
}
