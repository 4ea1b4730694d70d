//! Auxiliary indicator fetchers: policy rate, CPI, interbank rate.
//!
//! Each indicator is a delimited spreadsheet export with a fixed preamble.
//! Instead of trusting the row offset alone, the header row that follows the
//! preamble is checked for column count and labels; a layout change is
//! reported as a schema error rather than parsed into wrong columns.

use super::normalize::{fold_label, parse_value};
use crate::config::{Indicator, IndicatorSource, SourceConfig};
use crate::domain::{Observation, ObservationSeries};
use crate::error::{Result, RmreError};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use serde::Serialize;

/// A cleaned auxiliary series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSeries {
    pub name: String,
    pub series: ObservationSeries,
    /// Rows skipped because the date or value could not be read.
    pub dropped: usize,
}

/// Download and parse one auxiliary indicator.
pub fn fetch_indicator(indicator: Indicator, config: &SourceConfig) -> Result<IndicatorSeries> {
    let source = config.indicator(indicator);
    let body = download(source, &config.user_agent)?;
    let parsed = parse_indicator(&body, source)?;
    tracing::info!(
        indicator = indicator.name(),
        rows = parsed.series.len(),
        dropped = parsed.dropped,
        "parsed spreadsheet export"
    );
    Ok(parsed)
}

fn download(source: &IndicatorSource, user_agent: &str) -> Result<Vec<u8>> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/csv,application/vnd.ms-excel,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("es-CO,es;q=0.9,en;q=0.5"));

    let client = reqwest::blocking::Client::builder()
        .user_agent(user_agent)
        .default_headers(headers)
        .build()
        .map_err(|e| RmreError::Network(format!("failed to build HTTP client: {e}")))?;

    let resp = client
        .get(&source.url)
        .send()
        .map_err(|e| RmreError::Network(e.to_string()))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(RmreError::Network(format!("HTTP {status} from {}", source.url)));
    }

    resp.bytes()
        .map(|b| b.to_vec())
        .map_err(|e| RmreError::Network(e.to_string()))
}

/// Parse a spreadsheet export according to its layout.
pub fn parse_indicator(body: &[u8], source: &IndicatorSource) -> Result<IndicatorSeries> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(source.delimiter as u8)
        .from_reader(body);

    let mut records = reader.byte_records().skip(source.skip_rows);

    let header = records
        .next()
        .ok_or_else(|| {
            RmreError::Schema(format!(
                "export ended before the header row (after {} preamble rows)",
                source.skip_rows
            ))
        })?
        .map_err(|e| RmreError::Schema(format!("unreadable header row: {e}")))?;
    check_header(&header, source)?;

    let columns = source.header.len();
    let mut observations = Vec::new();
    let mut dropped = 0;

    for (i, record) in records.enumerate() {
        let record =
            record.map_err(|e| RmreError::Schema(format!("unreadable data row {i}: {e}")))?;
        let cell = |idx: usize| {
            record
                .get(idx)
                .map(|b| String::from_utf8_lossy(b).trim().to_string())
                .unwrap_or_default()
        };

        // Footer notes and blank lines carry no date.
        let Some(date) = source.date_layout.parse(&cell(source.date_column)) else {
            dropped += 1;
            continue;
        };
        if record.len() != columns {
            return Err(RmreError::Schema(format!(
                "data row {i} ({date}) has {} columns, expected {columns}",
                record.len()
            )));
        }

        match parse_cell(&cell(source.value_column), source) {
            Some(value) => observations.push(Observation::new(date, value)),
            None => dropped += 1,
        }
    }

    Ok(IndicatorSeries {
        name: source.value_name.clone(),
        series: ObservationSeries::from_observations(observations),
        dropped,
    })
}

fn check_header(header: &csv::ByteRecord, source: &IndicatorSource) -> Result<()> {
    let found: Vec<String> = header
        .iter()
        .map(|b| fold_label(&String::from_utf8_lossy(b)))
        .collect();

    if found.len() != source.header.len() {
        return Err(RmreError::Schema(format!(
            "header has {} columns, expected {} ({:?})",
            found.len(),
            source.header.len(),
            source.header
        )));
    }
    for (got, want) in found.iter().zip(&source.header) {
        if got != want {
            return Err(RmreError::Schema(format!(
                "header column '{got}' does not match expected '{want}'"
            )));
        }
    }
    Ok(())
}

fn parse_cell(raw: &str, source: &IndicatorSource) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| *c != '%' && !c.is_whitespace()).collect();
    let cleaned = if source.decimal_comma {
        cleaned.replace(',', ".")
    } else {
        cleaned
    };
    parse_value(&cleaned).map(|v| v / source.divisor)
}
