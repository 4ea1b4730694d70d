//! Published HTML-table page (fallback source).
//!
//! The first `<table>` on the page is read. Header cells are folded into the
//! portal's column names (`Vigencia Desde` → `vigenciadesde`) and date-only
//! cells are lifted to midnight timestamps, so the normalizer receives the
//! same shape the JSON endpoint produces.

use super::normalize::fold_label;
use super::provider::{FetchOutcome, RawRow, RawSource, RawTable, SourceKind};
use crate::config::SourceConfig;
use crate::error::{Result, RmreError};
use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};

/// Fallback source: one GET without a client-side timeout.
pub struct HtmlTableSource {
    client: reqwest::blocking::Client,
    url: String,
}

impl HtmlTableSource {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(None::<std::time::Duration>)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| RmreError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: config.fallback_url.clone(),
        })
    }
}

impl RawSource for HtmlTableSource {
    fn name(&self) -> &str {
        "published HTML table"
    }

    fn attempt(&self) -> FetchOutcome {
        let resp = match self.client.get(&self.url).send() {
            Ok(resp) => resp,
            Err(e) => return FetchOutcome::from_transport(e, None),
        };

        let status = resp.status();
        if !status.is_success() {
            return FetchOutcome::Failed(format!("HTTP {status} from {}", self.url));
        }

        let body = match resp.text() {
            Ok(body) => body,
            Err(e) => return FetchOutcome::from_transport(e, None),
        };

        match parse_first_table(&body) {
            Ok(rows) => FetchOutcome::Success(RawTable::new(SourceKind::HtmlTable, rows)),
            Err(reason) => FetchOutcome::Failed(reason),
        }
    }
}

/// Extract the first `<table>` of a document as raw rows.
pub fn parse_first_table(html: &str) -> std::result::Result<Vec<RawRow>, String> {
    let table_sel = selector("table")?;
    let row_sel = selector("tr")?;
    let header_sel = selector("th")?;
    let cell_sel = selector("td")?;

    let document = Html::parse_document(html);
    let table = document
        .select(&table_sel)
        .next()
        .ok_or_else(|| "no <table> found in fallback page".to_string())?;

    let mut header: Option<Vec<String>> = None;
    let mut rows = Vec::new();

    for tr in table.select(&row_sel) {
        if header.is_none() {
            let mut labels: Vec<String> = tr
                .select(&header_sel)
                .map(|c| fold_label(&text(c)))
                .collect();
            if labels.is_empty() {
                // Tables without <th> use the first row as header.
                labels = tr.select(&cell_sel).map(|c| fold_label(&text(c))).collect();
            }
            if !labels.is_empty() {
                header = Some(labels);
            }
            continue;
        }

        let cells: Vec<String> = tr.select(&cell_sel).map(text).collect();
        if cells.is_empty() {
            continue;
        }
        if let Some(labels) = &header {
            let row: RawRow = labels
                .iter()
                .zip(cells)
                .filter(|(_, cell)| !cell.is_empty())
                .map(|(label, cell)| (label.clone(), lift_date(cell)))
                .collect();
            rows.push(row);
        }
    }

    if header.is_none() {
        return Err("first <table> has no header row".into());
    }
    Ok(rows)
}

fn selector(css: &str) -> std::result::Result<Selector, String> {
    Selector::parse(css).map_err(|e| format!("invalid selector '{css}': {e:?}"))
}

fn text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

/// `2019-01-07` → `2019-01-07T00:00:00.000`; other cells pass through.
fn lift_date(cell: String) -> String {
    match NaiveDate::parse_from_str(&cell, "%Y-%m-%d") {
        Ok(date) => format!("{}T00:00:00.000", date.format("%Y-%m-%d")),
        Err(_) => cell,
    }
}
