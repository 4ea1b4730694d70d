//! Source endpoints and per-indicator layout settings.
//!
//! `SourceConfig::default()` carries the built-in endpoints. Library users
//! may override any subset from TOML; omitted keys keep their defaults.

use crate::error::{Result, RmreError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Open-data JSON endpoint for the daily RMRE series.
pub const PRIMARY_URL: &str = "https://www.datos.gov.co/resource/ceyp-9c7c.json?$limit=1000000";

/// Published HTML table used when the JSON endpoint cannot be reached.
pub const FALLBACK_URL: &str = "https://www.datos.gov.co/Econom-a-y-Finanzas/Tasa-de-Cambio-Representativa-del-Mercado-Historic/mcec-87by";

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko)";

/// Endpoints and client settings for every source the toolkit reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub primary_url: String,
    pub fallback_url: String,
    /// Client-side timeout for the primary request. The fallback has none.
    pub primary_timeout_secs: u64,
    pub user_agent: String,
    pub policy_rate: IndicatorSource,
    pub inflation: IndicatorSource,
    pub interbank_rate: IndicatorSource,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            primary_url: PRIMARY_URL.to_string(),
            fallback_url: FALLBACK_URL.to_string(),
            primary_timeout_secs: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            policy_rate: IndicatorSource::policy_rate(),
            inflation: IndicatorSource::inflation(),
            interbank_rate: IndicatorSource::interbank_rate(),
        }
    }
}

impl SourceConfig {
    /// Parse a (possibly partial) TOML document over the defaults.
    pub fn from_toml(s: &str) -> Result<Self> {
        let config: SourceConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn primary_timeout(&self) -> Duration {
        Duration::from_secs(self.primary_timeout_secs)
    }

    pub fn indicator(&self, indicator: Indicator) -> &IndicatorSource {
        match indicator {
            Indicator::PolicyRate => &self.policy_rate,
            Indicator::Inflation => &self.inflation,
            Indicator::InterbankRate => &self.interbank_rate,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.primary_url.trim().is_empty() || self.fallback_url.trim().is_empty() {
            return Err(RmreError::Config("source URLs must not be empty".into()));
        }
        if self.primary_timeout_secs == 0 {
            return Err(RmreError::Config(
                "primary_timeout_secs must be positive".into(),
            ));
        }
        for indicator in Indicator::ALL {
            self.indicator(indicator)
                .validate()
                .map_err(|e| RmreError::Config(format!("{}: {e}", indicator.name())))?;
        }
        Ok(())
    }
}

/// Auxiliary macroeconomic series published as spreadsheet exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Indicator {
    /// Central-bank intervention (policy) rate.
    PolicyRate,
    /// Consumer price index.
    Inflation,
    /// Overnight interbank reference rate (IBR).
    InterbankRate,
}

impl Indicator {
    pub const ALL: [Indicator; 3] = [
        Indicator::PolicyRate,
        Indicator::Inflation,
        Indicator::InterbankRate,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Indicator::PolicyRate => "policy_rate",
            Indicator::Inflation => "inflation",
            Indicator::InterbankRate => "interbank_rate",
        }
    }
}

/// How dates are written in a spreadsheet export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateLayout {
    /// `2024-01-31`
    Iso,
    /// `31/01/2024`
    DayMonthYear,
    /// `2024-01` or `202401`; mapped to the first day of the month.
    YearMonth,
}

impl DateLayout {
    pub fn parse(self, raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        match self {
            DateLayout::Iso => NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok(),
            DateLayout::DayMonthYear => NaiveDate::parse_from_str(raw, "%d/%m/%Y").ok(),
            DateLayout::YearMonth => {
                let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
                if digits.len() != 6 {
                    return None;
                }
                let year: i32 = digits[..4].parse().ok()?;
                let month: u32 = digits[4..].parse().ok()?;
                NaiveDate::from_ymd_opt(year, month, 1)
            }
        }
    }
}

/// Layout of one auxiliary spreadsheet export.
///
/// After `skip_rows` preamble lines the next row must be a header whose
/// folded labels equal `header`; data rows follow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSource {
    pub url: String,
    pub skip_rows: usize,
    pub delimiter: char,
    pub header: Vec<String>,
    pub date_column: usize,
    pub value_column: usize,
    pub date_layout: DateLayout,
    /// Replace `,` with `.` before parsing values.
    pub decimal_comma: bool,
    /// Values are divided by this after parsing (100 for percentages).
    pub divisor: f64,
    /// Canonical name of the value column.
    pub value_name: String,
}

impl IndicatorSource {
    pub fn policy_rate() -> Self {
        Self {
            url: "https://totoro.banrep.gov.co/analytics/saw.dll?Download&Format=csv&Extension=.csv&Path=%2Fshared%2FSeries%20Estadisticas_T%2F1.%20Tasa%20de%20intervencion%2F1.2.TIP_Serie%20historica%20diaria".into(),
            skip_rows: 1,
            delimiter: ';',
            header: vec!["fecha".into(), "tasadeintervencion".into()],
            date_column: 0,
            value_column: 1,
            date_layout: DateLayout::DayMonthYear,
            decimal_comma: true,
            divisor: 100.0,
            value_name: "policy_rate".into(),
        }
    }

    pub fn inflation() -> Self {
        Self {
            url: "https://totoro.banrep.gov.co/analytics/saw.dll?Download&Format=csv&Extension=.csv&Path=%2Fshared%2FSeries%20Estadisticas_T%2F1.%20IPC%20base%202018%2F1.2.IPC_Serie%20historica%20mensual".into(),
            skip_rows: 2,
            delimiter: ';',
            header: vec![
                "anoaaaamesmm".into(),
                "indice".into(),
                "inflacionanual".into(),
            ],
            date_column: 0,
            value_column: 1,
            date_layout: DateLayout::YearMonth,
            decimal_comma: true,
            divisor: 1.0,
            value_name: "cpi".into(),
        }
    }

    pub fn interbank_rate() -> Self {
        Self {
            url: "https://totoro.banrep.gov.co/analytics/saw.dll?Download&Format=csv&Extension=.csv&Path=%2Fshared%2FSeries%20Estadisticas_T%2F1.%20IBR%2F1.1.IBR_Overnight_Serie%20historica%20diaria".into(),
            skip_rows: 1,
            delimiter: ';',
            header: vec!["fecha".into(), "ibrovernightnominal".into()],
            date_column: 0,
            value_column: 1,
            date_layout: DateLayout::DayMonthYear,
            decimal_comma: true,
            divisor: 100.0,
            value_name: "ibr".into(),
        }
    }

    fn validate(&self) -> std::result::Result<(), String> {
        let columns = self.header.len();
        if columns == 0 {
            return Err("header must name at least one column".into());
        }
        if self.date_column >= columns || self.value_column >= columns {
            return Err(format!(
                "date_column/value_column out of range for {columns} columns"
            ));
        }
        if !self.delimiter.is_ascii() {
            return Err("delimiter must be a single ASCII character".into());
        }
        if self.divisor == 0.0 || !self.divisor.is_finite() {
            return Err("divisor must be a finite non-zero number".into());
        }
        Ok(())
    }
}
