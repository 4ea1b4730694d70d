//! Raw rows → cleaned observation series.
//!
//! Both validity timestamps must parse with the portal's fixed format. Values
//! that do not parse as finite numbers are dropped, never imputed. The
//! end-of-validity timestamp becomes the observation date.

use super::provider::RawTable;
use crate::domain::{Observation, ObservationSeries};
use crate::error::{Result, RmreError};
use chrono::NaiveDateTime;

pub const VALID_FROM_COLUMN: &str = "vigenciadesde";
pub const VALID_TO_COLUMN: &str = "vigenciahasta";
pub const VALUE_COLUMN: &str = "valor";

/// `2019-01-07T00:00:00.000`; the fractional part is optional.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// One row after type coercion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateRecord {
    pub valid_from: NaiveDateTime,
    pub valid_to: NaiveDateTime,
    pub value: f64,
}

/// Normalizer output: the cleaned series plus a count of dropped rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub series: ObservationSeries,
    pub records: Vec<RateRecord>,
    /// Rows removed because their value was missing or unparsable.
    pub dropped: usize,
}

/// Normalize raw rows into a date-ordered series.
pub fn normalize(table: &RawTable) -> Result<Normalized> {
    for column in [VALID_FROM_COLUMN, VALID_TO_COLUMN, VALUE_COLUMN] {
        if !table.has_column(column) {
            return Err(RmreError::Schema(format!(
                "expected column '{column}' is absent from {} rows",
                table.source
            )));
        }
    }

    let mut records = Vec::with_capacity(table.rows.len());
    let mut dropped = 0;

    for (i, row) in table.rows.iter().enumerate() {
        let valid_from = parse_timestamp(row.get(VALID_FROM_COLUMN), VALID_FROM_COLUMN, i)?;
        let valid_to = parse_timestamp(row.get(VALID_TO_COLUMN), VALID_TO_COLUMN, i)?;

        match row.get(VALUE_COLUMN).and_then(|v| parse_value(v)) {
            Some(value) => records.push(RateRecord {
                valid_from,
                valid_to,
                value,
            }),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        tracing::debug!(dropped, "dropped rows with missing or unparsable values");
    }

    let series = ObservationSeries::from_observations(
        records
            .iter()
            .map(|r| Observation::new(r.valid_to.date(), r.value))
            .collect(),
    );

    Ok(Normalized {
        series,
        records,
        dropped,
    })
}

fn parse_timestamp(raw: Option<&String>, column: &str, row: usize) -> Result<NaiveDateTime> {
    let raw = raw.ok_or_else(|| RmreError::Schema(format!("row {row}: '{column}' is missing")))?;
    NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT).map_err(|e| {
        RmreError::Schema(format!(
            "row {row}: '{column}' value '{raw}' does not match {TIMESTAMP_FORMAT}: {e}"
        ))
    })
}

/// Parse a numeric cell; `None` for anything that is not a finite number.
pub fn parse_value(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Fold a header label into a bare lowercase ASCII key.
///
/// `"Vigencia Desde"` → `"vigenciadesde"`, `"Índice"` → `"indice"`.
pub fn fold_label(label: &str) -> String {
    label
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'ä' | 'â' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            'ñ' => 'n',
            other => other,
        })
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::provider::{RawRow, SourceKind};
    use chrono::NaiveDate;

    fn row(from: &str, to: &str, value: Option<&str>) -> RawRow {
        let mut r = RawRow::new();
        r.insert(VALID_FROM_COLUMN.into(), from.into());
        r.insert(VALID_TO_COLUMN.into(), to.into());
        if let Some(v) = value {
            r.insert(VALUE_COLUMN.into(), v.into());
        }
        r
    }

    fn table(rows: Vec<RawRow>) -> RawTable {
        RawTable::new(SourceKind::OpenDataJson, rows)
    }

    #[test]
    fn renames_to_date_and_value() {
        let t = table(vec![
            row("2019-01-08T00:00:00.000", "2019-01-08T00:00:00.000", Some("3248.1")),
            row("2019-01-05T00:00:00.000", "2019-01-07T00:00:00.000", Some("3250.5")),
        ]);
        let out = normalize(&t).unwrap();
        let obs = out.series.observations();
        assert_eq!(obs.len(), 2);
        assert_eq!(obs[0].date, NaiveDate::from_ymd_opt(2019, 1, 7).unwrap());
        assert_eq!(obs[0].value, 3250.5);
        assert_eq!(obs[1].value, 3248.1);
        assert_eq!(out.dropped, 0);
    }

    #[test]
    fn drops_unparsable_values() {
        let t = table(vec![
            row("2019-01-02T00:00:00.000", "2019-01-02T00:00:00.000", Some("3200")),
            row("2019-01-03T00:00:00.000", "2019-01-03T00:00:00.000", Some("n/a")),
            row("2019-01-04T00:00:00.000", "2019-01-04T00:00:00.000", None),
            row("2019-01-05T00:00:00.000", "2019-01-05T00:00:00.000", Some("")),
        ]);
        let out = normalize(&t).unwrap();
        assert_eq!(out.series.len(), 1);
        assert_eq!(out.dropped, 3);
        assert!(out.series.values().iter().all(|v| *v != 0.0));
    }

    #[test]
    fn missing_column_is_schema_error() {
        let mut r = RawRow::new();
        r.insert("fecha".into(), "2019-01-02".into());
        r.insert(VALUE_COLUMN.into(), "1".into());
        let err = normalize(&table(vec![r])).unwrap_err();
        assert!(matches!(err, RmreError::Schema(msg) if msg.contains(VALID_FROM_COLUMN)));
    }

    #[test]
    fn empty_table_is_schema_error() {
        assert!(matches!(
            normalize(&table(vec![])),
            Err(RmreError::Schema(_))
        ));
    }

    #[test]
    fn bad_timestamp_is_schema_error() {
        let t = table(vec![row("2019-01-02", "02/01/2019", Some("1"))]);
        assert!(matches!(normalize(&t), Err(RmreError::Schema(_))));
    }

    #[test]
    fn timestamp_fraction_is_optional() {
        let t = table(vec![row(
            "2019-01-02T00:00:00",
            "2019-01-02T00:00:00.123",
            Some("1"),
        )]);
        assert_eq!(normalize(&t).unwrap().series.len(), 1);
    }

    #[test]
    fn value_parsing() {
        assert_eq!(parse_value(" 3250.50 "), Some(3250.5));
        assert_eq!(parse_value("3.250,50"), None);
        assert_eq!(parse_value("NaN"), None);
        assert_eq!(parse_value("inf"), None);
    }

    #[test]
    fn label_folding() {
        assert_eq!(fold_label("Vigencia Desde"), "vigenciadesde");
        assert_eq!(fold_label("Índice"), "indice");
        assert_eq!(fold_label("Año(aaaa)-Mes(mm)"), "anoaaaamesmm");
        assert_eq!(fold_label("Tasa de intervención (%)"), "tasadeintervencion");
    }
}
