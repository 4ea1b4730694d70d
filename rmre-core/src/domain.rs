//! Domain types: observations, date ranges, resampling modes, period keys,
//! and the pipeline's output series.

use crate::error::{Result, RmreError};
use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// One cleaned observation: an end-of-validity date and its value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Date-ordered observations with unique dates and no missing values.
///
/// The only constructor sorts and de-duplicates, so every instance holds
/// strictly increasing dates.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ObservationSeries {
    observations: Vec<Observation>,
}

impl ObservationSeries {
    /// Build a series from observations in any order.
    ///
    /// Non-finite values are dropped. When a date repeats, the first
    /// occurrence in input order is kept.
    pub fn from_observations(mut observations: Vec<Observation>) -> Self {
        observations.retain(|o| o.value.is_finite());
        observations.sort_by_key(|o| o.date);
        observations.dedup_by_key(|o| o.date);
        Self { observations }
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.observations.iter()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.observations.first().map(|o| o.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.observations.last().map(|o| o.date)
    }

    pub fn values(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.value).collect()
    }

    /// Keep only observations inside the closed range.
    pub fn within(&self, range: &DateRange) -> Self {
        Self {
            observations: self
                .observations
                .iter()
                .filter(|o| range.contains(o.date))
                .copied()
                .collect(),
        }
    }

    /// Map consecutive pairs, keeping only finite results.
    ///
    /// The output has one entry per pair `(prev, cur)` and carries `cur.date`.
    /// The second value counts pairs whose result was not finite.
    pub(crate) fn map_pairs(&self, f: impl Fn(f64, f64) -> f64) -> (Self, usize) {
        let mut skipped = 0;
        let observations = self
            .observations
            .windows(2)
            .map(|w| Observation::new(w[1].date, f(w[0].value, w[1].value)))
            .filter(|o| {
                let keep = o.value.is_finite();
                if !keep {
                    skipped += 1;
                }
                keep
            })
            .collect();
        (Self { observations }, skipped)
    }
}

impl<'a> IntoIterator for &'a ObservationSeries {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.iter()
    }
}

/// Closed calendar interval `[start, end]` with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(RmreError::InvalidRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Output frequency, keyed by observations per year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Frequency {
    #[default]
    Daily,
    Monthly,
    Quarterly,
    SemiAnnual,
}

impl Frequency {
    pub const ALL: [Frequency; 4] = [
        Frequency::Daily,
        Frequency::Monthly,
        Frequency::Quarterly,
        Frequency::SemiAnnual,
    ];

    pub fn periods_per_year(self) -> u32 {
        match self {
            Frequency::Daily => 365,
            Frequency::Monthly => 12,
            Frequency::Quarterly => 4,
            Frequency::SemiAnnual => 2,
        }
    }

    /// Name of the index column in tabular output.
    pub fn index_name(self) -> &'static str {
        match self {
            Frequency::Daily => "Date",
            Frequency::Monthly => "Month",
            Frequency::Quarterly => "Quarter",
            Frequency::SemiAnnual => "Semester",
        }
    }
}

impl TryFrom<u32> for Frequency {
    type Error = RmreError;

    fn try_from(value: u32) -> Result<Self> {
        Frequency::ALL
            .into_iter()
            .find(|f| f.periods_per_year() == value)
            .ok_or_else(|| RmreError::InvalidParameter {
                parameter: "frequency",
                value: value.to_string(),
                expected: "365, 12, 4, 2",
            })
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.periods_per_year())
    }
}

/// How a resampled bucket collapses to one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Last observed value in the bucket.
    #[default]
    LastDate,
    /// Arithmetic mean of the bucket.
    Mean,
}

impl Aggregation {
    pub fn as_str(self) -> &'static str {
        match self {
            Aggregation::LastDate => "last_date",
            Aggregation::Mean => "mean",
        }
    }
}

impl FromStr for Aggregation {
    type Err = RmreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "last_date" => Ok(Aggregation::LastDate),
            "mean" => Ok(Aggregation::Mean),
            other => Err(RmreError::InvalidParameter {
                parameter: "type",
                value: other.to_string(),
                expected: "'mean', 'last_date'",
            }),
        }
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether values are raw levels or log-returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Level,
    LogReturn,
}

impl ValueKind {
    /// Name of the value column in tabular output.
    pub fn column_name(self) -> &'static str {
        match self {
            ValueKind::Level => "rmre",
            ValueKind::LogReturn => "log_return",
        }
    }
}

/// Resampling bucket derived from a date.
///
/// Variants order by year first, then by position inside the year, so
/// sorting periods of one frequency is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Period {
    Day(NaiveDate),
    Month { year: i32, month: u32 },
    Quarter { year: i32, quarter: u32 },
    Semester { year: i32, half: u32 },
}

impl Period {
    /// Bucket `date` falls into at the given frequency.
    pub fn of(date: NaiveDate, frequency: Frequency) -> Self {
        let year = date.year();
        match frequency {
            Frequency::Daily => Period::Day(date),
            Frequency::Monthly => Period::Month {
                year,
                month: date.month(),
            },
            Frequency::Quarterly => Period::Quarter {
                year,
                quarter: (date.month() - 1) / 3 + 1,
            },
            Frequency::SemiAnnual => Period::Semester {
                year,
                half: if date.month() <= 6 { 1 } else { 2 },
            },
        }
    }

    /// First calendar day covered by the period.
    pub fn start_date(&self) -> NaiveDate {
        let (year, month) = match *self {
            Period::Day(d) => return d,
            Period::Month { year, month } => (year, month),
            Period::Quarter { year, quarter } => (year, (quarter - 1) * 3 + 1),
            Period::Semester { year, half } => (year, (half - 1) * 6 + 1),
        };
        NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Day(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Period::Month { year, month } => write!(f, "{year}-{month:02}"),
            Period::Quarter { year, quarter } => write!(f, "{year}Q{quarter}"),
            Period::Semester { year, half } => write!(f, "{year}-{half}S"),
        }
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One row of the pipeline output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub period: Period,
    pub value: f64,
}

/// Final series returned by the pipeline: ordered `(period, value)` rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RmreSeries {
    pub kind: ValueKind,
    pub frequency: Frequency,
    /// `None` for daily output, where no aggregation happens.
    pub aggregation: Option<Aggregation>,
    pub points: Vec<SeriesPoint>,
}

impl RmreSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn index_name(&self) -> &'static str {
        self.frequency.index_name()
    }

    pub fn column_name(&self) -> &'static str {
        self.kind.column_name()
    }

    pub fn labels(&self) -> Vec<String> {
        self.points.iter().map(|p| p.period.to_string()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Chart title for the active mode.
    pub fn title(&self) -> String {
        let subject = match self.kind {
            ValueKind::Level => "RMRE",
            ValueKind::LogReturn => "Log Return",
        };
        match self.aggregation {
            None => subject.to_string(),
            Some(Aggregation::Mean) => format!("Mean {subject}"),
            Some(Aggregation::LastDate) => format!("Last {subject}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn series_sorts_and_keeps_first_duplicate() {
        let series = ObservationSeries::from_observations(vec![
            Observation::new(d(2019, 1, 3), 3.0),
            Observation::new(d(2019, 1, 1), 1.0),
            Observation::new(d(2019, 1, 3), 99.0),
            Observation::new(d(2019, 1, 2), f64::NAN),
        ]);
        assert_eq!(series.len(), 2);
        assert_eq!(series.first_date(), Some(d(2019, 1, 1)));
        assert_eq!(series.values(), vec![1.0, 3.0]);
    }

    #[test]
    fn date_range_rejects_inverted_bounds() {
        let err = DateRange::new(d(2019, 1, 10), d(2019, 1, 5)).unwrap_err();
        assert!(matches!(err, RmreError::InvalidRange { .. }));
    }

    #[test]
    fn date_range_is_inclusive() {
        let range = DateRange::new(d(2019, 1, 5), d(2019, 1, 10)).unwrap();
        assert!(range.contains(d(2019, 1, 5)));
        assert!(range.contains(d(2019, 1, 10)));
        assert!(!range.contains(d(2019, 1, 11)));
    }

    #[test]
    fn frequency_accepts_only_known_values() {
        assert_eq!(Frequency::try_from(365).unwrap(), Frequency::Daily);
        assert_eq!(Frequency::try_from(12).unwrap(), Frequency::Monthly);
        assert_eq!(Frequency::try_from(4).unwrap(), Frequency::Quarterly);
        assert_eq!(Frequency::try_from(2).unwrap(), Frequency::SemiAnnual);
        assert!(matches!(
            Frequency::try_from(7),
            Err(RmreError::InvalidParameter { parameter: "frequency", .. })
        ));
    }

    #[test]
    fn aggregation_parses_closed_set() {
        assert_eq!("mean".parse::<Aggregation>().unwrap(), Aggregation::Mean);
        assert_eq!(
            "last_date".parse::<Aggregation>().unwrap(),
            Aggregation::LastDate
        );
        assert!("median".parse::<Aggregation>().is_err());
        assert!("Mean".parse::<Aggregation>().is_err());
    }

    #[test]
    fn period_labels() {
        let date = d(2019, 8, 14);
        assert_eq!(Period::of(date, Frequency::Daily).to_string(), "2019-08-14");
        assert_eq!(Period::of(date, Frequency::Monthly).to_string(), "2019-08");
        assert_eq!(Period::of(date, Frequency::Quarterly).to_string(), "2019Q3");
        assert_eq!(Period::of(date, Frequency::SemiAnnual).to_string(), "2019-2S");
        assert_eq!(
            Period::of(d(2019, 6, 30), Frequency::SemiAnnual).to_string(),
            "2019-1S"
        );
    }

    #[test]
    fn period_start_dates() {
        let q = Period::of(d(2020, 11, 3), Frequency::Quarterly);
        assert_eq!(q.start_date(), d(2020, 10, 1));
        let s = Period::of(d(2020, 11, 3), Frequency::SemiAnnual);
        assert_eq!(s.start_date(), d(2020, 7, 1));
    }

    #[test]
    fn periods_order_chronologically() {
        let a = Period::of(d(2019, 12, 31), Frequency::Monthly);
        let b = Period::of(d(2020, 1, 1), Frequency::Monthly);
        assert!(a < b);
    }

    #[test]
    fn titles_reflect_mode() {
        let mut series = RmreSeries {
            kind: ValueKind::Level,
            frequency: Frequency::Daily,
            aggregation: None,
            points: vec![],
        };
        assert_eq!(series.title(), "RMRE");
        series.kind = ValueKind::LogReturn;
        assert_eq!(series.title(), "Log Return");
        series.aggregation = Some(Aggregation::Mean);
        assert_eq!(series.title(), "Mean Log Return");
        series.kind = ValueKind::Level;
        series.aggregation = Some(Aggregation::LastDate);
        assert_eq!(series.title(), "Last RMRE");
    }
}
