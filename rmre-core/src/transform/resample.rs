//! Period bucketing and aggregation.

use crate::domain::{
    Aggregation, Frequency, ObservationSeries, Period, RmreSeries, SeriesPoint, ValueKind,
};

/// Collapse a date-ordered series to one row per period.
///
/// Daily frequency passes every observation through unchanged and records
/// no aggregation. Coarser frequencies group consecutive observations by
/// period key; since the input is sorted, groups appear in chronological
/// order of first occurrence.
pub fn resample(
    series: &ObservationSeries,
    kind: ValueKind,
    frequency: Frequency,
    aggregation: Aggregation,
) -> RmreSeries {
    if frequency == Frequency::Daily {
        return RmreSeries {
            kind,
            frequency,
            aggregation: None,
            points: series
                .iter()
                .map(|o| SeriesPoint {
                    period: Period::Day(o.date),
                    value: o.value,
                })
                .collect(),
        };
    }

    let mut points: Vec<SeriesPoint> = Vec::new();
    let mut bucket = Bucket::default();

    for obs in series {
        let period = Period::of(obs.date, frequency);
        if bucket.period != Some(period) {
            if let Some(point) = bucket.finish(aggregation) {
                points.push(point);
            }
            bucket = Bucket::new(period);
        }
        bucket.push(obs.value);
    }
    if let Some(point) = bucket.finish(aggregation) {
        points.push(point);
    }

    RmreSeries {
        kind,
        frequency,
        aggregation: Some(aggregation),
        points,
    }
}

#[derive(Default)]
struct Bucket {
    period: Option<Period>,
    sum: f64,
    count: usize,
    last: f64,
}

impl Bucket {
    fn new(period: Period) -> Self {
        Self {
            period: Some(period),
            ..Self::default()
        }
    }

    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
        self.last = value;
    }

    fn finish(&self, aggregation: Aggregation) -> Option<SeriesPoint> {
        let period = self.period?;
        if self.count == 0 {
            return None;
        }
        let value = match aggregation {
            Aggregation::Mean => self.sum / self.count as f64,
            Aggregation::LastDate => self.last,
        };
        Some(SeriesPoint { period, value })
    }
}
