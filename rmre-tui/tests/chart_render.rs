//! Charts built from real pipeline output render into an off-screen buffer.

use chrono::NaiveDate;
use rmre_core::domain::{Aggregation, Frequency, Observation, ObservationSeries, ValueKind};
use rmre_core::render::ChartSpec;
use rmre_core::transform::{log_returns, resample};
use rmre_tui::{render_to_string, Theme};

fn january() -> ObservationSeries {
    let values = [
        (2, 3250.0),
        (3, 3260.0),
        (4, 3240.0),
        (7, 3230.0),
        (8, 3220.0),
    ];
    ObservationSeries::from_observations(
        values
            .iter()
            .map(|&(day, v)| Observation::new(NaiveDate::from_ymd_opt(2019, 1, day).unwrap(), v))
            .collect(),
    )
}

#[test]
fn daily_level_chart_shows_title_and_dates() {
    let series = resample(&january(), ValueKind::Level, Frequency::Daily, Aggregation::LastDate);
    let text = render_to_string(&ChartSpec::from_series(&series), &Theme::default(), 100, 24);

    assert!(text.contains("RMRE"));
    assert!(text.contains("5 points"));
    assert!(text.contains("2019-01-02"));
    assert!(text.contains("2019-01-08"));
    assert!(text.contains("Date"));
}

#[test]
fn resampled_log_return_chart_uses_period_labels() {
    let returns = log_returns(&january());
    let series = resample(&returns, ValueKind::LogReturn, Frequency::Monthly, Aggregation::Mean);
    let text = render_to_string(&ChartSpec::from_series(&series), &Theme::default(), 100, 24);

    assert!(text.contains("Mean Log Return"));
    assert!(text.contains("2019-01"));
}

#[test]
fn tiny_area_does_not_panic() {
    let series = resample(&january(), ValueKind::Level, Frequency::Daily, Aggregation::LastDate);
    let spec = ChartSpec::from_series(&series);
    for (w, h) in [(1, 1), (5, 3), (12, 4)] {
        let _ = render_to_string(&spec, &Theme::default(), w, h);
    }
}
