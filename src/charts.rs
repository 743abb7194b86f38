//! Chart series derived from the weekly log
//!
//! Series are recomputed on demand and never persisted.

use chrono::NaiveDate;

use crate::week::{DateRange, RangeToken, short_label, week_label_of};
use crate::weekly::WeeklyLogStore;

/// Paired labels and values, always the same length
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    pub fn push(&mut self, label: impl Into<String>, value: f64) {
        self.labels.push(label.into());
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// No data points at all; not the same as a series of zeros
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn max_value(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.labels.iter().map(String::as_str).zip(self.values.iter().copied())
    }
}

/// Per-muscle sets for one week, in storage order
///
/// Entries with zero sets are kept.
pub fn bar_series_for_week(log: &WeeklyLogStore, week: &str) -> ChartSeries {
    let mut series = ChartSeries::default();
    for entry in log.entries_for(week) {
        series.push(entry.muscle, entry.sets as f64);
    }
    series
}

/// One muscle's sets per week across a named range ending at `now`
///
/// Unknown range tokens give an empty series.
pub fn trend_series_for_muscle(log: &WeeklyLogStore, muscle: &str, token: &str, now: NaiveDate) -> ChartSeries {
    match token.parse::<RangeToken>() {
        Ok(range) => muscle_trend(log, muscle, range.range(now)),
        Err(_) => ChartSeries::default(),
    }
}

/// Total sets of all muscles per week across a named range ending at `now`
pub fn total_series_for_range(log: &WeeklyLogStore, token: &str, now: NaiveDate) -> ChartSeries {
    match token.parse::<RangeToken>() {
        Ok(range) => weekly_walk(range.range(now), |week| {
            log.entries_for(week).iter().map(|e| e.sets as f64).sum()
        }),
        Err(_) => ChartSeries::default(),
    }
}

/// Trend for an already-resolved range
pub fn muscle_trend(log: &WeeklyLogStore, muscle: &str, range: DateRange) -> ChartSeries {
    weekly_walk(range, |week| log.sets_for(week, muscle) as f64)
}

/// Walk 7-day steps from the range start, oldest first
///
/// Every step yields a point; weeks without data contribute 0.
fn weekly_walk<F>(range: DateRange, mut value_for_week: F) -> ChartSeries
where
    F: FnMut(&str) -> f64,
{
    let mut series = ChartSeries::default();
    for step in range.weekly_steps() {
        let week = week_label_of(step);
        series.push(short_label(step), value_for_week(&week));
    }
    series
}
