//! Week identification and date ranges
//!
//! Weeks run Monday to Sunday. A week is identified by the label of its
//! Monday, formatted the en-US way ("Oct 19, 2026").

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, Local, Months, NaiveDate};

/// Canonical identifier of a Monday-starting week
pub type WeekLabel = String;

const WEEK_LABEL_FORMAT: &str = "%b %-d, %Y";
const WEEK_LABEL_PARSE: &str = "%b %d, %Y";
const SHORT_LABEL_FORMAT: &str = "%b %-d";

/// Monday of the week containing `date`
///
/// Sunday belongs to the week that started the preceding Monday.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let day_index = date.weekday().num_days_from_sunday() as i64;
    let offset = if day_index == 0 { -6 } else { 1 - day_index };
    date + Duration::days(offset)
}

/// Label of the week containing `date`
pub fn week_label_of(date: NaiveDate) -> WeekLabel {
    week_start(date).format(WEEK_LABEL_FORMAT).to_string()
}

/// Month-abbrev/day label used on chart axes
pub fn short_label(date: NaiveDate) -> String {
    date.format(SHORT_LABEL_FORMAT).to_string()
}

/// Parse a stored week label back into its Monday
///
/// Returns `None` for anything that is not the label of a Monday.
pub fn parse_week_label(label: &str) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(label.trim(), WEEK_LABEL_PARSE).ok()?;
    (week_start(date) == date).then_some(date)
}

/// Today's date in local time
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Named lookback range for trend charts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeToken {
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
}

impl RangeToken {
    pub fn all() -> &'static [RangeToken] {
        &[
            RangeToken::OneMonth,
            RangeToken::ThreeMonths,
            RangeToken::SixMonths,
            RangeToken::OneYear,
        ]
    }

    pub fn token(&self) -> &'static str {
        match self {
            RangeToken::OneMonth => "1_month",
            RangeToken::ThreeMonths => "3_months",
            RangeToken::SixMonths => "6_months",
            RangeToken::OneYear => "1_year",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            RangeToken::OneMonth => "Past Month",
            RangeToken::ThreeMonths => "Past 3 Months",
            RangeToken::SixMonths => "Past 6 Months",
            RangeToken::OneYear => "Past Year",
        }
    }

    fn months(&self) -> u32 {
        match self {
            RangeToken::OneMonth => 1,
            RangeToken::ThreeMonths => 3,
            RangeToken::SixMonths => 6,
            RangeToken::OneYear => 12,
        }
    }

    /// Next range in the picker order, wrapping around
    pub fn next(&self) -> RangeToken {
        let all = Self::all();
        let idx = all.iter().position(|r| r == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    /// Concrete range ending at `now`
    pub fn range(&self, now: NaiveDate) -> DateRange {
        // Month subtraction clamps to the last valid day (Mar 31 -> Feb 28)
        let start = now
            .checked_sub_months(Months::new(self.months()))
            .unwrap_or(NaiveDate::MIN);
        DateRange { start, end: now }
    }
}

impl fmt::Display for RangeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for RangeToken {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RangeToken::all()
            .iter()
            .find(|r| r.token() == s)
            .copied()
            .ok_or_else(|| format!("unknown range `{}` (expected 1_month, 3_months, 6_months or 1_year)", s))
    }
}

/// Inclusive date range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// 7-day steps from `start` while the step is not after `end`
    pub fn weekly_steps(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        std::iter::successors(Some(self.start), |d| d.checked_add_signed(Duration::days(7)))
            .take_while(move |d| *d <= end)
    }
}

/// Range for a raw token; unknown tokens give `None`
pub fn range_for(token: &str, now: NaiveDate) -> Option<DateRange> {
    token.parse::<RangeToken>().ok().map(|r| r.range(now))
}
