//! Month and day-of-week filters applied to a loaded trip table.

use anyhow::{Result, bail};
use chrono::{Month, Weekday};
use std::fmt;
use std::str::FromStr;

use crate::table::Trip;

/// Months covered by the source data, in calendar order.
pub const MONTHS: [&str; 6] = ["january", "february", "march", "april", "may", "june"];

/// Restricts trips to one month (1-based) or keeps all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonthFilter {
    #[default]
    All,
    Month(u32),
}

/// Restricts trips to one day of the week or keeps all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayFilter {
    #[default]
    All,
    Day(Weekday),
}

/// Combined month and day criteria. A trip must satisfy both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TripFilter {
    pub month: MonthFilter,
    pub day: DayFilter,
}

impl MonthFilter {
    pub fn matches(&self, month: u32) -> bool {
        match self {
            MonthFilter::All => true,
            MonthFilter::Month(m) => *m == month,
        }
    }
}

impl DayFilter {
    pub fn matches(&self, day: Weekday) -> bool {
        match self {
            DayFilter::All => true,
            DayFilter::Day(d) => *d == day,
        }
    }
}

impl TripFilter {
    pub fn new(month: MonthFilter, day: DayFilter) -> Self {
        Self { month, day }
    }

    pub fn is_unfiltered(&self) -> bool {
        self.month == MonthFilter::All && self.day == DayFilter::All
    }

    pub fn matches(&self, trip: &Trip) -> bool {
        self.month.matches(trip.month) && self.day.matches(trip.day_of_week)
    }
}

impl FromStr for MonthFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        if wanted == "all" {
            return Ok(MonthFilter::All);
        }
        match MONTHS.iter().position(|m| *m == wanted) {
            Some(idx) => Ok(MonthFilter::Month(idx as u32 + 1)),
            None => bail!(
                "Invalid month '{}': expected January through June, or 'all'",
                s.trim()
            ),
        }
    }
}

impl FromStr for DayFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        if wanted == "all" {
            return Ok(DayFilter::All);
        }
        match weekday_from_name(&wanted) {
            Some(day) => Ok(DayFilter::Day(day)),
            None => bail!(
                "Invalid day '{}': expected a full weekday name, or 'all'",
                s.trim()
            ),
        }
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthFilter::All => f.write_str("All"),
            MonthFilter::Month(m) => f.write_str(month_name(*m)),
        }
    }
}

impl fmt::Display for DayFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayFilter::All => f.write_str("All"),
            DayFilter::Day(d) => f.write_str(weekday_name(*d)),
        }
    }
}

/// Title-cased English name of a 1-based month number.
pub fn month_name(month: u32) -> &'static str {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map_or("Unknown", |m| m.name())
}

/// Full title-cased weekday name (`chrono` only renders abbreviations).
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

fn weekday_from_name(name: &str) -> Option<Weekday> {
    [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ]
    .into_iter()
    .find(|d| weekday_name(*d).eq_ignore_ascii_case(name))
}
