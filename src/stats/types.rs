//! Result types produced by the statistics computations.

use chrono::Weekday;
use serde::{Serialize, Serializer};

use crate::filter::weekday_name;

/// Most frequent month, weekday and start hour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeStats {
    pub most_common_month: u32,
    #[serde(serialize_with = "serialize_weekday")]
    pub most_common_day: Weekday,
    pub most_common_hour: u32,
}

/// Most used start station, end station and start/end pairing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationStats {
    pub most_common_start_station: String,
    pub most_common_end_station: String,
    pub most_common_trip: String,
}

/// Total and mean trip duration, in raw seconds and in report units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationStats {
    pub trip_count: usize,
    pub total_seconds: f64,
    pub total_days: f64,
    pub mean_seconds: f64,
    pub mean_minutes: f64,
}

/// How often a categorical value occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BirthYearStats {
    pub earliest: i32,
    pub most_recent: i32,
    pub most_common: i32,
}

/// Rider breakdowns.
///
/// `gender` is `None` when the source has no `Gender` column; `birth_year`
/// is `None` when there is no `Birth Year` column or no year values.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct UserStats {
    pub user_types: Vec<ValueCount>,
    pub gender: Option<Vec<ValueCount>>,
    pub birth_year: Option<BirthYearStats>,
}

/// Wall-clock seconds spent on each computation.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SectionTimings {
    pub time: f64,
    pub stations: f64,
    pub duration: f64,
    pub users: f64,
}

/// All four computations for one city and filter, as emitted by `--format json`.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub city: String,
    pub month: String,
    pub day: String,
    pub trip_count: usize,
    pub time: Option<TimeStats>,
    pub stations: Option<StationStats>,
    pub duration: Option<DurationStats>,
    pub users: UserStats,
    pub elapsed_seconds: SectionTimings,
}

fn serialize_weekday<S: Serializer>(day: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(weekday_name(*day))
}
