use crate::city::City;
use crate::filter::TripFilter;
use crate::stats::types::{
    BirthYearStats, DurationStats, Report, SectionTimings, StationStats, TimeStats, UserStats,
    ValueCount,
};
use crate::stats::utility::{mean, mode, timed, value_counts};
use crate::table::TripTable;

const SECONDS_PER_DAY: f64 = 86_400.0;
const SECONDS_PER_MINUTE: f64 = 60.0;

/// Most common month, day of week and start hour. `None` for an empty table.
pub fn time_stats(table: &TripTable) -> Option<TimeStats> {
    let trips = table.trips();

    Some(TimeStats {
        most_common_month: mode(trips.iter().map(|t| t.month))?,
        most_common_day: mode(trips.iter().map(|t| t.day_of_week))?,
        most_common_hour: mode(trips.iter().map(|t| t.hour))?,
    })
}

/// Most common start station, end station and start/end combination.
/// `None` for an empty table.
pub fn station_stats(table: &TripTable) -> Option<StationStats> {
    let trips = table.trips();

    Some(StationStats {
        most_common_start_station: mode(trips.iter().map(|t| t.start_station.as_str()))?
            .to_string(),
        most_common_end_station: mode(trips.iter().map(|t| t.end_station.as_str()))?.to_string(),
        most_common_trip: mode(trips.iter().map(|t| t.route()))?,
    })
}

/// Total travel time in days and mean travel time in minutes.
/// `None` for an empty table, so no NaN ever reaches the report.
pub fn duration_stats(table: &TripTable) -> Option<DurationStats> {
    let durations: Vec<f64> = table.trips().iter().map(|t| t.trip_duration).collect();
    let mean_seconds = mean(&durations)?;
    let total_seconds: f64 = durations.iter().sum();

    Some(DurationStats {
        trip_count: durations.len(),
        total_seconds,
        total_days: total_seconds / SECONDS_PER_DAY,
        mean_seconds,
        mean_minutes: mean_seconds / SECONDS_PER_MINUTE,
    })
}

/// User-type counts, plus gender counts and birth-year extremes when the
/// source provides those columns.
pub fn user_stats(table: &TripTable) -> UserStats {
    let trips = table.trips();
    let capabilities = table.capabilities();

    let user_types = counted(trips.iter().filter_map(|t| t.user_type.as_deref()));

    let gender = capabilities
        .has_gender
        .then(|| counted(trips.iter().filter_map(|t| t.gender.as_deref())));

    let birth_year = if capabilities.has_birth_year {
        let years: Vec<i32> = trips.iter().filter_map(|t| t.birth_year).collect();
        birth_year_stats(&years)
    } else {
        None
    };

    UserStats {
        user_types,
        gender,
        birth_year,
    }
}

/// Runs all four computations, timing each, and bundles them with the
/// request that produced them.
pub fn build_report(city: City, filter: &TripFilter, table: &TripTable) -> Report {
    let (time, time_elapsed) = timed(|| time_stats(table));
    let (stations, stations_elapsed) = timed(|| station_stats(table));
    let (duration, duration_elapsed) = timed(|| duration_stats(table));
    let (users, users_elapsed) = timed(|| user_stats(table));

    Report {
        city: city.to_string(),
        month: filter.month.to_string(),
        day: filter.day.to_string(),
        trip_count: table.len(),
        time,
        stations,
        duration,
        users,
        elapsed_seconds: SectionTimings {
            time: time_elapsed.as_secs_f64(),
            stations: stations_elapsed.as_secs_f64(),
            duration: duration_elapsed.as_secs_f64(),
            users: users_elapsed.as_secs_f64(),
        },
    }
}

fn birth_year_stats(years: &[i32]) -> Option<BirthYearStats> {
    Some(BirthYearStats {
        earliest: *years.iter().min()?,
        most_recent: *years.iter().max()?,
        most_common: mode(years.iter().copied())?,
    })
}

fn counted<'a>(values: impl Iterator<Item = &'a str>) -> Vec<ValueCount> {
    value_counts(values)
        .into_iter()
        .map(|(value, count)| ValueCount {
            value: value.to_string(),
            count,
        })
        .collect()
}
