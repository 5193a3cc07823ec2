//! In-memory trip table with derived time columns.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::Serialize;
use tracing::debug;

use crate::filter::TripFilter;

/// Optional columns detected once from the source header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SchemaCapabilities {
    pub has_gender: bool,
    pub has_birth_year: bool,
}

/// One trip record. `month`, `day_of_week` and `hour` are derived from
/// `start_time` when the record is built.
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    pub start_station: String,
    pub end_station: String,
    pub trip_duration: f64,
    pub user_type: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<i32>,

    // derived
    pub month: u32,
    pub day_of_week: Weekday,
    pub hour: u32,
}

impl Trip {
    pub fn new(
        start_time: NaiveDateTime,
        start_station: impl Into<String>,
        end_station: impl Into<String>,
        trip_duration: f64,
    ) -> Self {
        Trip {
            start_time,
            end_time: None,
            start_station: start_station.into(),
            end_station: end_station.into(),
            trip_duration,
            user_type: None,
            gender: None,
            birth_year: None,
            month: start_time.month(),
            day_of_week: start_time.weekday(),
            hour: start_time.hour(),
        }
    }

    pub fn with_end_time(mut self, end_time: Option<NaiveDateTime>) -> Self {
        self.end_time = end_time;
        self
    }

    /// Set the rider fields (user type, gender, birth year)
    pub fn with_rider(
        mut self,
        user_type: Option<String>,
        gender: Option<String>,
        birth_year: Option<i32>,
    ) -> Self {
        self.user_type = user_type;
        self.gender = gender;
        self.birth_year = birth_year;
        self
    }

    /// The start and end stations as a single route label.
    pub fn route(&self) -> String {
        format!("{} AND {}", self.start_station, self.end_station)
    }
}

/// Ordered trips for one city. Filtering produces a new table and leaves
/// the source untouched.
#[derive(Debug, Clone, Default)]
pub struct TripTable {
    trips: Vec<Trip>,
    capabilities: SchemaCapabilities,
}

impl TripTable {
    pub fn new(trips: Vec<Trip>, capabilities: SchemaCapabilities) -> Self {
        Self {
            trips,
            capabilities,
        }
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn capabilities(&self) -> SchemaCapabilities {
        self.capabilities
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    /// Returns a new table holding only the trips accepted by `filter`.
    pub fn filter(&self, filter: &TripFilter) -> TripTable {
        let trips: Vec<Trip> = self
            .trips
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();

        debug!(
            before = self.trips.len(),
            after = trips.len(),
            month = %filter.month,
            day = %filter.day,
            "Filter applied"
        );

        TripTable {
            trips,
            capabilities: self.capabilities,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{DayFilter, MonthFilter};

    #[test]
    fn test_derived_columns() {
        let trip = Trip::new(dt("2017-06-23 15:09:32"), "A", "B", 321.0);

        assert_eq!(trip.month, 6);
        assert_eq!(trip.day_of_week, Weekday::Fri);
        assert_eq!(trip.hour, 15);
    }

    #[test]
    fn test_route_label() {
        let trip = Trip::new(dt("2017-01-01 00:00:00"), "Canal St", "State St", 1.0);
        assert_eq!(trip.route(), "Canal St AND State St");
    }

    #[test]
    fn test_filter_all_keeps_every_row() {
        let table = create_table();
        let filtered = table.filter(&TripFilter::default());

        assert_eq!(filtered.len(), table.len());
    }

    #[test]
    fn test_filter_does_not_touch_source() {
        let table = create_table();
        let filtered = table.filter(&TripFilter::new(MonthFilter::Month(1), DayFilter::All));

        assert_eq!(filtered.len(), 1);
        assert_eq!(table.len(), 3);
        assert_eq!(filtered.capabilities(), table.capabilities());
    }

    #[test]
    fn test_filter_month_and_day() {
        let table = create_table();
        // 2017-02-06 is a Monday
        let filter = TripFilter::new(MonthFilter::Month(2), DayFilter::Day(Weekday::Mon));
        let filtered = table.filter(&filter);

        assert_eq!(filtered.len(), 1);
        assert!(
            filtered
                .trips()
                .iter()
                .all(|t| t.month == 2 && t.day_of_week == Weekday::Mon)
        );

        let none = table.filter(&TripFilter::new(
            MonthFilter::Month(2),
            DayFilter::Day(Weekday::Sun),
        ));
        assert!(none.is_empty());
    }

    // Helper functions for tests
    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn create_table() -> TripTable {
        TripTable::new(
            vec![
                Trip::new(dt("2017-01-10 08:00:00"), "A", "B", 60.0),
                Trip::new(dt("2017-02-06 09:30:00"), "B", "C", 120.0),
                Trip::new(dt("2017-03-15 17:45:00"), "C", "A", 180.0),
            ],
            SchemaCapabilities::default(),
        )
    }
}
