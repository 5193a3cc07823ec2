//! CSV loader for city trip data.
//!
//! Reads a city's source file, parses `Start Time`, derives the month,
//! weekday and hour columns, and detects which optional rider columns the
//! file provides.

use anyhow::{Context, Result, bail};
use chrono::NaiveDateTime;
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::city::City;
use crate::config::DataConfig;
use crate::filter::{DayFilter, MonthFilter, TripFilter};
use crate::table::{SchemaCapabilities, Trip, TripTable};

const GENDER_COLUMN: &str = "Gender";
const BIRTH_YEAR_COLUMN: &str = "Birth Year";

/// One row as it appears in the source CSV. Columns not listed here are ignored.
#[derive(Debug, Deserialize)]
struct RawTrip {
    #[serde(rename = "Start Time")]
    start_time: String,
    #[serde(rename = "End Time", default)]
    end_time: Option<String>,
    #[serde(rename = "Trip Duration")]
    trip_duration: f64,
    #[serde(rename = "Start Station")]
    start_station: String,
    #[serde(rename = "End Station")]
    end_station: String,
    #[serde(rename = "User Type", default)]
    user_type: Option<String>,
    #[serde(rename = "Gender", default)]
    gender: Option<String>,
    #[serde(rename = "Birth Year", default)]
    birth_year: Option<f64>,
}

/// Loads `city` using `config`, then keeps only trips matching `month` and `day`.
///
/// # Errors
///
/// Returns an error if the city's file is missing or unreadable, or if any
/// row has a malformed timestamp or duration.
#[tracing::instrument(skip(config), fields(city = %city, month = %month, day = %day))]
pub fn load_data(
    config: &DataConfig,
    city: City,
    month: MonthFilter,
    day: DayFilter,
) -> Result<TripTable> {
    let path = config.path_for(city);
    let table = load_table(&path)?;
    let filter = TripFilter::new(month, day);

    if filter.is_unfiltered() {
        return Ok(table);
    }

    let filtered = table.filter(&filter);
    info!(
        loaded = table.len(),
        matched = filtered.len(),
        "Trips filtered"
    );
    Ok(filtered)
}

/// Loads every trip in the CSV file at `path`.
#[tracing::instrument(fields(path = %path.display()))]
pub fn load_table(path: &Path) -> Result<TripTable> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open trip data '{}'", path.display()))?;
    let table = load_from_reader(file)
        .with_context(|| format!("Failed to load trip data '{}'", path.display()))?;

    info!(
        rows = table.len(),
        has_gender = table.capabilities().has_gender,
        has_birth_year = table.capabilities().has_birth_year,
        "Trip data loaded"
    );
    Ok(table)
}

/// Loads trips from any CSV source with a header row.
pub fn load_from_reader<R: Read>(reader: R) -> Result<TripTable> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    let capabilities = capabilities_from_headers(rdr.headers()?);
    debug!(?capabilities, "Schema capabilities detected");

    let mut trips = Vec::new();
    for (idx, result) in rdr.deserialize::<RawTrip>().enumerate() {
        let row = idx + 1;
        let raw = result.with_context(|| format!("Malformed trip at data row {row}"))?;
        let trip =
            trip_from_raw(raw).with_context(|| format!("Malformed trip at data row {row}"))?;
        trips.push(trip);
    }

    Ok(TripTable::new(trips, capabilities))
}

/// Reads only the header row of `path` to find which optional columns exist.
pub fn read_capabilities(path: &Path) -> Result<SchemaCapabilities> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open trip data '{}'", path.display()))?;
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(file);
    Ok(capabilities_from_headers(rdr.headers()?))
}

fn capabilities_from_headers(headers: &StringRecord) -> SchemaCapabilities {
    SchemaCapabilities {
        has_gender: headers.iter().any(|h| h == GENDER_COLUMN),
        has_birth_year: headers.iter().any(|h| h == BIRTH_YEAR_COLUMN),
    }
}

fn trip_from_raw(raw: RawTrip) -> Result<Trip> {
    let start_time = parse_timestamp(&raw.start_time)?;
    let end_time = match raw.end_time.as_deref() {
        Some(s) if !s.is_empty() => Some(parse_timestamp(s)?),
        _ => None,
    };
    if !raw.trip_duration.is_finite() {
        bail!("Invalid trip duration '{}'", raw.trip_duration);
    }
    let birth_year = match raw.birth_year {
        Some(y) if !y.is_finite() => bail!("Invalid birth year '{y}'"),
        Some(y) => Some(y.trunc() as i32),
        None => None,
    };

    Ok(
        Trip::new(start_time, raw.start_station, raw.end_station, raw.trip_duration)
            .with_end_time(end_time)
            .with_rider(non_blank(raw.user_type), non_blank(raw.gender), birth_year),
    )
}

/// Parses `YYYY-MM-DD HH:MM:SS`, with optional fractional seconds.
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .with_context(|| format!("Invalid timestamp '{s}'"))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use std::env;
    use std::fs;

    const CHICAGO_CSV: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
0,2017-01-23 15:09:32,2017-01-23 15:14:53,321,Wood St & Hubbard St,Damen Ave & Chicago Ave,Subscriber,Male,1992.0
1,2017-03-04 18:53:53,2017-03-04 18:57:42,229,Canal St & Adams St,Clinton St & Madison St,Customer,,
";

    const WASHINGTON_CSV: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type
0,2017-06-21 08:36:34,2017-06-21 08:44:43,489.066,14th & Belmont St NW,15th & K St NW,Subscriber
";

    #[test]
    fn test_load_with_rider_columns() {
        let table = load_from_reader(CHICAGO_CSV.as_bytes()).unwrap();

        assert_eq!(table.len(), 2);
        assert!(table.capabilities().has_gender);
        assert!(table.capabilities().has_birth_year);

        let first = &table.trips()[0];
        assert_eq!(first.month, 1);
        assert_eq!(first.day_of_week, Weekday::Mon);
        assert_eq!(first.hour, 15);
        assert_eq!(first.trip_duration, 321.0);
        assert_eq!(first.gender.as_deref(), Some("Male"));
        assert_eq!(first.birth_year, Some(1992));
        assert!(first.end_time.is_some());
    }

    #[test]
    fn test_blank_rider_cells_are_missing() {
        let table = load_from_reader(CHICAGO_CSV.as_bytes()).unwrap();
        let second = &table.trips()[1];

        assert_eq!(second.user_type.as_deref(), Some("Customer"));
        assert_eq!(second.gender, None);
        assert_eq!(second.birth_year, None);
    }

    #[test]
    fn test_load_without_rider_columns() {
        let table = load_from_reader(WASHINGTON_CSV.as_bytes()).unwrap();

        assert_eq!(table.len(), 1);
        assert!(!table.capabilities().has_gender);
        assert!(!table.capabilities().has_birth_year);
        assert_eq!(table.trips()[0].trip_duration, 489.066);
    }

    #[test]
    fn test_bad_timestamp_reports_row() {
        let csv = "Start Time,Trip Duration,Start Station,End Station,User Type\n\
                   2017-01-01 00:00:00,10,A,B,Subscriber\n\
                   yesterday,10,A,B,Subscriber\n";
        let err = load_from_reader(csv.as_bytes()).unwrap_err();

        assert!(format!("{err:#}").contains("row 2"));
    }

    #[test]
    fn test_non_finite_duration_reports_row() {
        for bad in ["NaN", "nan", "inf", "-inf"] {
            let csv = format!(
                "Start Time,Trip Duration,Start Station,End Station,User Type\n\
                 2017-01-01 00:00:00,10,A,B,Subscriber\n\
                 2017-01-01 00:05:00,{bad},A,B,Subscriber\n"
            );
            let err = load_from_reader(csv.as_bytes()).unwrap_err();

            assert!(format!("{err:#}").contains("row 2"), "duration {bad}");
        }
    }

    #[test]
    fn test_non_finite_birth_year_reports_row() {
        let csv = "Start Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year\n\
                   2017-01-01 00:00:00,10,A,B,Subscriber,Male,NaN\n";
        let err = load_from_reader(csv.as_bytes()).unwrap_err();

        assert!(format!("{err:#}").contains("row 1"));
    }

    #[test]
    fn test_parse_timestamp_with_fraction() {
        let ts = parse_timestamp("2017-05-01 07:00:00.123").unwrap();
        assert_eq!(ts.format("%H:%M:%S").to_string(), "07:00:00");
    }

    #[test]
    fn test_load_table_missing_file() {
        let result = load_table(Path::new("/nonexistent/bikeshare/chicago.csv"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_data_filters_by_month() {
        let dir = env::temp_dir().join("bikeshare_stats_loader_test");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("chicago.csv"), CHICAGO_CSV).unwrap();

        let config = DataConfig::new(&dir);
        let all = load_data(&config, City::Chicago, MonthFilter::All, DayFilter::All).unwrap();
        let march =
            load_data(&config, City::Chicago, MonthFilter::Month(3), DayFilter::All).unwrap();

        assert_eq!(all.len(), 2);
        assert_eq!(march.len(), 1);
        assert_eq!(march.trips()[0].start_station, "Canal St & Adams St");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_read_capabilities() {
        let path = env::temp_dir().join("bikeshare_stats_test_caps.csv");
        fs::write(&path, WASHINGTON_CSV).unwrap();

        let caps = read_capabilities(&path).unwrap();
        assert_eq!(caps, SchemaCapabilities::default());

        fs::remove_file(&path).unwrap();
    }
}
