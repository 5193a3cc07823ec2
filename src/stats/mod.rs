//! Descriptive statistics over a trip table.
//!
//! Four independent read-only computations (popular times, popular stations,
//! trip durations, rider breakdowns), each returning a serializable result.

pub mod aggregate;
pub mod types;
pub mod utility;

pub use aggregate::{build_report, duration_stats, station_stats, time_stats, user_stats};
