//! Report rendering for trip statistics.
//!
//! Supports a sectioned text report (with per-section timing) and a single
//! pretty-printed JSON document.

use anyhow::Result;
use std::io::Write;
use std::time::Duration;
use tracing::debug;

use crate::filter::{month_name, weekday_name};
use crate::stats::types::{Report, UserStats, ValueCount};
use crate::stats::utility::timed;
use crate::stats::{duration_stats, station_stats, time_stats, user_stats};
use crate::table::TripTable;

const SEPARATOR_WIDTH: usize = 40;
const NO_TRIPS: &str = "No trips match the selected filters.";
const NO_DATA: &str = "No data available.";

/// Writes all four statistics sections for `table` as plain text.
///
/// Each statistic is computed just before its section is written so the
/// reported time covers that computation alone.
pub fn write_text_report<W: Write>(out: &mut W, table: &TripTable) -> Result<()> {
    write_time_section(out, table)?;
    write_station_section(out, table)?;
    write_duration_section(out, table)?;
    write_user_section(out, table)?;
    Ok(())
}

/// Writes a [`Report`] as pretty-printed JSON followed by a newline.
pub fn write_json_report<W: Write>(out: &mut W, report: &Report) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}

fn write_time_section<W: Write>(out: &mut W, table: &TripTable) -> Result<()> {
    writeln!(out, "\nCalculating The Most Frequent Times of Travel...\n")?;
    let (stats, elapsed) = timed(|| time_stats(table));

    match stats {
        Some(s) => {
            writeln!(
                out,
                "The most common month is: {}",
                month_name(s.most_common_month)
            )?;
            writeln!(
                out,
                "The most common day of week is: {}",
                weekday_name(s.most_common_day)
            )?;
            writeln!(out, "The most common start hour is: {}", s.most_common_hour)?;
        }
        None => writeln!(out, "{NO_TRIPS}")?,
    }

    write_footer(out, "time", elapsed)
}

fn write_station_section<W: Write>(out: &mut W, table: &TripTable) -> Result<()> {
    writeln!(out, "\nCalculating The Most Popular Stations and Trip...\n")?;
    let (stats, elapsed) = timed(|| station_stats(table));

    match stats {
        Some(s) => {
            writeln!(
                out,
                "The most commonly used start station is: {}",
                s.most_common_start_station
            )?;
            writeln!(
                out,
                "The most commonly used end station is: {}",
                s.most_common_end_station
            )?;
            writeln!(
                out,
                "The most frequent combination of start station and end station trip is: {}",
                s.most_common_trip
            )?;
        }
        None => writeln!(out, "{NO_TRIPS}")?,
    }

    write_footer(out, "station", elapsed)
}

fn write_duration_section<W: Write>(out: &mut W, table: &TripTable) -> Result<()> {
    writeln!(out, "\nCalculating Trip Duration...\n")?;
    let (stats, elapsed) = timed(|| duration_stats(table));

    match stats {
        Some(s) => {
            writeln!(out, "Total travel time is {} days.", s.total_days)?;
            writeln!(out, "Mean travel time is {} minutes.", s.mean_minutes)?;
        }
        None => writeln!(out, "{NO_TRIPS}")?,
    }

    write_footer(out, "duration", elapsed)
}

fn write_user_section<W: Write>(out: &mut W, table: &TripTable) -> Result<()> {
    writeln!(out, "\nCalculating User Stats...\n")?;
    let (stats, elapsed) = timed(|| user_stats(table));

    write_user_stats(out, &stats)?;
    write_footer(out, "user", elapsed)
}

fn write_user_stats<W: Write>(out: &mut W, stats: &UserStats) -> Result<()> {
    writeln!(out, "Counts of User Types:")?;
    write_counts(out, &stats.user_types)?;

    writeln!(out, "\nCounts of Gender Types:")?;
    match &stats.gender {
        Some(counts) => write_counts(out, counts)?,
        None => writeln!(out, "{NO_DATA}")?,
    }

    match &stats.birth_year {
        Some(years) => {
            writeln!(out, "\nEarliest Year of Birth: {}", years.earliest)?;
            writeln!(out, "Most Recent Year of Birth: {}", years.most_recent)?;
            writeln!(out, "Most Common Year of Birth: {}", years.most_common)?;
        }
        None => {
            writeln!(out, "\nEarliest Year of Birth: {NO_DATA}")?;
            writeln!(out, "Most Recent Year of Birth: {NO_DATA}")?;
            writeln!(out, "Most Common Year of Birth: {NO_DATA}")?;
        }
    }
    Ok(())
}

fn write_counts<W: Write>(out: &mut W, counts: &[ValueCount]) -> Result<()> {
    if counts.is_empty() {
        writeln!(out, "{NO_DATA}")?;
    }
    for c in counts {
        writeln!(out, "  {}: {}", c.value, c.count)?;
    }
    Ok(())
}

fn write_footer<W: Write>(out: &mut W, section: &str, elapsed: Duration) -> Result<()> {
    debug!(section, elapsed_us = elapsed.as_micros() as u64, "Statistics computed");
    writeln!(out, "\nThis took {} seconds.", elapsed.as_secs_f64())?;
    writeln!(out, "{}", "-".repeat(SEPARATOR_WIDTH))?;
    Ok(())
}
