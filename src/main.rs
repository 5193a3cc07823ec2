//! CLI entry point for the bike-share statistics tool.
//!
//! Provides subcommands for analyzing one city's trips under a month/day
//! filter and for listing the configured city data files.

use anyhow::Result;
use bikeshare_stats::{
    city::City,
    config::DataConfig,
    filter::{DayFilter, MonthFilter, TripFilter},
    loader::{load_data, read_capabilities},
    output::{write_json_report, write_text_report},
    stats::build_report,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikeshare_stats")]
#[command(about = "Explore US bike-share trip data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Print trip statistics for a city, optionally filtered by month and day
    Analyze {
        /// Chicago, New York City or Washington
        #[arg(short, long)]
        city: String,

        /// January through June, or "all"
        #[arg(short, long, default_value = "all")]
        month: String,

        /// Full weekday name, or "all"
        #[arg(short, long, default_value = "all")]
        day: String,

        #[command(flatten)]
        data: DataArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// List the data file used for each city and which rider columns it has
    ListCities {
        #[command(flatten)]
        data: DataArgs,
    },
}

#[derive(clap::Args)]
struct DataArgs {
    /// Directory holding the city CSV files (overrides BIKESHARE_DATA_DIR)
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// JSON file mapping city names to CSV paths
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/bikeshare_stats.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bikeshare_stats.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            city,
            month,
            day,
            data,
            format,
        } => {
            let city: City = city.parse()?;
            let filter = TripFilter::new(month.parse::<MonthFilter>()?, day.parse::<DayFilter>()?);
            let config = data.resolve()?;

            let table = load_data(&config, city, filter.month, filter.day)?;
            if table.is_empty() {
                warn!(
                    city = %city,
                    month = %filter.month,
                    day = %filter.day,
                    "No trips match filter"
                );
            }

            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            match format {
                Format::Text => {
                    writeln!(
                        out,
                        "Bike-share statistics for {city} (month: {}, day: {})",
                        filter.month, filter.day
                    )?;
                    writeln!(out, "{}", "-".repeat(40))?;
                    write_text_report(&mut out, &table)?;
                }
                Format::Json => {
                    let report = build_report(city, &filter, &table);
                    write_json_report(&mut out, &report)?;
                }
            }
        }
        Commands::ListCities { data } => {
            let config = data.resolve()?;
            info!(data_dir = %config.data_dir().display(), "Listing city data files");

            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            for city in City::ALL {
                let path = config.path_for(city);
                if !path.exists() {
                    writeln!(out, "{city}: {} (missing)", path.display())?;
                    continue;
                }
                let caps = read_capabilities(&path)?;
                writeln!(
                    out,
                    "{city}: {} (gender: {}, birth year: {})",
                    path.display(),
                    yes_no(caps.has_gender),
                    yes_no(caps.has_birth_year)
                )?;
            }
        }
    }

    Ok(())
}

impl DataArgs {
    /// Builds the data config from env, then applies CLI overrides.
    fn resolve(self) -> Result<DataConfig> {
        let mut config = match self.data_dir {
            Some(dir) => DataConfig::new(dir),
            None => DataConfig::from_env(),
        };
        if let Some(path) = self.config {
            config = config.with_overrides_file(&path)?;
        }
        Ok(config)
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}
