use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use std::path::PathBuf;

/// CLI arguments for langmap
#[derive(Debug, Parser)]
#[command(
    name = "langmap",
    version,
    about = "Join country boundaries with country metadata and derive centroid, bbox and area"
)]
pub struct CliArgs {
    /// TOML configuration file ([sources], [resolver], [projection])
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Boundary GeoJSON: URL or local path (.geojson, .geojson.gz)
    #[arg(short = 'b', long = "boundaries", global = true)]
    pub boundaries: Option<String>,

    /// Country metadata JSON: URL or local path
    #[arg(short = 'm', long = "metadata", global = true)]
    pub metadata: Option<String>,

    /// Comma-separated CRS preference for area (e.g. EPSG:6933,ESRI:54009)
    #[arg(long = "crs", global = true)]
    pub crs: Option<String>,

    /// Minimum log level (RUST_LOG is honoured when not given)
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show match and geometry statistics for the run
    Stats,

    /// List every enriched country
    Countries,

    /// Show the full record for one country
    Country {
        /// ISO3 code or name (case- and accent-insensitive, e.g. FRA, curacao)
        query: String,
    },

    /// Write all enriched records
    Export {
        #[arg(short = 'f', long = "format", value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,

        /// Output file (stdout when omitted)
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Array of flat display views
    Json,
    /// FeatureCollection with the views as feature properties
    Geojson,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Splits the `--crs` list, dropping empty entries.
pub fn parse_crs_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|x| !x.is_empty())
        .map(str::to_string)
        .collect()
}
