#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "lambda")]
pub mod lambda;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::domain::model::{AnalysisSettings, TrackFormat};
#[cfg(feature = "cli")]
use crate::domain::ports::ConfigProvider;
#[cfg(feature = "cli")]
use chrono::{DateTime, Utc};
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "rest-with-gps")]
#[command(about = "Find the rest stops in a GPS activity and draw them on a map")]
pub struct CliConfig {
    /// Activity file: Garmin .fit or Strava streams .json export
    pub input: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    /// Ignore stops shorter than this many minutes
    #[arg(short = 's', long, default_value_t = 5)]
    pub min_stop: i64,

    /// Speed (km/h) below which the rider counts as stopped
    #[arg(long, default_value_t = 5.0)]
    pub min_speed: f64,

    /// Smoothing window length in seconds
    #[arg(long, default_value_t = 10)]
    pub smoothing_interval: i64,

    /// Hour offset applied to stop times shown on the map
    #[arg(long, default_value_t = 2, allow_hyphen_values = true)]
    pub utc_offset: i64,

    /// Input format override: fit or strava
    #[arg(long)]
    pub format: Option<String>,

    /// RFC 3339 anchor for Strava time streams, e.g. 2023-08-20T20:30:00Z
    #[arg(long)]
    pub start_time: Option<String>,

    /// Base URL for the per-stop map links in popups
    #[arg(long, default_value = "https://maps.google.com/maps")]
    pub map_link_base: String,

    /// Also write a ZIP report (stops CSV, GeoJSON, map copy)
    #[arg(long)]
    pub bundle: bool,

    /// Load settings from a TOML file; all other flags except --verbose
    /// and --monitor are ignored when this is set
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log per-phase CPU and memory usage")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        &self.input
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn format(&self) -> Option<TrackFormat> {
        self.format.as_deref().and_then(|s| s.parse().ok())
    }

    fn settings(&self) -> AnalysisSettings {
        AnalysisSettings {
            min_speed_kmh: self.min_speed,
            min_stop_minutes: self.min_stop,
            smoothing_interval_secs: self.smoothing_interval,
            utc_offset_hours: self.utc_offset,
        }
    }

    fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    fn map_link_base(&self) -> &str {
        &self.map_link_base
    }

    fn bundle(&self) -> bool {
        self.bundle
    }
}

#[cfg(feature = "cli")]
impl crate::utils::validation::Validate for CliConfig {
    fn validate(&self) -> crate::utils::error::Result<()> {
        use crate::utils::error::TrackError;
        use crate::utils::validation::*;

        validate_path("input", &self.input)?;
        validate_path("output_path", &self.output_path)?;

        match &self.format {
            Some(format) => {
                format
                    .parse::<TrackFormat>()
                    .map_err(|reason| TrackError::InvalidConfigValueError {
                        field: "format".to_string(),
                        value: format.clone(),
                        reason,
                    })?;
            }
            None => validate_file_extension("input", &self.input, &["fit", "json"])?,
        }

        if let Some(start_time) = &self.start_time {
            DateTime::parse_from_rfc3339(start_time).map_err(|e| {
                TrackError::InvalidConfigValueError {
                    field: "start_time".to_string(),
                    value: start_time.clone(),
                    reason: format!("not an RFC 3339 timestamp: {}", e),
                }
            })?;
        }

        validate_positive_number("min_stop", self.min_stop, 1)?;
        validate_range("min_speed", self.min_speed, 0.1, 100.0)?;
        validate_range("smoothing_interval", self.smoothing_interval, 1, 600)?;
        validate_range("utc_offset", self.utc_offset, -12, 14)?;
        validate_url("map_link_base", &self.map_link_base)?;

        Ok(())
    }
}
