use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// A single GPS fix from a recording.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
}

impl TrackPoint {
    pub fn latlng(&self) -> LatLng {
        LatLng {
            lat: self.latitude,
            lng: self.longitude,
        }
    }
}

/// A route vertex without time information.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// An interval during which the rider was not moving.
///
/// Coordinates are those of the first slow point; `end_time` advances as long
/// as consecutive points stay below the speed threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl StopPoint {
    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }

    /// Stop length in whole minutes, rounded half up.
    pub fn elapsed_minutes(&self) -> i64 {
        (self.duration().num_seconds() as f64 / 60.0 + 0.5) as i64
    }

    /// Human label for the popup: "1h 5m" above an hour, "12m" below.
    pub fn elapsed_label(&self) -> String {
        let minutes = self.elapsed_minutes();
        if minutes >= 60 {
            format!("{}h {}m", minutes / 60, minutes % 60)
        } else {
            format!("{}m", minutes)
        }
    }
}

/// Supported input recordings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackFormat {
    /// Garmin FIT binary file.
    Fit,
    /// Strava streams JSON export.
    Strava,
}

impl TrackFormat {
    /// Guess the format from the file extension.
    pub fn from_path(path: &str) -> Option<Self> {
        let ext = Path::new(path).extension().and_then(|e| e.to_str())?;
        match ext.to_ascii_lowercase().as_str() {
            "fit" => Some(TrackFormat::Fit),
            "json" => Some(TrackFormat::Strava),
            _ => None,
        }
    }
}

impl FromStr for TrackFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fit" => Ok(TrackFormat::Fit),
            "strava" => Ok(TrackFormat::Strava),
            other => Err(format!("unknown track format: {}", other)),
        }
    }
}

impl fmt::Display for TrackFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackFormat::Fit => write!(f, "fit"),
            TrackFormat::Strava => write!(f, "strava"),
        }
    }
}

/// Tunable thresholds for the transform phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSettings {
    /// Below this point-to-point speed the rider counts as stopped.
    pub min_speed_kmh: f64,
    /// Stops shorter than this are not rendered or reported.
    pub min_stop_minutes: i64,
    /// Raw points are averaged over windows of this length.
    pub smoothing_interval_secs: i64,
    /// Display offset applied to stop times in the map popups.
    pub utc_offset_hours: i64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            min_speed_kmh: 5.0,
            min_stop_minutes: 5,
            smoothing_interval_secs: 10,
            utc_offset_hours: 2,
        }
    }
}

/// Output of the transform phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub stops: Vec<StopPoint>,
    pub route: Vec<LatLng>,
    pub raw_point_count: usize,
    pub smoothed_point_count: usize,
}
