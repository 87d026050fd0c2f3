//! Strava streams JSON export parsing.
//!
//! The export is an array of stream objects; only `latlng` and `time` are
//! used. The `time` stream holds offsets in seconds from the activity start,
//! so an anchor timestamp is needed to reconstruct absolute times.

use crate::domain::model::TrackPoint;
use crate::formats::PointSource;
use crate::utils::error::{Result, TrackError};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Stream {
    #[serde(rename = "type")]
    kind: String,
    data: serde_json::Value,
}

pub struct StravaReader {
    start_time: DateTime<Utc>,
}

impl StravaReader {
    /// Defaults to the Unix epoch when no anchor is given; only the popup
    /// labels depend on absolute time.
    pub fn new(start_time: Option<DateTime<Utc>>) -> Self {
        Self {
            start_time: start_time.unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
        }
    }
}

impl PointSource for StravaReader {
    fn read_points(&self, data: &[u8]) -> Result<Vec<TrackPoint>> {
        let streams: Vec<Stream> = serde_json::from_slice(data)?;

        let mut latlngs: Option<Vec<[f64; 2]>> = None;
        let mut times: Option<Vec<i64>> = None;

        for stream in streams {
            match stream.kind.as_str() {
                "latlng" => latlngs = Some(serde_json::from_value(stream.data)?),
                "time" => times = Some(serde_json::from_value(stream.data)?),
                _ => {}
            }
        }

        let latlngs = latlngs.ok_or_else(|| TrackError::ProcessingError {
            message: "Strava export has no latlng stream".to_string(),
        })?;
        let times = times.ok_or_else(|| TrackError::ProcessingError {
            message: "Strava export has no time stream".to_string(),
        })?;

        let points = times
            .into_iter()
            .zip(latlngs)
            .map(|(offset, [lat, lng])| TrackPoint {
                timestamp: self.start_time + Duration::seconds(offset),
                latitude: lat,
                longitude: lng,
            })
            .collect::<Vec<_>>();

        tracing::debug!("Paired {} points from Strava streams", points.len());
        Ok(points)
    }
}
