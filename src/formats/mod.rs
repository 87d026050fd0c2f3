//! Point sources: decoders turning raw recording bytes into track points.

pub mod fit;
pub mod strava;

use crate::domain::model::{TrackFormat, TrackPoint};
use crate::utils::error::Result;
use chrono::{DateTime, Utc};

pub trait PointSource: Send + Sync {
    fn read_points(&self, data: &[u8]) -> Result<Vec<TrackPoint>>;
}

pub fn source_for(
    format: TrackFormat,
    start_time: Option<DateTime<Utc>>,
) -> Box<dyn PointSource> {
    match format {
        TrackFormat::Fit => Box::new(fit::FitReader),
        TrackFormat::Strava => Box::new(strava::StravaReader::new(start_time)),
    }
}
