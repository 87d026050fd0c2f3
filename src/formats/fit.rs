//! Garmin FIT decoding via the `fitparser` crate.

use crate::core::geo;
use crate::domain::model::TrackPoint;
use crate::formats::PointSource;
use crate::utils::error::Result;
use chrono::Utc;
use fitparser::profile::MesgNum;
use fitparser::{FitDataRecord, Value};

pub struct FitReader;

impl PointSource for FitReader {
    fn read_points(&self, data: &[u8]) -> Result<Vec<TrackPoint>> {
        let records = fitparser::from_bytes(data)?;

        let points: Vec<TrackPoint> = records.iter().filter_map(point_from_record).collect();

        tracing::debug!("Decoded {} positional records from FIT data", points.len());
        Ok(points)
    }
}

/// Extracts a track point from a `record` message. Messages of any other
/// kind, and records without a position (tunnels, cold GPS), yield None.
fn point_from_record(record: &FitDataRecord) -> Option<TrackPoint> {
    if record.kind() != MesgNum::Record {
        return None;
    }

    let mut timestamp = None;
    let mut latitude = None;
    let mut longitude = None;

    for field in record.fields() {
        match field.name() {
            "timestamp" => {
                if let Value::Timestamp(ts) = field.value() {
                    timestamp = Some(ts.with_timezone(&Utc));
                }
            }
            "position_lat" => latitude = semicircle_value(field.value()),
            "position_long" => longitude = semicircle_value(field.value()),
            _ => {}
        }
    }

    Some(TrackPoint {
        timestamp: timestamp?,
        latitude: latitude?,
        longitude: longitude?,
    })
}

fn semicircle_value(value: &Value) -> Option<f64> {
    match value {
        Value::SInt32(v) => Some(geo::semicircles_to_degrees(*v)),
        _ => None,
    }
}
