//! Stop detection and route simplification over smoothed track points.

use crate::core::geo;
use crate::domain::model::{AnalysisSettings, LatLng, StopPoint, TrackPoint};

/// Bearing change (radians) below which a point adds nothing to the route.
const ROUTE_BEARING_EPS: f64 = 0.1;

/// Walk the smoothed track once, collecting stop intervals and a simplified
/// route polyline.
///
/// A point slower than `min_speed_kmh` relative to its predecessor opens a
/// stop (or extends the open one); a fast point closes it. A stop still open
/// when the track ends is the end of the ride, not a rest, and is discarded.
/// Stops shorter than `min_stop_minutes` are kept here; the renderers filter.
pub fn detect(
    points: &[TrackPoint],
    settings: &AnalysisSettings,
) -> (Vec<StopPoint>, Vec<LatLng>) {
    let mut stops: Vec<StopPoint> = Vec::new();
    let mut open_stop: Option<StopPoint> = None;
    let mut prev_point: Option<&TrackPoint> = None;
    let mut route: Vec<LatLng> = Vec::new();
    let mut prev_bearing: f64 = 0.0;

    for point in points {
        if let Some(prev) = prev_point {
            let speed = geo::speed_between(prev, point);

            if speed < settings.min_speed_kmh {
                match open_stop.as_mut() {
                    Some(stop) => stop.end_time = point.timestamp,
                    None => {
                        open_stop = Some(StopPoint {
                            latitude: point.latitude,
                            longitude: point.longitude,
                            start_time: point.timestamp,
                            end_time: point.timestamp,
                        });
                    }
                }
            } else if let Some(stop) = open_stop.take() {
                tracing::debug!(
                    "Stop closed at ({:.5}, {:.5}) after {}",
                    stop.latitude,
                    stop.longitude,
                    stop.elapsed_label()
                );
                stops.push(stop);
            }

            let bearing = geo::bearing(prev.latlng(), point.latlng());
            if (bearing - prev_bearing).abs() >= ROUTE_BEARING_EPS {
                route.push(point.latlng());
            }
            prev_bearing = bearing;
        } else {
            route.push(point.latlng());
        }

        prev_point = Some(point);
    }

    (stops, route)
}
