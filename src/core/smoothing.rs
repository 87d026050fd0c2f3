//! Window-average smoothing of raw GPS fixes.
//!
//! Consumer devices emit a fix every second or so with visible jitter.
//! Averaging every fix inside a fixed time window flattens the jitter while
//! keeping the track shape; the averaged point carries the timestamp of the
//! first fix in its window.

use crate::domain::model::TrackPoint;
use chrono::Duration;

pub fn smooth(points: &[TrackPoint], interval_secs: i64) -> Vec<TrackPoint> {
    let interval = Duration::seconds(interval_secs.max(1));
    let mut smoothed = Vec::new();
    let mut window: Vec<&TrackPoint> = Vec::new();

    for point in points {
        if window.is_empty() || (point.timestamp - window[0].timestamp) < interval {
            window.push(point);
        } else {
            smoothed.push(average(&window));
            window.clear();
            window.push(point);
        }
    }

    if !window.is_empty() {
        smoothed.push(average(&window));
    }

    smoothed
}

fn average(window: &[&TrackPoint]) -> TrackPoint {
    let n = window.len() as f64;
    TrackPoint {
        timestamp: window[0].timestamp,
        latitude: window.iter().map(|p| p.latitude).sum::<f64>() / n,
        longitude: window.iter().map(|p| p.longitude).sum::<f64>() / n,
    }
}
