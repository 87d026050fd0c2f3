//! Coordinate conversions and great-circle math on track points.

use crate::domain::model::{LatLng, TrackPoint};

pub const EARTH_RADIUS_KM: f64 = 6378.137;

const SEMICIRCLE_TO_DEGREE: f64 = 180.0 / 2_147_483_648.0;

/// FIT files store positions as signed 32-bit semicircles.
pub fn semicircles_to_degrees(semicircles: i32) -> f64 {
    semicircles as f64 * SEMICIRCLE_TO_DEGREE
}

fn latlng_to_xyz(pos: LatLng) -> [f64; 3] {
    let rlat = pos.lat.to_radians();
    let rlng = pos.lng.to_radians();
    let coslat = rlat.cos();
    [coslat * rlng.cos(), coslat * rlng.sin(), rlat.sin()]
}

/// Great-circle distance via the chord angle of the unit-sphere vectors.
///
/// The dot product is clamped to [-1, 1] so rounding noise on (nearly)
/// coincident points cannot push `acos` out of domain.
pub fn distance_km(a: LatLng, b: LatLng) -> f64 {
    if a == b {
        return 0.0;
    }
    let xyz0 = latlng_to_xyz(a);
    let xyz1 = latlng_to_xyz(b);
    let dot: f64 = xyz0.iter().zip(xyz1.iter()).map(|(x, y)| x * y).sum();
    dot.clamp(-1.0, 1.0).acos() * EARTH_RADIUS_KM
}

/// km over seconds, as km/h. Non-positive elapsed time yields 0.0.
pub fn speed_kmh(km: f64, seconds: f64) -> f64 {
    if seconds <= 0.0 {
        return 0.0;
    }
    km / seconds * 3600.0
}

/// Travel speed between two consecutive track points.
pub fn speed_between(from: &TrackPoint, to: &TrackPoint) -> f64 {
    let km = distance_km(from.latlng(), to.latlng());
    let seconds = (to.timestamp - from.timestamp).num_seconds() as f64;
    speed_kmh(km, seconds)
}

/// Direction of travel in radians: `atan2(delta_lat, delta_lng)`.
pub fn bearing(from: LatLng, to: LatLng) -> f64 {
    (to.lat - from.lat).atan2(to.lng - from.lng)
}
