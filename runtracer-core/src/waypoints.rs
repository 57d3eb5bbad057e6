//! Waypoint rings placed around a start coordinate.

use geo::Coord;
use rand::Rng;

use crate::geodesy::destination;

/// Place `count` waypoints `radius_miles` from `start`.
///
/// Bearings are evenly spaced and offset by `rotation_deg`, so waypoint `i`
/// sits at bearing `rotation_deg + i * 360 / count`.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use runtracer_core::waypoints::ring;
///
/// let start = Coord { x: -71.1062, y: 42.4184 };
/// let points = ring(start, 0.5, 6, 0.0);
/// assert_eq!(points.len(), 6);
/// ```
#[must_use]
pub fn ring(start: Coord<f64>, radius_miles: f64, count: usize, rotation_deg: f64) -> Vec<Coord<f64>> {
    let step = 360.0 / count as f64;
    (0..count)
        .map(|i| destination(start, rotation_deg + step * i as f64, radius_miles))
        .collect()
}

/// Build the coordinate sequence for a loop request:
/// `start, waypoints..., start`.
#[must_use]
pub fn loop_request(start: Coord<f64>, waypoints: &[Coord<f64>]) -> Vec<Coord<f64>> {
    let mut request = Vec::with_capacity(waypoints.len() + 2);
    request.push(start);
    request.extend_from_slice(waypoints);
    request.push(start);
    request
}

/// Build the coordinate sequence for an out-and-back request towards a point
/// `miles / 2` from `start` along `bearing_deg`.
#[must_use]
pub fn out_and_back_request(start: Coord<f64>, bearing_deg: f64, miles: f64) -> Vec<Coord<f64>> {
    let turnaround = destination(start, bearing_deg, miles / 2.0);
    vec![start, turnaround, start]
}

/// Draw a rotation uniformly from `[0, max_deg)`.
///
/// A zero bound disables rotation.
pub fn random_rotation<R: Rng + ?Sized>(rng: &mut R, max_deg: f64) -> f64 {
    if max_deg > 0.0 {
        rng.gen_range(0.0..max_deg)
    } else {
        0.0
    }
}

/// Draw a bearing uniformly from `[0, 360)`.
pub fn random_bearing<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen_range(0.0..360.0)
}
