//! Great-circle helpers over WGS84 coordinates.
//!
//! Bearings are in degrees clockwise from north. Distances use the haversine
//! model with the mean earth radius, which matches what web map clients
//! report for drawn routes.

use geo::{Coord, Destination, Distance, Haversine, Point};
use thiserror::Error;

use crate::units::{meters_to_miles, miles_to_meters};

/// Errors returned by [`validate_coordinate`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordinateError {
    /// Longitude or latitude was NaN or infinite.
    #[error("coordinate ({lng}, {lat}) is not finite")]
    NotFinite {
        /// Longitude in degrees.
        lng: f64,
        /// Latitude in degrees.
        lat: f64,
    },
    /// Longitude fell outside `[-180, 180]`.
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
    /// Latitude fell outside `[-90, 90]`.
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),
}

/// Check that `coord` is a finite WGS84 position.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use runtracer_core::{CoordinateError, validate_coordinate};
///
/// assert!(validate_coordinate(Coord { x: -71.1062, y: 42.4184 }).is_ok());
/// assert_eq!(
///     validate_coordinate(Coord { x: 0.0, y: 91.0 }),
///     Err(CoordinateError::LatitudeOutOfRange(91.0)),
/// );
/// ```
pub fn validate_coordinate(coord: Coord<f64>) -> Result<(), CoordinateError> {
    if !coord.x.is_finite() || !coord.y.is_finite() {
        return Err(CoordinateError::NotFinite {
            lng: coord.x,
            lat: coord.y,
        });
    }
    if !(-180.0..=180.0).contains(&coord.x) {
        return Err(CoordinateError::LongitudeOutOfRange(coord.x));
    }
    if !(-90.0..=90.0).contains(&coord.y) {
        return Err(CoordinateError::LatitudeOutOfRange(coord.y));
    }
    Ok(())
}

/// Return the point `miles` away from `origin` along `bearing_deg`.
#[must_use]
pub fn destination(origin: Coord<f64>, bearing_deg: f64, miles: f64) -> Coord<f64> {
    Haversine
        .destination(Point::from(origin), bearing_deg, miles_to_meters(miles))
        .into()
}

/// Great-circle distance between two coordinates, in miles.
#[must_use]
pub fn distance_miles(from: Coord<f64>, to: Coord<f64>) -> f64 {
    meters_to_miles(Haversine.distance(Point::from(from), Point::from(to)))
}

/// Sum of the great-circle lengths of consecutive legs, in miles.
///
/// Paths with fewer than two points have zero length.
#[must_use]
pub fn path_length_miles(points: &[Coord<f64>]) -> f64 {
    points
        .windows(2)
        .map(|leg| match leg {
            [from, to] => distance_miles(*from, *to),
            _ => 0.0,
        })
        .sum()
}

/// Whether two coordinates coincide within `epsilon` degrees on both axes.
#[must_use]
pub fn coords_close(a: Coord<f64>, b: Coord<f64>, epsilon: f64) -> bool {
    (a.x - b.x).abs() <= epsilon && (a.y - b.y).abs() <= epsilon
}
