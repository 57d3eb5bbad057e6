//! Route geometries returned by a directions oracle.

use geo::Coord;

use crate::geodesy::coords_close;

/// Degrees within which a route endpoint counts as the start coordinate.
pub(crate) const ENDPOINT_EPSILON: f64 = 1e-9;

/// A path returned by a directions oracle together with its length.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use runtracer_core::RouteCandidate;
///
/// let start = Coord { x: -71.1062, y: 42.4184 };
/// let route = RouteCandidate::new(vec![start, Coord { x: -71.1, y: 42.42 }, start], 0.8);
/// assert!(route.is_closed_at(start));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteCandidate {
    /// Ordered path vertices.
    pub geometry: Vec<Coord<f64>>,
    /// Length of the path as reported by the oracle, in miles.
    pub distance_miles: f64,
}

impl RouteCandidate {
    /// Construct a candidate from a geometry and its length in miles.
    #[must_use]
    pub const fn new(geometry: Vec<Coord<f64>>, distance_miles: f64) -> Self {
        Self {
            geometry,
            distance_miles,
        }
    }

    /// Whether the geometry begins and ends at `start`.
    #[must_use]
    pub fn is_closed_at(&self, start: Coord<f64>) -> bool {
        match (self.geometry.first(), self.geometry.last()) {
            (Some(first), Some(last)) => {
                coords_close(*first, start, ENDPOINT_EPSILON)
                    && coords_close(*last, start, ENDPOINT_EPSILON)
            }
            _ => false,
        }
    }

    /// Pin both ends of the geometry to `start`.
    ///
    /// Oracles snap waypoints to the nearest walkable way, so the returned
    /// path usually starts a few meters away from the requested point. The
    /// exact start is prepended and appended when the endpoints differ.
    #[must_use]
    pub fn closed_at(mut self, start: Coord<f64>) -> Self {
        let first_matches = self
            .geometry
            .first()
            .is_some_and(|first| coords_close(*first, start, ENDPOINT_EPSILON));
        if !first_matches {
            self.geometry.insert(0, start);
        }
        let last_matches = self
            .geometry
            .last()
            .is_some_and(|last| coords_close(*last, start, ENDPOINT_EPSILON));
        if !last_matches || self.geometry.len() == 1 {
            self.geometry.push(start);
        }
        self
    }
}

/// How a search result was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RouteKind {
    /// A closed loop whose length is inside the tolerance band.
    Loop,
    /// A best-effort out-and-back route produced after the loop search gave
    /// up. Its length is not guaranteed to be within tolerance.
    OutAndBack,
}
