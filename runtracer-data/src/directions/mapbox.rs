//! Mapbox Directions API response types.
//!
//! Only the fields the loop search needs are decoded: the status code, the
//! route length in meters, and the GeoJSON line geometry.
//!
//! See: <https://docs.mapbox.com/api/navigation/directions/#directions-response-object>

use geo::Coord;
use serde::Deserialize;

/// Status codes meaning "no route", as opposed to a failed request.
const NO_ROUTE_CODES: [&str; 2] = ["NoRoute", "NoSegment"];

/// Directions API response.
#[derive(Debug, Deserialize)]
pub struct DirectionsResponse {
    /// Status code from the service.
    ///
    /// Common values:
    /// - `"Ok"` - Request was successful
    /// - `"NoRoute"` - No route between the coordinates
    /// - `"NoSegment"` - A coordinate could not be snapped to the network
    /// - `"InvalidInput"` - Malformed request
    pub code: String,

    /// Optional error message when `code` is not `"Ok"`.
    pub message: Option<String>,

    /// Alternative routes, best first.
    pub routes: Option<Vec<DirectionsRoute>>,
}

impl DirectionsResponse {
    /// Check if the response indicates success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.code == "Ok"
    }

    /// Check if the service reported that no route exists.
    #[must_use]
    pub fn is_no_route(&self) -> bool {
        NO_ROUTE_CODES.contains(&self.code.as_str())
    }
}

/// Body of a non-success HTTP response.
///
/// Authorisation failures carry only a `message`; routing failures also
/// carry a `code`.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    /// Status code, when the service supplied one.
    pub code: Option<String>,
    /// Human-readable description.
    pub message: Option<String>,
}

impl ErrorBody {
    /// Check if the service reported that no route exists.
    #[must_use]
    pub fn is_no_route(&self) -> bool {
        self.code
            .as_deref()
            .is_some_and(|code| NO_ROUTE_CODES.contains(&code))
    }
}

/// A single route in a [`DirectionsResponse`].
#[derive(Debug, Deserialize)]
pub struct DirectionsRoute {
    /// Route length in meters.
    pub distance: f64,
    /// Route line, requested with `geometries=geojson`.
    pub geometry: LineGeometry,
}

/// GeoJSON `LineString` geometry.
#[derive(Debug, Deserialize)]
pub struct LineGeometry {
    /// `[lng, lat]` vertices in order.
    pub coordinates: Vec<[f64; 2]>,
}

impl LineGeometry {
    /// Convert the vertices to [`Coord`]s.
    pub fn to_coords(&self) -> Vec<Coord<f64>> {
        self.coordinates
            .iter()
            .map(|&[x, y]| Coord { x, y })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialise_success_response() {
        let json = r#"{
            "code": "Ok",
            "routes": [{
                "distance": 4828.02,
                "duration": 3480.1,
                "geometry": {"type": "LineString", "coordinates": [[-71.1, 42.4], [-71.2, 42.5]]}
            }],
            "waypoints": []
        }"#;

        let response: DirectionsResponse = serde_json::from_str(json).expect("should deserialise");

        assert!(response.is_ok());
        let routes = response.routes.expect("should have routes");
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].distance, 4828.02);
        assert_eq!(
            routes[0].geometry.to_coords(),
            vec![Coord { x: -71.1, y: 42.4 }, Coord { x: -71.2, y: 42.5 }]
        );
    }

    #[test]
    fn deserialise_no_route_response() {
        let json = r#"{"code": "NoRoute", "message": "No route found"}"#;

        let response: DirectionsResponse = serde_json::from_str(json).expect("should deserialise");

        assert!(!response.is_ok());
        assert!(response.is_no_route());
        assert!(response.routes.is_none());
    }

    #[test]
    fn deserialise_error_response() {
        let json = r#"{"code": "InvalidInput", "message": "Coordinate is invalid"}"#;

        let response: DirectionsResponse = serde_json::from_str(json).expect("should deserialise");

        assert!(!response.is_no_route());
        assert_eq!(response.message.as_deref(), Some("Coordinate is invalid"));
    }

    #[test]
    fn deserialise_error_body_without_code() {
        let json = r#"{"message": "Not Authorized - Invalid Token"}"#;

        let body: ErrorBody = serde_json::from_str(json).expect("should deserialise");

        assert!(body.code.is_none());
        assert!(!body.is_no_route());
    }
}
