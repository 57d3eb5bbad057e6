//! Directions oracle trait.

use async_trait::async_trait;
use geo::Coord;

use super::error::OracleError;
use crate::RouteCandidate;

/// Fetch the route a directions service would take through `waypoints`.
///
/// Implementers return `Ok(None)` when the service cannot find a route (an
/// empty route list, or an unroutable waypoint); the loop search reacts to
/// that by widening its radius. Transport and protocol failures are errors.
///
/// Oracles must be `Send + Sync` so a search future can move across threads.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use geo::Coord;
/// use runtracer_core::{OracleError, RouteCandidate, RouteOracle, path_length_miles};
///
/// /// Follows the waypoints in straight lines.
/// struct CrowFlies;
///
/// #[async_trait]
/// impl RouteOracle for CrowFlies {
///     async fn route(
///         &self,
///         waypoints: &[Coord<f64>],
///     ) -> Result<Option<RouteCandidate>, OracleError> {
///         if waypoints.len() < 2 {
///             return Err(OracleError::EmptyInput);
///         }
///         let miles = path_length_miles(waypoints);
///         Ok(Some(RouteCandidate::new(waypoints.to_vec(), miles)))
///     }
/// }
/// ```
#[async_trait]
pub trait RouteOracle: Send + Sync {
    /// Return the route through `waypoints` in order.
    ///
    /// Implementations must return `Err(OracleError::EmptyInput)` when fewer
    /// than two coordinates are supplied.
    async fn route(&self, waypoints: &[Coord<f64>])
    -> Result<Option<RouteCandidate>, OracleError>;
}

#[async_trait]
impl<O: RouteOracle + ?Sized> RouteOracle for &O {
    async fn route(
        &self,
        waypoints: &[Coord<f64>],
    ) -> Result<Option<RouteCandidate>, OracleError> {
        (**self).route(waypoints).await
    }
}

#[async_trait]
impl<O: RouteOracle + ?Sized> RouteOracle for Box<O> {
    async fn route(
        &self,
        waypoints: &[Coord<f64>],
    ) -> Result<Option<RouteCandidate>, OracleError> {
        (**self).route(waypoints).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    use crate::test_support::ScriptedOracle;

    fn sample_waypoints() -> Vec<Coord<f64>> {
        vec![Coord { x: 0.0, y: 0.0 }, Coord { x: 0.01, y: 0.01 }]
    }

    #[rstest]
    #[tokio::test]
    async fn boxed_oracle_delegates() {
        let oracle: Box<dyn RouteOracle> =
            Box::new(ScriptedOracle::new().then_route(RouteCandidate::new(sample_waypoints(), 1.0)));
        let route = oracle
            .route(&sample_waypoints())
            .await
            .expect("scripted route");
        assert_eq!(route.map(|r| r.distance_miles), Some(1.0));
    }

    #[rstest]
    #[tokio::test]
    async fn errors_on_single_coordinate() {
        let oracle = ScriptedOracle::new();
        let err = oracle
            .route(&[Coord { x: 0.0, y: 0.0 }])
            .await
            .expect_err("one coordinate is not a route");
        assert_eq!(err, OracleError::EmptyInput);
    }
}
