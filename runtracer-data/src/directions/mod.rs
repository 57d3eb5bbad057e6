//! HTTP directions oracle for loop route search.
//!
//! This module provides [`HttpRouteOracle`], an implementation of
//! [`runtracer_core::RouteOracle`] backed by the Mapbox Directions API (or
//! any service speaking the same `directions/v5` protocol).
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use geo::Coord;
//! use runtracer_core::LoopRouteFinder;
//! use runtracer_data::directions::{HttpRouteOracle, HttpRouteOracleConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HttpRouteOracleConfig::new("https://api.mapbox.com")
//!     .with_access_token("pk.example")
//!     .with_timeout(Duration::from_secs(10));
//! let finder = LoopRouteFinder::new(HttpRouteOracle::with_config(config)?);
//!
//! let start = Coord { x: -71.1062, y: 42.4184 };
//! let outcome = finder.search_with_entropy(start, 3.0).await?;
//! println!("{:.2} mi {:?}", outcome.route.distance_miles, outcome.kind);
//! # Ok(())
//! # }
//! ```

mod mapbox;
mod provider;

pub use provider::{
    DEFAULT_BASE_URL, DEFAULT_PROFILE, DEFAULT_USER_AGENT, HttpRouteOracle, HttpRouteOracleConfig,
    ProviderBuildError,
};
