//! Ask a directions service for a route through waypoints.
//!
//! The [`RouteOracle`] trait abstracts the external directions API. Callers
//! supply an ordered slice of coordinates and receive the route the service
//! would follow through them, or `None` when it cannot connect them.
//!
//! Errors cover transport and protocol failures; "no route" is not an error.

mod error;
mod provider;

pub use error::OracleError;
pub use provider::RouteOracle;
