//! Adapters between the RunTracer core and external services.
//!
//! Responsibilities:
//! - Implement [`runtracer_core::RouteOracle`] over HTTP directions APIs.
//! - Translate wire formats and transport failures into core types.
//!
//! Boundaries:
//! - Do not encode search rules (live in `runtracer-core`).
//! - Keep blocking I/O off async executors; use async-capable clients.
//!
//! Invariants:
//! - Access tokens never appear in logs or error messages.
//! - No global mutable state.

pub mod directions;

pub use directions::{
    DEFAULT_BASE_URL, DEFAULT_PROFILE, DEFAULT_USER_AGENT, HttpRouteOracle, HttpRouteOracleConfig,
    ProviderBuildError,
};
