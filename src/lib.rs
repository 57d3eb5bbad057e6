//! Facade crate for the RunTracer route engine.
//!
//! This crate re-exports the core domain types and exposes the HTTP
//! directions oracle behind a feature flag.

#![forbid(unsafe_code)]

pub use runtracer_core::{
    Activity, ActivityDraft, ActivityError, Attempt, AttemptOutcome, ClickAction, Clock,
    ConfigError, CoordinateError, DraftUpdate, Friendship, FriendshipError, FriendshipStatus,
    Friendships, LoopRouteFinder, MAX_WAYPOINT_COUNT, METERS_PER_MILE, Mode, OracleError,
    RouteCandidate, RouteDraft, RouteKind, RouteOracle, SearchConfig, SearchError,
    SearchGeneration, SearchOutcome, SearchTicket, SystemClock, WeeklyTotal, distance_miles, feed,
    path_length_miles, total_miles, weekly_totals,
};

#[cfg(feature = "http")]
pub use runtracer_data::{HttpRouteOracle, HttpRouteOracleConfig, ProviderBuildError};
