//! Core domain types for the RunTracer route engine.
//!
//! The centrepiece is [`LoopRouteFinder`], which turns a start coordinate and
//! a target distance into a loop route by repeatedly asking a
//! [`RouteOracle`] for directions through generated waypoints. The
//! surrounding modules hold the pieces a map client needs around that search:
//! distance measurement, working-route drafts, search generations, activity
//! summaries, and friendships with their activity feed.
//!
//! Coordinates use [`geo::Coord`] with `x` as longitude and `y` as latitude
//! (WGS84 degrees).

#![forbid(unsafe_code)]

pub mod activity;
pub mod clock;
pub mod config;
pub mod draft;
pub mod friendship;
pub mod generation;
pub mod geodesy;
pub mod oracle;
pub mod route;
pub mod search;
#[doc(hidden)]
pub mod test_support;
pub mod units;
pub mod waypoints;

pub use activity::{
    Activity, ActivityDraft, ActivityError, WeeklyTotal, feed, total_miles, weekly_totals,
};
pub use clock::{Clock, SystemClock};
pub use config::{ConfigError, MAX_WAYPOINT_COUNT, SearchConfig};
pub use draft::{ClickAction, DraftUpdate, Mode, RouteDraft};
pub use friendship::{Friendship, FriendshipError, FriendshipStatus, Friendships};
pub use generation::{SearchGeneration, SearchTicket};
pub use geodesy::{
    CoordinateError, destination, distance_miles, path_length_miles, validate_coordinate,
};
pub use oracle::{OracleError, RouteOracle};
pub use route::{RouteCandidate, RouteKind};
pub use search::{
    Attempt, AttemptOutcome, LoopRouteFinder, SearchError, SearchOutcome, SearchState,
};
pub use units::{METERS_PER_MILE, meters_to_miles, miles_to_meters};
