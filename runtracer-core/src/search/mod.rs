//! Loop route search.
//!
//! [`LoopRouteFinder`] converts a start coordinate and a target distance into
//! a route whose length lies within a tolerance band of the target. The only
//! lever it has is waypoint placement: it places a ring of waypoints around
//! the start, asks the [`RouteOracle`] for a loop through them, and grows or
//! shrinks the ring depending on how far the returned length missed.
//!
//! The search is sequential: each radius depends on the previous attempt's
//! measured length. It stops at the first accepted loop, at the attempt cap,
//! or once the soft deadline has passed (checked between attempts, so an
//! in-flight request is allowed to finish). When no loop is accepted it falls
//! back to a single out-and-back request and returns whatever that yields.

mod state;

use std::time::Duration;

use geo::Coord;
use log::{debug, info, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use crate::geodesy::{CoordinateError, validate_coordinate};
use crate::waypoints::{loop_request, out_and_back_request, random_bearing, random_rotation, ring};
use crate::{
    Clock, ConfigError, OracleError, RouteCandidate, RouteKind, RouteOracle, SearchConfig,
    SystemClock,
};

pub use state::SearchState;

/// What the oracle's answer to one loop attempt meant for the search.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    /// The oracle found no route through the waypoints.
    NoRoute,
    /// The oracle request failed; treated like a missing route.
    OracleFailed(OracleError),
    /// The route was shorter than the band.
    Undershoot {
        /// Returned length in miles.
        miles: f64,
    },
    /// The route was longer than the band.
    Overshoot {
        /// Returned length in miles.
        miles: f64,
    },
    /// The route fell within the band.
    Accepted {
        /// Returned length in miles.
        miles: f64,
    },
}

/// Record of a single loop attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct Attempt {
    /// Ring radius used for this attempt, in miles.
    pub radius_miles: f64,
    /// Rotation applied to the waypoint ring, in degrees.
    pub rotation_deg: f64,
    /// How the oracle's answer was classified.
    pub outcome: AttemptOutcome,
}

/// Successful result of [`LoopRouteFinder::search`].
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// Route geometry and length, with both ends pinned to the start.
    pub route: RouteCandidate,
    /// Whether the route is an accepted loop or the out-and-back fallback.
    pub kind: RouteKind,
    /// Every loop attempt made, in order. The fallback request is not listed.
    pub attempts: Vec<Attempt>,
    /// Time spent searching, as measured by the finder's clock.
    pub elapsed: Duration,
}

/// Errors returned by [`LoopRouteFinder::search`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    /// The target distance was not a positive finite number of miles.
    #[error("target distance {0} must be a positive number of miles")]
    InvalidTarget(f64),
    /// The start coordinate was malformed.
    #[error("invalid start coordinate: {0}")]
    InvalidStart(#[from] CoordinateError),
    /// Neither a loop nor the out-and-back fallback produced a route.
    #[error("no route found after {attempts} loop attempts and an out-and-back fallback")]
    NoRouteFound {
        /// Loop attempts made before falling back.
        attempts: u32,
    },
    /// The out-and-back fallback request failed.
    #[error("out-and-back fallback failed after {attempts} loop attempts: {source}")]
    Oracle {
        /// Loop attempts made before falling back.
        attempts: u32,
        /// Failure reported by the oracle.
        #[source]
        source: OracleError,
    },
}

/// Loop route search over a directions oracle.
///
/// The finder is generic over the oracle and the clock so tests can drive it
/// with scripted replies and a manual deadline. Randomness is passed per
/// call: seed it for reproducible waypoint rings, or use
/// [`LoopRouteFinder::search_with_entropy`].
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use runtracer_core::{LoopRouteFinder, RouteKind};
/// use runtracer_core::test_support::ScriptedOracle;
///
/// let oracle = ScriptedOracle::new().then_miles(2.1).then_miles(3.2);
/// let finder = LoopRouteFinder::new(oracle);
/// let start = Coord { x: -71.1062, y: 42.4184 };
/// let mut rng = ChaCha8Rng::seed_from_u64(1);
///
/// let runtime = tokio::runtime::Builder::new_current_thread().build()?;
/// let outcome = runtime.block_on(finder.search(start, 3.0, &mut rng))?;
/// assert_eq!(outcome.kind, RouteKind::Loop);
/// assert_eq!(outcome.attempts.len(), 2);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct LoopRouteFinder<O, C = SystemClock> {
    oracle: O,
    clock: C,
    config: SearchConfig,
}

impl<O: RouteOracle> LoopRouteFinder<O, SystemClock> {
    /// Construct a finder with the default configuration and wall clock.
    pub fn new(oracle: O) -> Self {
        Self {
            oracle,
            clock: SystemClock,
            config: SearchConfig::default(),
        }
    }

    /// Construct a finder with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns the first problem reported by [`SearchConfig::validate`].
    pub fn with_config(oracle: O, config: SearchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            oracle,
            clock: SystemClock,
            config,
        })
    }
}

impl<O: RouteOracle, C: Clock> LoopRouteFinder<O, C> {
    /// Replace the clock used for the search deadline.
    pub fn with_clock<K: Clock>(self, clock: K) -> LoopRouteFinder<O, K> {
        LoopRouteFinder {
            oracle: self.oracle,
            clock,
            config: self.config,
        }
    }

    /// Active configuration.
    pub const fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Underlying oracle.
    pub const fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Search for a route of roughly `target_miles` starting and ending at
    /// `start`.
    ///
    /// Returns a [`RouteKind::Loop`] whose length lies within the tolerance
    /// band, or, once the attempt or time budget is spent, a
    /// [`RouteKind::OutAndBack`] route of whatever length the oracle
    /// returned. Oracle failures during the loop phase are absorbed.
    ///
    /// # Errors
    ///
    /// - [`SearchError::InvalidTarget`] / [`SearchError::InvalidStart`] for
    ///   bad input, before any oracle request.
    /// - [`SearchError::NoRouteFound`] when the fallback finds no route.
    /// - [`SearchError::Oracle`] when the fallback request fails.
    pub async fn search<R: Rng + ?Sized>(
        &self,
        start: Coord<f64>,
        target_miles: f64,
        rng: &mut R,
    ) -> Result<SearchOutcome, SearchError> {
        if !(target_miles.is_finite() && target_miles > 0.0) {
            return Err(SearchError::InvalidTarget(target_miles));
        }
        validate_coordinate(start)?;

        let (min, max) = self.config.band(target_miles);
        let mut state = SearchState::new(target_miles, self.clock.now());
        let mut attempts = Vec::new();

        while state.has_budget(self.clock.now(), &self.config) {
            let radius_miles = state.radius_miles();
            let rotation_deg = random_rotation(rng, self.config.max_rotation_deg);
            let waypoints = ring(start, radius_miles, self.config.waypoint_count, rotation_deg);
            let reply = self.oracle.route(&loop_request(start, &waypoints)).await;

            let (outcome, accepted) = match reply {
                Ok(Some(candidate)) => {
                    let miles = candidate.distance_miles;
                    if miles < min {
                        (AttemptOutcome::Undershoot { miles }, None)
                    } else if miles > max {
                        (AttemptOutcome::Overshoot { miles }, None)
                    } else {
                        (AttemptOutcome::Accepted { miles }, Some(candidate))
                    }
                }
                Ok(None) => (AttemptOutcome::NoRoute, None),
                Err(err) => {
                    warn!("directions request failed on attempt {}: {err}", state.attempts() + 1);
                    (AttemptOutcome::OracleFailed(err), None)
                }
            };
            debug!(
                "loop attempt {}: radius {radius_miles:.3} mi, rotation {rotation_deg:.1} deg -> {outcome:?}",
                state.attempts() + 1
            );

            state.record(&outcome, &self.config);
            attempts.push(Attempt {
                radius_miles,
                rotation_deg,
                outcome,
            });

            if let Some(candidate) = accepted {
                info!(
                    "accepted {:.2} mi loop for {target_miles:.2} mi target after {} attempts",
                    candidate.distance_miles,
                    state.attempts()
                );
                return Ok(SearchOutcome {
                    route: candidate.closed_at(start),
                    kind: RouteKind::Loop,
                    attempts,
                    elapsed: self.elapsed(&state),
                });
            }
        }

        warn!(
            "no loop within [{min:.2}, {max:.2}] mi after {} attempts; falling back to out-and-back",
            state.attempts()
        );
        let bearing = random_bearing(rng);
        match self
            .oracle
            .route(&out_and_back_request(start, bearing, target_miles))
            .await
        {
            Ok(Some(candidate)) => Ok(SearchOutcome {
                route: candidate.closed_at(start),
                kind: RouteKind::OutAndBack,
                attempts,
                elapsed: self.elapsed(&state),
            }),
            Ok(None) => Err(SearchError::NoRouteFound {
                attempts: state.attempts(),
            }),
            Err(source) => Err(SearchError::Oracle {
                attempts: state.attempts(),
                source,
            }),
        }
    }

    /// [`search`](Self::search) with a generator seeded from OS entropy, so
    /// repeated calls at the same point produce different shapes.
    ///
    /// # Errors
    ///
    /// As for [`search`](Self::search).
    pub async fn search_with_entropy(
        &self,
        start: Coord<f64>,
        target_miles: f64,
    ) -> Result<SearchOutcome, SearchError> {
        let mut rng = ChaCha8Rng::from_entropy();
        self.search(start, target_miles, &mut rng).await
    }

    fn elapsed(&self, state: &SearchState) -> Duration {
        self.clock
            .now()
            .saturating_duration_since(state.started_at())
    }
}
