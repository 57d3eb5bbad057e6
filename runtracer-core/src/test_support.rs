//! Test doubles for the directions oracle and the search clock.
//!
//! [`ScriptedOracle`] replays a queue of canned replies and records every
//! request, so tests can check both the outcome of a search and the radius
//! it used on each attempt. [`ManualClock`] only moves when told to.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use geo::Coord;

use crate::{Clock, OracleError, RouteCandidate, RouteOracle};

/// Clock that advances only through [`ManualClock::advance`].
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    /// Create a clock frozen at the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    /// Move the clock forward by `step`.
    pub fn advance(&self, step: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += step;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// One canned oracle reply.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Return this exact candidate.
    Route(RouteCandidate),
    /// Return the requested coordinates as the geometry with this length.
    Miles(f64),
    /// Report that no route exists.
    NoRoute,
    /// Fail with this error.
    Error(OracleError),
}

impl Reply {
    fn resolve(self, waypoints: &[Coord<f64>]) -> Result<Option<RouteCandidate>, OracleError> {
        match self {
            Self::Route(candidate) => Ok(Some(candidate)),
            Self::Miles(miles) => Ok(Some(RouteCandidate::new(waypoints.to_vec(), miles))),
            Self::NoRoute => Ok(None),
            Self::Error(err) => Err(err),
        }
    }
}

/// `RouteOracle` that replays scripted replies in order.
///
/// Once the script runs out, every further request receives the
/// `otherwise` reply (no route by default).
///
/// # Example
///
/// ```
/// use geo::Coord;
/// use runtracer_core::RouteOracle;
/// use runtracer_core::test_support::ScriptedOracle;
///
/// let oracle = ScriptedOracle::new().then_miles(2.1).then_no_route();
/// let waypoints = [Coord { x: 0.0, y: 0.0 }, Coord { x: 0.0, y: 0.01 }];
///
/// let runtime = tokio::runtime::Builder::new_current_thread().build()?;
/// let first = runtime.block_on(oracle.route(&waypoints))?;
/// assert_eq!(first.map(|route| route.distance_miles), Some(2.1));
/// assert_eq!(oracle.calls(), 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct ScriptedOracle {
    script: Mutex<VecDeque<Reply>>,
    otherwise: Reply,
    requests: Mutex<Vec<Vec<Coord<f64>>>>,
    tick: Option<(Arc<ManualClock>, Duration)>,
}

impl Default for ScriptedOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedOracle {
    /// Create an oracle with an empty script that finds no routes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            otherwise: Reply::NoRoute,
            requests: Mutex::new(Vec::new()),
            tick: None,
        }
    }

    /// Append a reply to the script.
    #[must_use]
    pub fn then(self, reply: Reply) -> Self {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(reply);
        self
    }

    /// Append a route with the requested geometry and the given length.
    #[must_use]
    pub fn then_miles(self, miles: f64) -> Self {
        self.then(Reply::Miles(miles))
    }

    /// Append an exact candidate.
    #[must_use]
    pub fn then_route(self, candidate: RouteCandidate) -> Self {
        self.then(Reply::Route(candidate))
    }

    /// Append a "no route" reply.
    #[must_use]
    pub fn then_no_route(self) -> Self {
        self.then(Reply::NoRoute)
    }

    /// Append an error reply.
    #[must_use]
    pub fn then_error(self, error: OracleError) -> Self {
        self.then(Reply::Error(error))
    }

    /// Reply used after the script is exhausted.
    #[must_use]
    pub fn otherwise(mut self, reply: Reply) -> Self {
        self.otherwise = reply;
        self
    }

    /// Advance `clock` by `step` on every request, simulating latency.
    #[must_use]
    pub fn advancing(mut self, clock: Arc<ManualClock>, step: Duration) -> Self {
        self.tick = Some((clock, step));
        self
    }

    /// Coordinates of every request received so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<Vec<Coord<f64>>> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of requests received so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn next_reply(&self) -> Reply {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| self.otherwise.clone())
    }
}

#[async_trait]
impl RouteOracle for ScriptedOracle {
    async fn route(
        &self,
        waypoints: &[Coord<f64>],
    ) -> Result<Option<RouteCandidate>, OracleError> {
        if waypoints.len() < 2 {
            return Err(OracleError::EmptyInput);
        }
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(waypoints.to_vec());
        if let Some((clock, step)) = &self.tick {
            clock.advance(*step);
        }
        self.next_reply().resolve(waypoints)
    }
}
