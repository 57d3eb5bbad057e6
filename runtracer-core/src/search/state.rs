//! Mutable state of one loop search.

use std::f64::consts::TAU;
use std::time::Instant;

use crate::SearchConfig;

use super::AttemptOutcome;

/// Radius, attempt count, and start time of a single search call.
///
/// The state lives only for the duration of one
/// [`LoopRouteFinder::search`](crate::LoopRouteFinder::search) call.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    radius_miles: f64,
    attempts: u32,
    started_at: Instant,
}

impl SearchState {
    /// Start a search for `target_miles`.
    ///
    /// The first radius is that of a circle whose circumference equals the
    /// target.
    ///
    /// # Examples
    /// ```
    /// use std::time::Instant;
    /// use runtracer_core::search::SearchState;
    ///
    /// let state = SearchState::new(3.0, Instant::now());
    /// assert!((state.radius_miles() - 0.477_464_829).abs() < 1e-6);
    /// ```
    #[must_use]
    pub fn new(target_miles: f64, started_at: Instant) -> Self {
        Self {
            radius_miles: target_miles / TAU,
            attempts: 0,
            started_at,
        }
    }

    /// Radius for the next attempt.
    #[must_use]
    pub const fn radius_miles(&self) -> f64 {
        self.radius_miles
    }

    /// Attempts made so far.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    /// When the search began.
    #[must_use]
    pub const fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Whether another attempt fits in the budget at `now`.
    #[must_use]
    pub fn has_budget(&self, now: Instant, config: &SearchConfig) -> bool {
        self.attempts < config.max_attempts
            && now.saturating_duration_since(self.started_at) < config.timeout
    }

    /// Count an attempt and derive the next radius from its outcome.
    ///
    /// Undershoots grow the radius, overshoots shrink it, and attempts that
    /// produced no usable route widen it. An accepted attempt leaves the
    /// radius unchanged.
    pub fn record(&mut self, outcome: &AttemptOutcome, config: &SearchConfig) {
        self.attempts = self.attempts.saturating_add(1);
        let factor = match outcome {
            AttemptOutcome::NoRoute | AttemptOutcome::OracleFailed(_) => config.no_route_growth,
            AttemptOutcome::Undershoot { .. } => config.undershoot_growth,
            AttemptOutcome::Overshoot { .. } => config.overshoot_shrink,
            AttemptOutcome::Accepted { .. } => 1.0,
        };
        self.radius_miles *= factor;
    }
}
