//! Tunables for the loop route search.

use std::time::Duration;

use thiserror::Error;

/// Default half-width of the accepted distance band, as a fraction of the
/// target.
pub const DEFAULT_TOLERANCE: f64 = 0.10;
/// Default cap on oracle requests made by the loop search.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 20;
/// Default soft deadline for the loop search.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Default number of waypoints placed around the start.
pub const DEFAULT_WAYPOINT_COUNT: usize = 6;
/// Largest ring accepted by [`SearchConfig::validate`].
///
/// A loop request carries the start twice plus every waypoint, and hosted
/// directions services accept at most 25 coordinates per request.
pub const MAX_WAYPOINT_COUNT: usize = 23;
/// Default upper bound of the random rotation applied to the waypoint ring.
pub const DEFAULT_MAX_ROTATION_DEG: f64 = 60.0;
/// Default radius growth after the oracle finds no route.
pub const DEFAULT_NO_ROUTE_GROWTH: f64 = 1.2;
/// Default radius growth after an undershoot.
pub const DEFAULT_UNDERSHOOT_GROWTH: f64 = 1.3;
/// Default radius shrink after an overshoot.
pub const DEFAULT_OVERSHOOT_SHRINK: f64 = 0.7;

/// Configuration for [`LoopRouteFinder`](crate::LoopRouteFinder).
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use runtracer_core::SearchConfig;
///
/// let config = SearchConfig::default()
///     .with_max_attempts(5)
///     .with_timeout(Duration::from_secs(3));
/// assert!(config.validate().is_ok());
/// assert_eq!(config.tolerance, 0.10);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchConfig {
    /// Accepted relative deviation from the target distance.
    pub tolerance: f64,
    /// Maximum number of loop attempts before falling back.
    pub max_attempts: u32,
    /// Soft deadline, checked between attempts.
    pub timeout: Duration,
    /// Number of waypoints in each requested loop.
    pub waypoint_count: usize,
    /// Random rotation of the waypoint ring is drawn from `[0, max)`.
    pub max_rotation_deg: f64,
    /// Radius multiplier applied when the oracle returns no route.
    pub no_route_growth: f64,
    /// Radius multiplier applied when the route is too short.
    pub undershoot_growth: f64,
    /// Radius multiplier applied when the route is too long.
    pub overshoot_shrink: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            timeout: DEFAULT_TIMEOUT,
            waypoint_count: DEFAULT_WAYPOINT_COUNT,
            max_rotation_deg: DEFAULT_MAX_ROTATION_DEG,
            no_route_growth: DEFAULT_NO_ROUTE_GROWTH,
            undershoot_growth: DEFAULT_UNDERSHOOT_GROWTH,
            overshoot_shrink: DEFAULT_OVERSHOOT_SHRINK,
        }
    }
}

/// Errors returned by [`SearchConfig::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Tolerance must lie in `(0, 1)`.
    #[error("tolerance {0} must be between 0 and 1 (exclusive)")]
    Tolerance(f64),
    /// At least one attempt is needed.
    #[error("max_attempts must be at least 1")]
    ZeroAttempts,
    /// A zero timeout would skip the loop search entirely.
    #[error("timeout must be positive")]
    ZeroTimeout,
    /// At least one waypoint is needed to form a loop.
    #[error("waypoint_count must be at least 1")]
    NoWaypoints,
    /// The ring would not fit in a single directions request.
    #[error("waypoint_count {0} exceeds the maximum of {MAX_WAYPOINT_COUNT}")]
    TooManyWaypoints(usize),
    /// Rotation bound must be finite and within a full turn.
    #[error("max_rotation_deg {0} must be within [0, 360]")]
    Rotation(f64),
    /// Growth factors must enlarge the radius.
    #[error("{name} {value} must be a finite value greater than 1")]
    Growth {
        /// Field name.
        name: &'static str,
        /// Offending value.
        value: f64,
    },
    /// The shrink factor must reduce the radius while keeping it positive.
    #[error("overshoot_shrink {0} must be between 0 and 1 (exclusive)")]
    Shrink(f64),
}

impl SearchConfig {
    /// Set the tolerance fraction.
    #[must_use]
    pub const fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the attempt cap.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the soft deadline.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the number of waypoints per loop.
    #[must_use]
    pub const fn with_waypoint_count(mut self, waypoint_count: usize) -> Self {
        self.waypoint_count = waypoint_count;
        self
    }

    /// Set the rotation bound in degrees.
    #[must_use]
    pub const fn with_max_rotation_deg(mut self, max_rotation_deg: f64) -> Self {
        self.max_rotation_deg = max_rotation_deg;
        self
    }

    /// Set the three radius multipliers at once.
    #[must_use]
    pub const fn with_multipliers(
        mut self,
        no_route_growth: f64,
        undershoot_growth: f64,
        overshoot_shrink: f64,
    ) -> Self {
        self.no_route_growth = no_route_growth;
        self.undershoot_growth = undershoot_growth;
        self.overshoot_shrink = overshoot_shrink;
        self
    }

    /// Check every field, returning the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tolerance > 0.0 && self.tolerance < 1.0) {
            return Err(ConfigError::Tolerance(self.tolerance));
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.waypoint_count == 0 {
            return Err(ConfigError::NoWaypoints);
        }
        if self.waypoint_count > MAX_WAYPOINT_COUNT {
            return Err(ConfigError::TooManyWaypoints(self.waypoint_count));
        }
        if !(0.0..=360.0).contains(&self.max_rotation_deg) {
            return Err(ConfigError::Rotation(self.max_rotation_deg));
        }
        check_growth("no_route_growth", self.no_route_growth)?;
        check_growth("undershoot_growth", self.undershoot_growth)?;
        if !(self.overshoot_shrink > 0.0 && self.overshoot_shrink < 1.0) {
            return Err(ConfigError::Shrink(self.overshoot_shrink));
        }
        Ok(())
    }

    /// Bounds of the accepted band for `target_miles`.
    #[must_use]
    pub fn band(&self, target_miles: f64) -> (f64, f64) {
        (
            target_miles * (1.0 - self.tolerance),
            target_miles * (1.0 + self.tolerance),
        )
    }
}

fn check_growth(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 1.0 {
        Ok(())
    } else {
        Err(ConfigError::Growth { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_are_valid() {
        let config = SearchConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_attempts, 20);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.waypoint_count, 6);
    }

    #[rstest]
    fn largest_ring_is_valid() {
        let config = SearchConfig::default().with_waypoint_count(MAX_WAYPOINT_COUNT);
        assert!(config.validate().is_ok());
    }

    #[rstest]
    fn band_spans_tolerance() {
        let (min, max) = SearchConfig::default().band(3.0);
        assert!((min - 2.7).abs() < 1e-12);
        assert!((max - 3.3).abs() < 1e-12);
    }

    #[rstest]
    #[case(SearchConfig::default().with_tolerance(0.0), ConfigError::Tolerance(0.0))]
    #[case(SearchConfig::default().with_tolerance(f64::NAN), ConfigError::Tolerance(f64::NAN))]
    #[case(SearchConfig::default().with_max_attempts(0), ConfigError::ZeroAttempts)]
    #[case(SearchConfig::default().with_timeout(Duration::ZERO), ConfigError::ZeroTimeout)]
    #[case(SearchConfig::default().with_waypoint_count(0), ConfigError::NoWaypoints)]
    #[case(
        SearchConfig::default().with_waypoint_count(MAX_WAYPOINT_COUNT + 1),
        ConfigError::TooManyWaypoints(24)
    )]
    #[case(SearchConfig::default().with_max_rotation_deg(-1.0), ConfigError::Rotation(-1.0))]
    #[case(
        SearchConfig::default().with_multipliers(1.0, 1.3, 0.7),
        ConfigError::Growth { name: "no_route_growth", value: 1.0 }
    )]
    #[case(SearchConfig::default().with_multipliers(1.2, 1.3, 1.0), ConfigError::Shrink(1.0))]
    fn rejects_invalid_fields(#[case] config: SearchConfig, #[case] expected: ConfigError) {
        let err = config.validate().expect_err("config should be rejected");
        // NaN never equals itself, so compare discriminants for that case.
        assert_eq!(
            std::mem::discriminant(&err),
            std::mem::discriminant(&expected),
            "expected {expected:?}, got {err:?}"
        );
    }
}
