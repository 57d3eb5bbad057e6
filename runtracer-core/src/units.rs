//! Distance unit conversions.
//!
//! Directions services report meters; everything user-facing in RunTracer is
//! in statute miles.

/// Meters in one statute mile, as used for all tolerance comparisons.
pub const METERS_PER_MILE: f64 = 1609.34;

/// Convert meters to miles.
///
/// # Examples
/// ```
/// use runtracer_core::meters_to_miles;
///
/// assert!((meters_to_miles(1609.34) - 1.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn meters_to_miles(meters: f64) -> f64 {
    meters / METERS_PER_MILE
}

/// Convert miles to meters.
#[must_use]
pub fn miles_to_meters(miles: f64) -> f64 {
    miles * METERS_PER_MILE
}
