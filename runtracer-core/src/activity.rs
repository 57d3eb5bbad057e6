//! Recorded activities and their weekly distance totals.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use geo::Coord;
use thiserror::Error;

use crate::geodesy::path_length_miles;

/// Activity kind recorded when the user leaves the field blank.
pub const DEFAULT_ACTIVITY_KIND: &str = "run";

/// Errors returned when building an [`ActivityDraft`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActivityError {
    /// A route needs at least a start and an end.
    #[error("an activity needs at least two points, got {0}")]
    TooFewPoints(usize),
}

/// An activity ready to be submitted for storage.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActivityDraft {
    /// Free-form kind such as `"run"`, `"walk"` or `"bike"`.
    pub kind: String,
    /// Route vertices in order.
    pub points: Vec<Coord<f64>>,
    /// Great-circle length of `points`, in miles.
    pub distance_miles: f64,
    /// First point of the route.
    pub start: Coord<f64>,
}

impl ActivityDraft {
    /// Build a draft from route points and a user-entered kind.
    ///
    /// A blank kind becomes [`DEFAULT_ACTIVITY_KIND`].
    ///
    /// # Errors
    ///
    /// Returns [`ActivityError::TooFewPoints`] for fewer than two points.
    ///
    /// # Examples
    /// ```
    /// use geo::Coord;
    /// use runtracer_core::ActivityDraft;
    ///
    /// let points = vec![Coord { x: -71.1062, y: 42.4184 }, Coord { x: -71.1, y: 42.42 }];
    /// let draft = ActivityDraft::from_points(points, "  ")?;
    /// assert_eq!(draft.kind, "run");
    /// # Ok::<(), runtracer_core::ActivityError>(())
    /// ```
    pub fn from_points(points: Vec<Coord<f64>>, kind: &str) -> Result<Self, ActivityError> {
        let (Some(&start), true) = (points.first(), points.len() >= 2) else {
            return Err(ActivityError::TooFewPoints(points.len()));
        };
        let trimmed = kind.trim();
        let kind = if trimmed.is_empty() {
            DEFAULT_ACTIVITY_KIND
        } else {
            trimmed
        };
        Ok(Self {
            kind: kind.to_owned(),
            distance_miles: path_length_miles(&points),
            points,
            start,
        })
    }

    /// Attach storage metadata, producing a stored [`Activity`].
    #[must_use]
    pub fn into_activity(self, id: u64, user_id: impl Into<String>, time: DateTime<Utc>) -> Activity {
        Activity {
            id,
            time,
            kind: self.kind,
            points: self.points,
            distance_miles: self.distance_miles,
            start: self.start,
            user_id: user_id.into(),
        }
    }
}

/// A stored activity.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Activity {
    /// Storage identifier.
    pub id: u64,
    /// When the activity was recorded.
    pub time: DateTime<Utc>,
    /// Free-form kind.
    pub kind: String,
    /// Route vertices in order.
    pub points: Vec<Coord<f64>>,
    /// Route length in miles.
    pub distance_miles: f64,
    /// First point of the route.
    pub start: Coord<f64>,
    /// Owner's identity-provider user id.
    pub user_id: String,
}

/// Total distance of every activity owned by `user_id`, in miles.
#[must_use]
pub fn total_miles(activities: &[Activity], user_id: &str) -> f64 {
    activities
        .iter()
        .filter(|activity| activity.user_id == user_id)
        .map(|activity| activity.distance_miles)
        .sum()
}

/// Activities owned by any of `user_ids`, newest first.
///
/// Activities recorded at the same instant keep their input order.
///
/// # Examples
/// ```
/// use runtracer_core::{Friendships, feed};
///
/// let friends = Friendships::new();
/// assert!(feed(&[], &friends.friends_of("ana")).is_empty());
/// ```
#[must_use]
pub fn feed<'a>(activities: &'a [Activity], user_ids: &[&str]) -> Vec<&'a Activity> {
    let mut entries: Vec<&Activity> = activities
        .iter()
        .filter(|activity| user_ids.contains(&activity.user_id.as_str()))
        .collect();
    entries.sort_by(|a, b| b.time.cmp(&a.time));
    entries
}

/// Distance covered in one seven-day bucket.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeeklyTotal {
    /// Calendar day (UTC) on which the bucket starts.
    pub week_start: NaiveDate,
    /// Sum of activity distances in the bucket, in miles.
    pub distance_miles: f64,
}

/// Bucket activity distances into the `weeks` seven-day periods ending at
/// `now`, oldest first.
///
/// The window opens exactly `weeks * 7` days before `now`. Activities before
/// the window, or at/after `now`, are ignored. Every bucket is present even
/// when empty.
#[must_use]
pub fn weekly_totals(activities: &[Activity], now: DateTime<Utc>, weeks: u32) -> Vec<WeeklyTotal> {
    let window_start = now - Duration::weeks(i64::from(weeks));
    let mut totals: Vec<WeeklyTotal> = (0..weeks)
        .map(|week| WeeklyTotal {
            week_start: (window_start + Duration::weeks(i64::from(week))).date_naive(),
            distance_miles: 0.0,
        })
        .collect();

    for activity in activities {
        if activity.time < window_start {
            continue;
        }
        let Ok(index) = usize::try_from((activity.time - window_start).num_days() / 7) else {
            continue;
        };
        if let Some(bucket) = totals.get_mut(index) {
            bucket.distance_miles += activity.distance_miles;
        }
    }
    totals
}
