//! The working route a user is building on the map.
//!
//! Points arrive from three editing modes: clicking appends single points,
//! drawing records a free-hand stroke, and route mode replaces the points
//! with a generated loop. A generated route only replaces the draft when its
//! search succeeded and is still the latest one issued.

use geo::Coord;

use crate::activity::{ActivityDraft, ActivityError};
use crate::geodesy::path_length_miles;
use crate::search::{SearchError, SearchOutcome};
use crate::{RouteKind, SearchGeneration, SearchTicket};

/// Map editing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Mode {
    /// Each click appends a point.
    #[default]
    Click,
    /// Each click starts a loop search from the clicked point.
    Route,
    /// Press-drag-release records a free-hand stroke.
    Draw,
}

/// What a click means in the current mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickAction {
    /// The point was appended to the draft.
    Appended,
    /// The caller should start a loop search from this point.
    SearchFrom(Coord<f64>),
    /// Clicks are ignored while drawing.
    Ignored,
}

/// Result of offering a search result to [`RouteDraft::apply_search`].
#[derive(Debug, Clone, PartialEq)]
pub enum DraftUpdate {
    /// The draft now holds the generated route.
    Replaced {
        /// Loop or out-and-back.
        kind: RouteKind,
        /// Length reported by the directions service, in miles.
        distance_miles: f64,
    },
    /// A newer search has started; the result was discarded.
    Stale,
    /// The search failed; the draft is unchanged.
    Failed(SearchError),
}

/// Points of the route being edited.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use runtracer_core::RouteDraft;
///
/// let mut draft = RouteDraft::new();
/// draft.click(Coord { x: -71.1062, y: 42.4184 });
/// draft.click(Coord { x: -71.1062, y: 42.4284 });
/// assert_eq!(draft.points().len(), 2);
/// assert!(draft.total_miles() > 0.68 && draft.total_miles() < 0.70);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteDraft {
    mode: Mode,
    points: Vec<Coord<f64>>,
    stroke_active: bool,
}

impl RouteDraft {
    /// Create an empty draft in click mode.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current editing mode.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Switch editing mode. Any stroke in progress ends.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.stroke_active = false;
    }

    /// Current points in order.
    #[must_use]
    pub fn points(&self) -> &[Coord<f64>] {
        &self.points
    }

    /// Handle a map click at `at`.
    pub fn click(&mut self, at: Coord<f64>) -> ClickAction {
        match self.mode {
            Mode::Click => {
                self.points.push(at);
                ClickAction::Appended
            }
            Mode::Route => ClickAction::SearchFrom(at),
            Mode::Draw => ClickAction::Ignored,
        }
    }

    /// Start a free-hand stroke at `at`, discarding the previous points.
    ///
    /// Returns `false` outside draw mode.
    pub fn begin_stroke(&mut self, at: Coord<f64>) -> bool {
        if self.mode != Mode::Draw {
            return false;
        }
        self.points.clear();
        self.points.push(at);
        self.stroke_active = true;
        true
    }

    /// Extend the active stroke. Returns `false` when no stroke is active.
    pub fn extend_stroke(&mut self, at: Coord<f64>) -> bool {
        if !self.stroke_active {
            return false;
        }
        self.points.push(at);
        true
    }

    /// Finish the active stroke.
    pub fn end_stroke(&mut self) {
        self.stroke_active = false;
    }

    /// Remove every point.
    pub fn clear(&mut self) {
        self.points.clear();
        self.stroke_active = false;
    }

    /// Length of the draft in miles.
    #[must_use]
    pub fn total_miles(&self) -> f64 {
        path_length_miles(&self.points)
    }

    /// Offer the result of the search that was issued `ticket`.
    ///
    /// The draft is only replaced when `ticket` is still current and the
    /// search succeeded. Failed or superseded searches leave the user's
    /// points untouched.
    pub fn apply_search(
        &mut self,
        ticket: SearchTicket,
        generation: &SearchGeneration,
        result: Result<SearchOutcome, SearchError>,
    ) -> DraftUpdate {
        let Some(result) = generation.settle(ticket, result) else {
            return DraftUpdate::Stale;
        };
        match result {
            Ok(outcome) => {
                let distance_miles = outcome.route.distance_miles;
                self.points = outcome.route.geometry;
                self.stroke_active = false;
                DraftUpdate::Replaced {
                    kind: outcome.kind,
                    distance_miles,
                }
            }
            Err(err) => DraftUpdate::Failed(err),
        }
    }

    /// Package the draft for submission as an activity of `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityError::TooFewPoints`] when the draft has fewer than
    /// two points.
    pub fn to_activity(&self, kind: &str) -> Result<ActivityDraft, ActivityError> {
        ActivityDraft::from_points(self.points.clone(), kind)
    }
}
