//! Ordering of overlapping searches.
//!
//! A user can start a new search while an older one is still waiting on the
//! directions service. Each search takes a [`SearchTicket`] when it begins;
//! only the most recently issued ticket may update the displayed route, so a
//! slow stale search never overwrites a newer one.

use std::sync::atomic::{AtomicU64, Ordering};

/// Generation number handed to one search call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SearchTicket(u64);

impl SearchTicket {
    /// Raw generation number.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Monotonic counter issuing [`SearchTicket`]s.
///
/// # Examples
/// ```
/// use runtracer_core::SearchGeneration;
///
/// let generation = SearchGeneration::new();
/// let first = generation.begin();
/// let second = generation.begin();
/// assert!(!generation.is_current(first));
/// assert!(generation.is_current(second));
/// ```
#[derive(Debug, Default)]
pub struct SearchGeneration {
    latest: AtomicU64,
}

impl SearchGeneration {
    /// Create a counter that has issued no tickets.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            latest: AtomicU64::new(0),
        }
    }

    /// Issue the next ticket, superseding every earlier one.
    pub fn begin(&self) -> SearchTicket {
        SearchTicket(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Whether `ticket` is the most recently issued one.
    #[must_use]
    pub fn is_current(&self, ticket: SearchTicket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.0
    }

    /// Pass `value` through only when `ticket` is still current.
    pub fn settle<T>(&self, ticket: SearchTicket, value: T) -> Option<T> {
        self.is_current(ticket).then_some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::Arc;

    #[rstest]
    fn tickets_increase() {
        let generation = SearchGeneration::new();
        let first = generation.begin();
        let second = generation.begin();
        assert!(second > first);
        assert_eq!(second.get(), 2);
    }

    #[rstest]
    fn settle_discards_stale_results() {
        let generation = SearchGeneration::new();
        let stale = generation.begin();
        let fresh = generation.begin();
        assert_eq!(generation.settle(stale, "old"), None);
        assert_eq!(generation.settle(fresh, "new"), Some("new"));
    }

    #[rstest]
    fn concurrent_begins_issue_unique_tickets() {
        let generation = Arc::new(SearchGeneration::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let generation = Arc::clone(&generation);
                std::thread::spawn(move || {
                    (0..100).map(|_| generation.begin().get()).collect::<Vec<_>>()
                })
            })
            .collect();
        let mut all: Vec<u64> = handles
            .into_iter()
            .flat_map(|handle| handle.join().expect("thread finished"))
            .collect();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), 800);
        assert!(generation.is_current(SearchTicket(800)));
    }
}
