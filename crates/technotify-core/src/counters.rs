// # Counter Set
//
// Per-kind reference counts for the three aggregate facts (registered,
// enabled, connected).
//
// ## Edge Detection
//
// Independent subsystems may report the same technology concurrently. Each
// counter is a single atomic, and the edge is decided by the value the atomic
// operation itself observed:
// - `mark`: `fetch_add` returned 0 -> rising edge (0 -> 1)
// - `unmark`: the decrement observed 1 -> falling edge (1 -> 0)
//
// Exactly one of N racing `mark` calls from zero sees the rising edge, with no
// lock involved.
//
// ## Underflow
//
// An `unmark` without a matching `mark` is a caller bug. The decrement refuses
// to go below zero: the counter stays at 0, no edge is reported and a warning
// is logged.

use crate::kind::{Category, TechnologyKind};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::warn;

const KINDS: usize = TechnologyKind::TRACKABLE.len();
const CATEGORIES: usize = Category::ALL.len();

/// Atomic reference counts indexed by (category, trackable kind)
///
/// Untracked kinds are accepted by every method and never mutate anything.
///
/// # Example
///
/// ```rust
/// use technotify_core::{Category, CounterSet, TechnologyKind};
///
/// let counters = CounterSet::new();
/// assert!(counters.mark(TechnologyKind::Wifi, Category::Enabled));
/// assert!(!counters.mark(TechnologyKind::Wifi, Category::Enabled));
/// assert!(!counters.unmark(TechnologyKind::Wifi, Category::Enabled));
/// assert!(counters.unmark(TechnologyKind::Wifi, Category::Enabled));
/// ```
#[derive(Debug, Default)]
pub struct CounterSet {
    counts: [[AtomicUsize; KINDS]; CATEGORIES],
}

impl CounterSet {
    /// Create a counter set with every counter at zero
    pub fn new() -> Self {
        Self::default()
    }

    fn counter(&self, kind: TechnologyKind, category: Category) -> Option<&AtomicUsize> {
        kind.slot().map(|slot| &self.counts[category.slot()][slot])
    }

    /// Increment the counter for `kind` in `category`
    ///
    /// # Returns
    ///
    /// `true` if this call moved the counter from 0 to 1, `false` otherwise
    /// (including for untracked kinds).
    pub fn mark(&self, kind: TechnologyKind, category: Category) -> bool {
        match self.counter(kind, category) {
            Some(counter) => counter.fetch_add(1, Ordering::AcqRel) == 0,
            None => false,
        }
    }

    /// Decrement the counter for `kind` in `category`
    ///
    /// # Returns
    ///
    /// `true` if this call moved the counter from 1 to 0, `false` otherwise
    /// (including for untracked kinds and for an unmatched decrement).
    pub fn unmark(&self, kind: TechnologyKind, category: Category) -> bool {
        let Some(counter) = self.counter(kind, category) else {
            return false;
        };

        match counter.fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1)) {
            Ok(previous) => previous == 1,
            Err(_) => {
                warn!(
                    "Unbalanced {} decrement for {}, counter stays at zero",
                    category, kind
                );
                false
            }
        }
    }

    /// Whether the counter is currently above zero
    pub fn is_nonzero(&self, kind: TechnologyKind, category: Category) -> bool {
        self.count(kind, category) > 0
    }

    /// Current counter value (always 0 for untracked kinds)
    pub fn count(&self, kind: TechnologyKind, category: Category) -> usize {
        self.counter(kind, category)
            .map_or(0, |counter| counter.load(Ordering::Acquire))
    }

    /// Trackable kinds whose counter in `category` is non-zero
    ///
    /// The iterator reads the counters lazily, in enumeration order.
    pub fn present(&self, category: Category) -> impl Iterator<Item = TechnologyKind> + '_ {
        TechnologyKind::TRACKABLE
            .into_iter()
            .filter(move |kind| self.is_nonzero(*kind, category))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_mark_is_rising_edge() {
        let counters = CounterSet::new();

        assert!(counters.mark(TechnologyKind::Ethernet, Category::Registered));
        for _ in 0..4 {
            assert!(!counters.mark(TechnologyKind::Ethernet, Category::Registered));
        }

        assert_eq!(counters.count(TechnologyKind::Ethernet, Category::Registered), 5);
        assert!(counters.is_nonzero(TechnologyKind::Ethernet, Category::Registered));
    }

    #[test]
    fn test_last_unmark_is_falling_edge() {
        let counters = CounterSet::new();

        for _ in 0..3 {
            counters.mark(TechnologyKind::Cellular, Category::Connected);
        }

        assert!(!counters.unmark(TechnologyKind::Cellular, Category::Connected));
        assert!(!counters.unmark(TechnologyKind::Cellular, Category::Connected));
        assert!(counters.unmark(TechnologyKind::Cellular, Category::Connected));
        assert!(!counters.is_nonzero(TechnologyKind::Cellular, Category::Connected));
    }

    #[test]
    fn test_categories_are_independent() {
        let counters = CounterSet::new();

        assert!(counters.mark(TechnologyKind::Wifi, Category::Registered));
        assert!(counters.mark(TechnologyKind::Wifi, Category::Enabled));
        assert!(!counters.is_nonzero(TechnologyKind::Wifi, Category::Connected));
        assert!(!counters.is_nonzero(TechnologyKind::Wimax, Category::Registered));
    }

    #[test]
    fn test_untracked_kinds_are_ignored() {
        let counters = CounterSet::new();

        for kind in [TechnologyKind::Unknown, TechnologyKind::System, TechnologyKind::Vpn] {
            for category in Category::ALL {
                assert!(!counters.mark(kind, category));
                assert!(!counters.is_nonzero(kind, category));
                assert!(!counters.unmark(kind, category));
                assert_eq!(counters.count(kind, category), 0);
            }
        }
    }

    #[test]
    fn test_unmatched_unmark_clamps_at_zero() {
        let counters = CounterSet::new();

        assert!(!counters.unmark(TechnologyKind::Bluetooth, Category::Enabled));
        assert_eq!(counters.count(TechnologyKind::Bluetooth, Category::Enabled), 0);

        // The next mark is still a rising edge
        assert!(counters.mark(TechnologyKind::Bluetooth, Category::Enabled));
    }

    #[test]
    fn test_present_in_enumeration_order() {
        let counters = CounterSet::new();

        counters.mark(TechnologyKind::Cellular, Category::Enabled);
        counters.mark(TechnologyKind::Ethernet, Category::Enabled);
        counters.mark(TechnologyKind::Wifi, Category::Connected);

        let enabled: Vec<_> = counters.present(Category::Enabled).collect();
        assert_eq!(enabled, vec![TechnologyKind::Ethernet, TechnologyKind::Cellular]);
    }
}
