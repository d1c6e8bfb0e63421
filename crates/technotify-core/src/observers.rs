//! Priority-ordered observer registry
//!
//! The registry keeps observers sorted by descending priority. Insertion is
//! stable: an observer goes after every observer of greater or equal
//! priority, so equal priorities keep their registration order.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use technotify_core::{Observer, ObserverRegistry};
//!
//! struct Named(&'static str, i32);
//!
//! impl Observer for Named {
//!     fn name(&self) -> &str { self.0 }
//!     fn priority(&self) -> i32 { self.1 }
//! }
//!
//! let registry = ObserverRegistry::new();
//! registry.register(Arc::new(Named("a", 5)));
//! registry.register(Arc::new(Named("b", 10)));
//! registry.register(Arc::new(Named("c", 5)));
//!
//! assert_eq!(registry.names(), vec!["b", "a", "c"]);
//! ```

use crate::traits::Observer;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// Registered observer with the priority captured at registration
#[derive(Clone)]
struct Entry {
    priority: i32,
    observer: Arc<dyn Observer>,
}

impl Entry {
    fn is(&self, observer: &Arc<dyn Observer>) -> bool {
        // Compare data pointers only; vtable pointers for the same object may differ.
        std::ptr::eq(
            Arc::as_ptr(&self.observer) as *const (),
            Arc::as_ptr(observer) as *const (),
        )
    }
}

/// Observer registry
///
/// ## Thread Safety
///
/// The sequence sits behind an `RwLock`. Traversal copies the current
/// sequence and invokes callbacks with no lock held, so a callback that
/// registers or unregisters observers does not deadlock; the change is seen
/// by the next traversal.
#[derive(Default)]
pub struct ObserverRegistry {
    entries: RwLock<Vec<Entry>>,
}

impl ObserverRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an observer in priority order
    ///
    /// Registering the same observer twice is a caller error; it will then be
    /// called twice per event.
    pub fn register(&self, observer: Arc<dyn Observer>) {
        let priority = observer.priority();
        debug!("observer {} priority {} registered", observer.name(), priority);

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let at = entries.partition_point(|entry| entry.priority >= priority);
        entries.insert(at, Entry { priority, observer });
    }

    /// Remove an observer by identity
    ///
    /// Removing an observer that is not registered does nothing.
    pub fn unregister(&self, observer: &Arc<dyn Observer>) {
        debug!("observer {} unregistered", observer.name());

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(at) = entries.iter().position(|entry| entry.is(observer)) {
            entries.remove(at);
        }
    }

    /// Invoke `f` for every observer, highest priority first
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&dyn Observer),
    {
        for entry in self.snapshot() {
            f(entry.observer.as_ref());
        }
    }

    fn snapshot(&self) -> Vec<Entry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of registered observers
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Check if no observer is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Observer names in traversal order
    pub fn names(&self) -> Vec<String> {
        self.snapshot()
            .iter()
            .map(|entry| entry.observer.name().to_string())
            .collect()
    }
}

impl std::fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("observers", &self.names())
            .finish()
    }
}
