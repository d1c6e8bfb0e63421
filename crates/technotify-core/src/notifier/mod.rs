//! Technology state notifier
//!
//! The Notifier is responsible for:
//! - Counting, per technology kind, how many subsystems report it registered,
//!   enabled or connected
//! - Broadcasting a property change when an aggregate flips between zero and
//!   non-zero
//! - Fanning enablement, default-technology and offline-mode changes out to
//!   in-process observers
//!
//! ## Architecture
//!
//! ```text
//!   register / enable / connect ...        default_changed / offline_mode_changed
//!               │                                        │
//!               ▼                                        │
//!        ┌─────────────┐                                 │
//!        │ CounterSet  │── edge? ──┐                     │
//!        └─────────────┘           │                     │
//!                                  ▼                     ▼
//!                          ┌──────────────────────────────────┐
//!                          │             Notifier             │
//!                          └──────────────────────────────────┘
//!                                  │                     │
//!                                  ▼                     ▼
//!                          ┌─────────────┐     ┌──────────────────┐
//!                          │  Transport  │     │ ObserverRegistry │
//!                          │ (broadcast) │     │    (fan-out)     │
//!                          └─────────────┘     └──────────────────┘
//! ```
//!
//! ## Event Flow
//!
//! | Event             | Counted | Broadcast property      | Observer callback      |
//! |-------------------|---------|-------------------------|------------------------|
//! | register edge     | yes     | `AvailableTechnologies` | none                   |
//! | enable edge       | yes     | `EnabledTechnologies`   | `enabled_changed`      |
//! | connect edge      | yes     | `ConnectedTechnologies` | none                   |
//! | default changed   | no      | `DefaultTechnology`     | `default_changed`      |
//! | offline mode      | no      | `OfflineMode`           | `offline_mode_changed` |
//!
//! The enablement fan-out runs even when its broadcast could not be sent.
//! Offline mode notifies the profile sink before broadcasting.

use crate::config::NotifierConfig;
use crate::counters::CounterSet;
use crate::error::Result;
use crate::kind::{Category, TechnologyKind};
use crate::observers::ObserverRegistry;
use crate::signal::{PropertyValue, Signal};
use crate::traits::{Observer, ProfileSink, Service, Transport};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

/// Property carrying the default service's technology
pub const DEFAULT_TECHNOLOGY_PROPERTY: &str = "DefaultTechnology";

/// Property carrying the offline-mode flag
pub const OFFLINE_MODE_PROPERTY: &str = "OfflineMode";

/// Snapshot of the three technology lists
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnologyProperties {
    /// Kinds with at least one registered device
    #[serde(rename = "AvailableTechnologies")]
    pub available: Vec<String>,
    /// Kinds with at least one enabled device
    #[serde(rename = "EnabledTechnologies")]
    pub enabled: Vec<String>,
    /// Kinds with at least one connected service
    #[serde(rename = "ConnectedTechnologies")]
    pub connected: Vec<String>,
}

/// Technology state notifier
///
/// One instance per process, shared by reference (usually in an `Arc`)
/// between every subsystem that reports technology state.
///
/// ## Lifecycle
///
/// 1. Create with [`Notifier::init()`], which takes the transport handle
/// 2. Report state changes from any thread
/// 3. [`Notifier::cleanup()`] (or drop) releases the transport handle once
///
/// ## Threading
///
/// Every method takes `&self` and is safe to call concurrently. Counting is
/// lock-free; the observer registry uses a short-lived lock that is never
/// held while callbacks run.
///
/// Edges are not serialized against each other. Two threads flipping the same
/// category each build and send their own list, and their broadcasts and
/// `enabled_changed` fan-outs may arrive in either order. The last list a
/// subscriber sees can therefore be older than the final counter state;
/// [`Notifier::properties()`] always reads the current one.
pub struct Notifier {
    /// Outbound broadcast channel
    transport: Arc<dyn Transport>,

    /// Profile store notified on offline-mode changes
    profile: Arc<dyn ProfileSink>,

    /// Per-kind reference counts
    counters: CounterSet,

    /// In-process observers
    observers: ObserverRegistry,

    /// Broadcast addressing
    config: NotifierConfig,

    /// Set once the transport handle is released
    released: AtomicBool,
}

impl Notifier {
    /// Create a notifier
    ///
    /// # Parameters
    ///
    /// - `transport`: Transport used for every broadcast
    /// - `profile`: Sink notified before offline-mode broadcasts
    /// - `config`: Broadcast addressing
    ///
    /// # Returns
    ///
    /// - `Ok(Notifier)`: All counters at zero, no observers
    /// - `Err(Error)`: The configuration is invalid
    pub fn init(
        transport: Arc<dyn Transport>,
        profile: Arc<dyn ProfileSink>,
        config: NotifierConfig,
    ) -> Result<Self> {
        config.validate()?;

        debug!("Notifier using {} transport", transport.transport_name());

        Ok(Self {
            transport,
            profile,
            counters: CounterSet::new(),
            observers: ObserverRegistry::new(),
            config,
            released: AtomicBool::new(false),
        })
    }

    /// Release the transport handle
    ///
    /// Only the first call has an effect. Afterwards broadcasts are dropped,
    /// while counting and observer fan-out keep working.
    pub fn cleanup(&self) {
        if self.released.swap(true, Ordering::AcqRel) {
            return;
        }

        debug!("Releasing {} transport", self.transport.transport_name());
        self.transport.close();
    }

    /// Register an observer
    pub fn register_observer(&self, observer: Arc<dyn Observer>) {
        self.observers.register(observer);
    }

    /// Unregister a previously registered observer
    pub fn unregister_observer(&self, observer: &Arc<dyn Observer>) {
        self.observers.unregister(observer);
    }

    /// Observer names in callback order
    pub fn observer_names(&self) -> Vec<String> {
        self.observers.names()
    }

    /// A device of `kind` was registered
    pub fn register(&self, kind: TechnologyKind) {
        debug!("type {} register", kind);

        if self.counters.mark(kind, Category::Registered) {
            self.registered_changed(kind, true);
        }
    }

    /// A device of `kind` was unregistered
    pub fn unregister(&self, kind: TechnologyKind) {
        debug!("type {} unregister", kind);

        if self.counters.unmark(kind, Category::Registered) {
            self.registered_changed(kind, false);
        }
    }

    /// A device of `kind` was enabled
    pub fn enable(&self, kind: TechnologyKind) {
        debug!("type {} enable", kind);

        if self.counters.mark(kind, Category::Enabled) {
            self.enabled_changed(kind, true);
        }
    }

    /// A device of `kind` was disabled
    pub fn disable(&self, kind: TechnologyKind) {
        debug!("type {} disable", kind);

        if self.counters.unmark(kind, Category::Enabled) {
            self.enabled_changed(kind, false);
        }
    }

    /// A service of `kind` connected
    pub fn connect(&self, kind: TechnologyKind) {
        debug!("type {} connect", kind);

        if self.counters.mark(kind, Category::Connected) {
            self.connected_changed(kind, true);
        }
    }

    /// A service of `kind` disconnected
    pub fn disconnect(&self, kind: TechnologyKind) {
        debug!("type {} disconnect", kind);

        if self.counters.unmark(kind, Category::Connected) {
            self.connected_changed(kind, false);
        }
    }

    /// Names of the kinds currently in `category`, in enumeration order
    ///
    /// The iterator reads the counters as it goes; nothing is cached.
    pub fn list(&self, category: Category) -> impl Iterator<Item = &'static str> + '_ {
        self.counters.present(category).filter_map(TechnologyKind::name)
    }

    /// Whether at least one device of `kind` is enabled
    ///
    /// Always `false` for untracked kinds.
    pub fn is_enabled(&self, kind: TechnologyKind) -> bool {
        self.counters.is_nonzero(kind, Category::Enabled)
    }

    /// Current value of all three technology lists
    pub fn properties(&self) -> TechnologyProperties {
        TechnologyProperties {
            available: self.collect(Category::Registered),
            enabled: self.collect(Category::Enabled),
            connected: self.collect(Category::Connected),
        }
    }

    /// The default service changed
    ///
    /// `None` means there is no default service any more; the broadcast then
    /// carries an empty technology name. Every call broadcasts and fans out.
    pub fn default_changed(&self, service: Option<&dyn Service>) {
        let kind = service.map_or(TechnologyKind::Unknown, |service| service.kind());
        debug!(
            "default service {} type {}",
            service.map_or("none", |service| service.identifier()),
            kind
        );

        let name = kind.name().unwrap_or_default().to_string();
        self.send(self.signal(DEFAULT_TECHNOLOGY_PROPERTY, PropertyValue::String(name)));

        self.observers
            .for_each(|observer| observer.default_changed(service));
    }

    /// Offline mode was switched on or off
    ///
    /// Order: profile sink, then broadcast, then observers.
    pub fn offline_mode_changed(&self, enabled: bool) {
        debug!("offline mode {}", enabled);

        self.profile.profile_changed(false);

        self.send(self.signal(OFFLINE_MODE_PROPERTY, PropertyValue::Bool(enabled)));

        self.observers
            .for_each(|observer| observer.offline_mode_changed(enabled));
    }

    fn registered_changed(&self, kind: TechnologyKind, registered: bool) {
        debug!("type {} registered {}", kind, registered);

        self.send(self.technology_list(Category::Registered));
    }

    fn enabled_changed(&self, kind: TechnologyKind, enabled: bool) {
        debug!("type {} enabled {}", kind, enabled);

        // Observers hear about it even if the broadcast was dropped
        self.send(self.technology_list(Category::Enabled));

        self.observers
            .for_each(|observer| observer.enabled_changed(kind, enabled));
    }

    fn connected_changed(&self, kind: TechnologyKind, connected: bool) {
        debug!("type {} connected {}", kind, connected);

        self.send(self.technology_list(Category::Connected));
    }

    fn collect(&self, category: Category) -> Vec<String> {
        self.list(category).map(str::to_string).collect()
    }

    fn technology_list(&self, category: Category) -> Signal {
        self.signal(
            category.property_name(),
            PropertyValue::StringArray(self.collect(category)),
        )
    }

    fn signal(&self, property: &str, value: PropertyValue) -> Signal {
        Signal::new(
            &self.config.manager_path,
            &self.config.manager_interface,
            &self.config.signal_name,
            property,
            value,
        )
    }

    /// Hand a signal to the transport, logging instead of failing
    fn send(&self, signal: Signal) {
        if self.released.load(Ordering::Acquire) {
            debug!("Transport released, dropping {}", signal.property);
            return;
        }

        let property = signal.property.clone();
        if let Err(e) = self.transport.emit(signal) {
            warn!("Failed to broadcast {}: {}", property, e);
        }
    }
}

impl Drop for Notifier {
    fn drop(&mut self) {
        self.cleanup();
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("transport", &self.transport.transport_name())
            .field("counters", &self.counters)
            .field("observers", &self.observers)
            .field("config", &self.config)
            .finish()
    }
}
