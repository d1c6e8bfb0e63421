// # technotify-core
//
// Core library for technology state aggregation and change notification.
//
// ## Architecture Overview
//
// Device and service management code reports, per technology kind, when a
// subsystem registers, enables or connects something of that kind. This crate
// turns those reports into aggregate facts and publishes a change only when a
// fact flips:
// - **CounterSet**: Per-kind atomic reference counts with 0 <-> non-zero edge detection
// - **ObserverRegistry**: Priority-ordered observers receiving fan-out callbacks
// - **Notifier**: Broadcasts `PropertyChanged` signals on edges and lifecycle events
// - **Transport**: Trait for the outbound message bus
//
// ## Design Principles
//
// 1. **Edge-Triggered**: Repeated reports that do not cross zero emit nothing
// 2. **Lock-Free Counting**: Counters are atomics, never a read-modify-write under a lock
// 3. **Total Operations**: Callers never see an error; transport failures are logged
// 4. **Library-First**: The daemon is a thin wrapper over this crate

pub mod config;
pub mod counters;
pub mod error;
pub mod kind;
pub mod notifier;
pub mod observers;
pub mod signal;
pub mod traits;
pub mod transport;

// Re-export core types for convenience
pub use config::NotifierConfig;
pub use counters::CounterSet;
pub use error::{Error, Result};
pub use kind::{Category, TechnologyKind};
pub use notifier::{Notifier, TechnologyProperties};
pub use observers::ObserverRegistry;
pub use signal::{PropertyValue, Signal};
pub use traits::{NoopProfileSink, Observer, ProfileSink, Service, Transport};
pub use transport::{ChannelTransport, NullTransport};
