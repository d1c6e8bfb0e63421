//! Boundary interfaces of the notification system
//!
//! - [`Transport`]: Outbound message bus for broadcasts
//! - [`Observer`]: In-process listener receiving fan-out callbacks
//! - [`Service`]: The service whose kind decides the default technology
//! - [`ProfileSink`]: Side effect triggered by offline-mode changes

pub mod observer;
pub mod profile;
pub mod service;
pub mod transport;

pub use observer::Observer;
pub use profile::{NoopProfileSink, ProfileSink};
pub use service::Service;
pub use transport::Transport;
