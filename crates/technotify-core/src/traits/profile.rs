//! Profile change boundary
//!
//! Switching offline mode changes the active profile's properties. The
//! profile store is notified before the offline-mode broadcast goes out.

/// Sink for profile change notifications
pub trait ProfileSink: Send + Sync {
    /// The active profile changed
    ///
    /// `delayed` asks the sink to coalesce the notification with later ones;
    /// the notifier always passes `false`.
    fn profile_changed(&self, delayed: bool);
}

/// Profile sink that ignores every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProfileSink;

impl ProfileSink for NoopProfileSink {
    fn profile_changed(&self, _delayed: bool) {}
}
