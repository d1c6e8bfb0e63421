// # Observer Trait
//
// In-process listeners that receive fan-out callbacks from the notifier.
//
// Every callback has an empty default body. An observer subscribes to an
// event by overriding its callback and ignores the rest.

use crate::kind::TechnologyKind;
use crate::traits::Service;

/// Trait for notifier observers
///
/// Observers are called in descending [`Observer::priority`] order; observers
/// of equal priority are called in registration order.
///
/// # Re-entrancy
///
/// Callbacks must not register or unregister observers on the notifier that
/// is calling them. The registry will not deadlock, but whether the change is
/// seen by the ongoing traversal is unspecified.
///
/// # Example
///
/// ```rust
/// use technotify_core::{Observer, TechnologyKind};
///
/// struct WifiLed;
///
/// impl Observer for WifiLed {
///     fn name(&self) -> &str {
///         "wifi-led"
///     }
///
///     fn enabled_changed(&self, kind: TechnologyKind, enabled: bool) {
///         if kind == TechnologyKind::Wifi {
///             println!("wifi led {}", if enabled { "on" } else { "off" });
///         }
///     }
/// }
/// ```
#[allow(unused_variables)]
pub trait Observer: Send + Sync {
    /// Observer name (diagnostic only)
    fn name(&self) -> &str;

    /// Ordering priority, higher runs first
    ///
    /// Read once, when the observer is registered.
    fn priority(&self) -> i32 {
        0
    }

    /// A technology kind became enabled (`true`) or fully disabled (`false`)
    fn enabled_changed(&self, kind: TechnologyKind, enabled: bool) {}

    /// The default service changed; `None` when there is no default service
    fn default_changed(&self, service: Option<&dyn Service>) {}

    /// Offline mode was switched on or off
    fn offline_mode_changed(&self, enabled: bool) {}
}
