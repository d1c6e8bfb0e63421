//! Service lookup boundary
//!
//! Services live in the service registry, outside this crate. The notifier
//! only needs to know which technology kind a service belongs to.

use crate::kind::TechnologyKind;

/// A network service as seen by the notifier
pub trait Service: Send + Sync {
    /// Stable service identifier
    fn identifier(&self) -> &str;

    /// Technology kind the service belongs to
    fn kind(&self) -> TechnologyKind;
}
