// # Null Transport
//
// Accepts every signal and drops it. Useful when the notifier is embedded
// for its observer fan-out only, with nobody listening on a bus.

use crate::signal::Signal;
use crate::traits::Transport;
use crate::Error;
use tracing::trace;

/// Transport that discards every signal
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTransport;

impl NullTransport {
    /// Create a new null transport
    pub fn new() -> Self {
        Self
    }
}

impl Transport for NullTransport {
    fn emit(&self, signal: Signal) -> Result<(), Error> {
        trace!("Discarding {} signal", signal.property);
        Ok(())
    }

    fn transport_name(&self) -> &'static str {
        "null"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::PropertyValue;

    #[test]
    fn test_null_transport_accepts_everything() {
        let transport = NullTransport::new();
        let signal = Signal::new(
            "/",
            "a.b",
            "PropertyChanged",
            "OfflineMode",
            PropertyValue::Bool(false),
        );

        assert!(transport.emit(signal).is_ok());
        transport.close();
        assert_eq!(transport.transport_name(), "null");
    }
}
