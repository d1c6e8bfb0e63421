// # Transport Trait
//
// Defines the outbound side of the notifier: something that can carry a
// `PropertyChanged` broadcast to whoever listens on the bus.
//
// ## Implementations
//
// - `ChannelTransport`: in-process tokio broadcast channel
// - `NullTransport`: discards everything
// - Future: D-Bus system bus

use crate::signal::Signal;

/// Trait for transport implementations
///
/// The notifier acquires one transport at [`crate::Notifier::init`] and
/// releases it with [`Transport::close`] at cleanup.
///
/// # Failure
///
/// `emit` may fail (no listener, message could not be built, handle closed).
/// A failed emit means "message not sent"; the notifier never retries.
///
/// # Thread Safety
///
/// `emit` is called synchronously from whatever context reported the state
/// change, possibly several at once. It must not block on I/O.
pub trait Transport: Send + Sync {
    /// Send a broadcast
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The signal was handed to the bus
    /// - `Err(Error)`: The signal was not sent
    fn emit(&self, signal: Signal) -> Result<(), crate::Error>;

    /// Release the transport handle
    ///
    /// Called once at notifier cleanup. The default does nothing.
    fn close(&self) {}

    /// Transport name (for logging)
    fn transport_name(&self) -> &'static str;
}
