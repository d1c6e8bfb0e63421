// # Channel Transport
//
// In-process implementation of Transport on a tokio broadcast channel.
//
// ## Purpose
//
// Lets any number of in-process subscribers (the daemon's log writer, a bus
// bridge, tests) follow the notifier's broadcasts without the notifier
// knowing about them.
//
// ## Failure Behavior
//
// - No subscriber attached: the signal is not sent and `emit` fails
// - After `close()`: every `emit` fails
// - Lagging subscriber: the channel drops its oldest signals and the
//   subscriber is told how many it missed

use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tracing::debug;

use crate::signal::Signal;
use crate::traits::Transport;
use crate::Error;

/// Broadcast-channel transport
///
/// # Example
///
/// ```rust
/// use technotify_core::{ChannelTransport, PropertyValue, Signal, Transport};
///
/// let transport = ChannelTransport::new(16);
/// let mut rx = transport.subscribe();
///
/// let signal = Signal::new("/", "org.example.Manager", "PropertyChanged",
///     "OfflineMode", PropertyValue::Bool(true));
/// transport.emit(signal).unwrap();
///
/// assert_eq!(rx.try_recv().unwrap().property, "OfflineMode");
/// ```
#[derive(Debug)]
pub struct ChannelTransport {
    tx: broadcast::Sender<Signal>,
    closed: AtomicBool,
}

impl ChannelTransport {
    /// Create a transport whose channel holds up to `capacity` signals
    ///
    /// A zero capacity is raised to 1.
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self {
            tx,
            closed: AtomicBool::new(false),
        }
    }

    /// Attach a new subscriber
    ///
    /// The subscriber receives signals emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Signal> {
        self.tx.subscribe()
    }

    /// Attach a new subscriber as a stream
    pub fn stream(&self) -> BroadcastStream<Signal> {
        BroadcastStream::new(self.tx.subscribe())
    }

    /// Number of attached subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Whether [`Transport::close`] was called
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl Transport for ChannelTransport {
    fn emit(&self, signal: Signal) -> Result<(), Error> {
        if self.is_closed() {
            return Err(Error::transport("transport is closed"));
        }

        let property = signal.property.clone();
        let receivers = self
            .tx
            .send(signal)
            .map_err(|_| Error::transport(format!("no subscriber for {}", property)))?;

        debug!("Sent {} to {} subscriber(s)", property, receivers);
        Ok(())
    }

    fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    fn transport_name(&self) -> &'static str {
        "channel"
    }
}
