// # Transport Implementations
//
// This module provides implementations of the Transport trait for
// different delivery strategies.

pub mod channel;
pub mod null;

pub use channel::ChannelTransport;
pub use null::NullTransport;
