//! Status notifier.
//!
//! The [`Notifier`] subscribes to the event bus and pushes every relevant
//! event to all WebSocket connections as a [`WsEnvelope`](crate::ws::WsEnvelope).

pub mod notifier;

pub use notifier::Notifier;
