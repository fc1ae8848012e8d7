//! WebSocket infrastructure for the status notifier.
//!
//! Connection management, the JSON envelope, heartbeat pings and the HTTP
//! upgrade handler mounted at `/ws`.

pub mod envelope;
mod handler;
mod heartbeat;
pub mod manager;

pub use envelope::WsEnvelope;
pub use handler::{publish_presence, ws_handler};
pub use heartbeat::start_heartbeat;
pub use manager::WsManager;
