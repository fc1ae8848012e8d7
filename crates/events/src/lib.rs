//! Sistema Funerário event bus.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`PlatformEvent`]: the domain event envelope shared by publishers,
//!   the persistence writer and the WebSocket notifier.
//! - [`EventPersistence`]: background service that writes every event to
//!   the `events` table.

pub mod bus;
pub mod persistence;
pub mod types;

pub use bus::{EventBus, PlatformEvent};
pub use persistence::EventPersistence;
