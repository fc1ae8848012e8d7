use std::sync::Arc;

use crate::config::ServerConfig;
use crate::storage::UploadStore;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind `Arc` or is a pool handle.
#[derive(Clone)]
pub struct AppState {
    pub pool: sisfun_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Browser WebSocket connections.
    pub ws_manager: Arc<WsManager>,
    /// Local disk store for checklist photos.
    pub uploads: Arc<UploadStore>,
    /// Centralized event bus for publishing platform events.
    pub event_bus: Arc<sisfun_events::EventBus>,
}
