use std::collections::{BTreeSet, HashMap};

use axum::body::Bytes;
use axum::extract::ws::Message;
use sisfun_core::types::{DbId, Timestamp};
use tokio::sync::{mpsc, RwLock};

/// Channel sender half for pushing messages to a WebSocket connection.
pub type WsSender = mpsc::UnboundedSender<Message>;

/// Metadata for a single WebSocket connection.
pub struct WsConnection {
    /// Authenticated user, `None` for anonymous connections.
    pub user_id: Option<DbId>,
    pub sender: WsSender,
    pub connected_at: Timestamp,
}

/// Outcome of registering a connection.
pub struct Registration {
    /// Outbound messages for this connection.
    pub receiver: mpsc::UnboundedReceiver<Message>,
    /// The user had no other open connection.
    pub first_for_user: bool,
}

/// Manages all active WebSocket connections.
///
/// Thread-safe via interior `RwLock`; shared as `Arc<WsManager>`.
pub struct WsManager {
    connections: RwLock<HashMap<String, WsConnection>>,
}

impl WsManager {
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new connection.
    ///
    /// The presence check and the insert happen under one write lock, so
    /// exactly one of several simultaneous connections of a user is
    /// reported as first.
    pub async fn add(&self, conn_id: String, user_id: Option<DbId>) -> Registration {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut conns = self.connections.write().await;
        let first_for_user = user_id
            .is_some_and(|uid| !conns.values().any(|c| c.user_id == Some(uid)));
        conns.insert(
            conn_id,
            WsConnection {
                user_id,
                sender: tx,
                connected_at: chrono::Utc::now(),
            },
        );
        Registration {
            receiver: rx,
            first_for_user,
        }
    }

    /// Remove a connection.
    ///
    /// Returns the user id when this was the user's last connection.
    pub async fn remove(&self, conn_id: &str) -> Option<DbId> {
        let mut conns = self.connections.write().await;
        let uid = conns.remove(conn_id)?.user_id?;
        if conns.values().any(|c| c.user_id == Some(uid)) {
            None
        } else {
            Some(uid)
        }
    }

    /// Send a message to one connection. Returns `false` if it is gone.
    pub async fn send_to(&self, conn_id: &str, message: Message) -> bool {
        self.connections
            .read()
            .await
            .get(conn_id)
            .is_some_and(|c| c.sender.send(message).is_ok())
    }

    /// Broadcast a message to all connected clients.
    ///
    /// Closed channels are skipped; their receive loop removes them.
    pub async fn broadcast(&self, message: Message) {
        let conns = self.connections.read().await;
        for conn in conns.values() {
            let _ = conn.sender.send(message.clone());
        }
    }

    /// Distinct authenticated users with at least one open connection,
    /// ascending.
    pub async fn online_users(&self) -> Vec<DbId> {
        let conns = self.connections.read().await;
        conns
            .values()
            .filter_map(|c| c.user_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub async fn is_online(&self, user_id: DbId) -> bool {
        self.user_connection_count(user_id).await > 0
    }

    pub async fn user_connection_count(&self, user_id: DbId) -> usize {
        self.connections
            .read()
            .await
            .values()
            .filter(|c| c.user_id == Some(user_id))
            .count()
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Send a Close frame to every connection, then clear the map.
    ///
    /// Returns the users that were online, ascending. Their sockets' own
    /// `remove` calls find nothing afterwards, so going offline is the
    /// caller's to announce.
    pub async fn shutdown_all(&self) -> Vec<DbId> {
        let mut conns = self.connections.write().await;
        let count = conns.len();
        let users: BTreeSet<DbId> = conns.values().filter_map(|c| c.user_id).collect();
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Close(None));
        }
        conns.clear();
        tracing::info!(count, users = users.len(), "Closed all WebSocket connections");
        users.into_iter().collect()
    }

    /// Send a Ping frame to every connected client.
    pub async fn ping_all(&self) {
        let conns = self.connections.read().await;
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Ping(Bytes::new()));
        }
    }
}

impl Default for WsManager {
    fn default() -> Self {
        Self::new()
    }
}
