//! JSON envelope exchanged over `/ws`.
//!
//! Outbound frames look like
//! `{"type": "dispatch_status", "userId": 4, "orderId": 12, "payload": {...}}`;
//! clients decide what concerns them by comparing ids.

use axum::extract::ws::Message;
use serde::{Deserialize, Serialize};
use sisfun_core::types::DbId;

/// Outbound: a chat message was sent; `userId` is the recipient.
pub const NEW_MESSAGE: &str = "new_message";
/// Outbound: a conversation was read; `userId` is the original sender.
pub const MESSAGES_READ: &str = "messages_read";
/// Outbound: a user came online or went offline.
pub const PRESENCE: &str = "presence";
/// Outbound: an assignment changed status; `orderId` is the service order.
pub const DISPATCH_STATUS: &str = "dispatch_status";
/// Both directions: request for / answer with the online user ids.
pub const ONLINE_USERS: &str = "online_users";
/// Inbound keep-alive.
pub const PING: &str = "ping";
/// Answer to [`PING`].
pub const PONG: &str = "pong";

/// A typed JSON frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WsEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<DbId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<DbId>,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl WsEnvelope {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            user_id: None,
            order_id: None,
            payload: serde_json::Value::Null,
        }
    }

    pub fn with_user(mut self, user_id: Option<DbId>) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn with_order(mut self, order_id: Option<DbId>) -> Self {
        self.order_id = order_id;
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    /// Parse an inbound text frame. Anything that is not an envelope
    /// yields `None`.
    pub fn parse(text: &str) -> Option<Self> {
        serde_json::from_str(text).ok()
    }

    /// Encode as a WebSocket text frame.
    pub fn to_message(&self) -> Result<Message, serde_json::Error> {
        let text = serde_json::to_string(self)?;
        Ok(Message::Text(text.into()))
    }
}
