//! Event-to-envelope fan-out.
//!
//! Every connection receives every envelope; there is no per-user scoping.
//! Envelopes carry `userId`/`orderId` so the browser can pick what concerns
//! it.

use std::sync::Arc;

use serde_json::json;
use sisfun_events::{types, PlatformEvent};
use tokio::sync::broadcast;

use crate::ws::envelope::{self, WsEnvelope};
use crate::ws::WsManager;

/// Pushes platform events to WebSocket clients.
pub struct Notifier {
    ws_manager: Arc<WsManager>,
}

impl Notifier {
    pub fn new(ws_manager: Arc<WsManager>) -> Self {
        Self { ws_manager }
    }

    /// Run the broadcast loop until the event bus closes.
    pub async fn run(self, mut receiver: broadcast::Receiver<PlatformEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => self.notify(&event).await,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notifier lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notifier shutting down");
                    break;
                }
            }
        }
    }

    /// Broadcast one event, if it maps to an envelope.
    pub async fn notify(&self, event: &PlatformEvent) {
        let Some(env) = envelope_for(event) else {
            return;
        };
        match env.to_message() {
            Ok(msg) => self.ws_manager.broadcast(msg).await,
            Err(e) => tracing::error!(
                error = %e,
                event_type = %event.event_type,
                "Failed to encode envelope"
            ),
        }
    }
}

/// Map a platform event to the envelope clients understand.
///
/// | Event                 | Envelope          | `userId`            | `orderId`          |
/// |-----------------------|-------------------|---------------------|--------------------|
/// | `chat.message_sent`   | `new_message`     | recipient           |                    |
/// | `chat.messages_read`  | `messages_read`   | original sender     |                    |
/// | `presence.changed`    | `presence`        | the user            |                    |
/// | `dispatch.*`          | `dispatch_status` | driver's login      | service order      |
pub fn envelope_for(event: &PlatformEvent) -> Option<WsEnvelope> {
    let env = match event.event_type.as_str() {
        types::CHAT_MESSAGE_SENT => WsEnvelope::new(envelope::NEW_MESSAGE)
            .with_user(event.payload_id("recipient_id"))
            .with_payload(event.payload.clone()),
        types::CHAT_MESSAGES_READ => WsEnvelope::new(envelope::MESSAGES_READ)
            .with_user(event.payload_id("sender_id"))
            .with_payload(event.payload.clone()),
        types::PRESENCE_CHANGED => WsEnvelope::new(envelope::PRESENCE)
            .with_user(event.payload_id("user_id"))
            .with_payload(json!({
                "online": event.payload.get("online").cloned().unwrap_or(json!(false)),
            })),
        types::DISPATCH_ASSIGNED | types::DISPATCH_DEPARTED | types::DISPATCH_ARRIVED => {
            let mut payload = event.payload.clone();
            if let Some(obj) = payload.as_object_mut() {
                obj.insert("event".to_string(), json!(event.event_type));
            }
            WsEnvelope::new(envelope::DISPATCH_STATUS)
                .with_user(event.payload_id("driver_user_id"))
                .with_order(event.payload_id("service_order_id"))
                .with_payload(payload)
        }
        _ => return None,
    };
    Some(env)
}
