use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use sisfun_core::types::DbId;
use sisfun_events::{types, EventBus, PlatformEvent};

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::ws::envelope::{self, WsEnvelope};
use crate::ws::manager::WsManager;

/// Query string of the upgrade request.
#[derive(Debug, Deserialize)]
pub struct WsParams {
    /// Access token; browsers cannot set headers on WebSocket upgrades.
    pub token: Option<String>,
}

/// GET /ws -- upgrade to a WebSocket.
///
/// A valid `token` ties the connection to its user (presence, targeted
/// envelopes); otherwise the connection is anonymous and only receives
/// broadcasts.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsParams>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let user_id = params
        .token
        .as_deref()
        .and_then(|t| AuthUser::from_token(t, &state.config.jwt).ok())
        .map(|user| user.user_id);

    ws.on_upgrade(move |socket| {
        handle_socket(socket, user_id, state.ws_manager, state.event_bus)
    })
}

/// Manage a single WebSocket connection after upgrade.
///
/// 1. Registers the connection, publishing presence for a user's first socket.
/// 2. Spawns a sender task draining the manager channel into the sink.
/// 3. Answers inbound `ping` and `online_users` frames.
/// 4. On disconnect, removes the connection and publishes offline presence
///    when it was the user's last.
async fn handle_socket(
    socket: WebSocket,
    user_id: Option<DbId>,
    ws_manager: Arc<WsManager>,
    event_bus: Arc<EventBus>,
) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, user_id = ?user_id, "WebSocket connected");

    let registration = ws_manager.add(conn_id.clone(), user_id).await;
    let mut rx = registration.receiver;
    if registration.first_for_user {
        if let Some(uid) = user_id {
            publish_presence(&event_bus, uid, true);
        }
    }

    let (mut sink, mut stream) = socket.split();

    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(Message::Text(text)) => {
                handle_inbound(&ws_manager, &conn_id, text.as_str()).await;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    if let Some(uid) = ws_manager.remove(&conn_id).await {
        publish_presence(&event_bus, uid, false);
    }
    send_task.abort();
    tracing::info!(conn_id = %conn_id, "WebSocket disconnected");
}

/// Answer a client frame on the same connection. Unknown types are ignored.
async fn handle_inbound(ws_manager: &WsManager, conn_id: &str, text: &str) {
    let Some(inbound) = WsEnvelope::parse(text) else {
        tracing::debug!(conn_id, "Ignoring malformed WebSocket frame");
        return;
    };

    let reply = match inbound.kind.as_str() {
        envelope::PING => WsEnvelope::new(envelope::PONG),
        envelope::ONLINE_USERS => {
            let users = ws_manager.online_users().await;
            WsEnvelope::new(envelope::ONLINE_USERS).with_payload(serde_json::json!(users))
        }
        other => {
            tracing::trace!(conn_id, kind = other, "Unhandled WebSocket frame");
            return;
        }
    };

    match reply.to_message() {
        Ok(msg) => {
            ws_manager.send_to(conn_id, msg).await;
        }
        Err(e) => tracing::error!(error = %e, "Failed to encode WebSocket reply"),
    }
}

pub fn publish_presence(event_bus: &EventBus, user_id: DbId, online: bool) {
    event_bus.publish(
        PlatformEvent::new(types::PRESENCE_CHANGED)
            .with_actor(user_id)
            .with_payload(serde_json::json!({ "user_id": user_id, "online": online })),
    );
}
