//! Handlers for `/chat` (one-to-one messaging between any users).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use sisfun_core::audit::entity_types;
use sisfun_core::chat::{normalize_body, validate_recipient};
use sisfun_core::error::CoreError;
use sisfun_core::types::DbId;
use sisfun_db::models::chat::{
    ChatContact, ChatMessage, ConversationQuery, CreateChatMessage, UnreadCount,
};
use sisfun_db::repositories::{ChatRepo, UserRepo};
use sisfun_events::{types, PlatformEvent};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /chat/messages`.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub recipient_id: DbId,
    pub body: String,
}

/// A contact together with its current presence.
#[derive(Debug, Serialize)]
pub struct ContactView {
    #[serde(flatten)]
    pub contact: ChatContact,
    pub online: bool,
}

#[derive(Debug, Serialize)]
pub struct MarkReadResponse {
    pub updated: u64,
}

async fn ensure_active_user(state: &AppState, id: DbId) -> AppResult<()> {
    UserRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|u| u.is_active)
        .map(|_| ())
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))
}

/// GET /api/chat/contacts
pub async fn contacts(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<ContactView>>>> {
    let contacts = ChatRepo::contacts(&state.pool, user.user_id).await?;
    let online = state.ws_manager.online_users().await;
    let data = contacts
        .into_iter()
        .map(|contact| ContactView {
            online: online.binary_search(&contact.id).is_ok(),
            contact,
        })
        .collect();
    Ok(Json(DataResponse { data }))
}

/// GET /api/chat/conversations/{user_id}?limit=&offset=
pub async fn conversation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(other_id): Path<DbId>,
    Query(params): Query<ConversationQuery>,
) -> AppResult<Json<DataResponse<Vec<ChatMessage>>>> {
    let messages = ChatRepo::conversation(&state.pool, user.user_id, other_id, &params).await?;
    Ok(Json(DataResponse { data: messages }))
}

/// POST /api/chat/messages
pub async fn send_message(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<SendMessageRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ChatMessage>>)> {
    validate_recipient(user.user_id, input.recipient_id)?;
    let body = normalize_body(&input.body)?;
    ensure_active_user(&state, input.recipient_id).await?;

    let message = ChatRepo::create(
        &state.pool,
        &CreateChatMessage {
            sender_id: user.user_id,
            recipient_id: input.recipient_id,
            body,
        },
    )
    .await?;

    state.event_bus.publish(
        PlatformEvent::new(types::CHAT_MESSAGE_SENT)
            .with_source(entity_types::CHAT_MESSAGE, message.id)
            .with_actor(user.user_id)
            .with_payload(serde_json::json!({
                "id": message.id,
                "sender_id": message.sender_id,
                "recipient_id": message.recipient_id,
                "body": message.body,
                "created_at": message.created_at,
            })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: message })))
}

/// POST /api/chat/conversations/{user_id}/read
///
/// Marks every unread message from `user_id` to the caller as read.
pub async fn mark_read(
    State(state): State<AppState>,
    user: AuthUser,
    Path(sender_id): Path<DbId>,
) -> AppResult<Json<MarkReadResponse>> {
    let updated = ChatRepo::mark_read(&state.pool, user.user_id, sender_id).await?;

    if updated > 0 {
        state.event_bus.publish(
            PlatformEvent::new(types::CHAT_MESSAGES_READ)
                .with_actor(user.user_id)
                .with_payload(serde_json::json!({
                    "reader_id": user.user_id,
                    "sender_id": sender_id,
                    "updated": updated,
                })),
        );
    }

    Ok(Json(MarkReadResponse { updated }))
}

/// GET /api/chat/unread
pub async fn unread(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<UnreadCount>>>> {
    let counts = ChatRepo::unread_counts(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: counts }))
}
