//! Route definitions for the `/chat` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::chat;
use crate::state::AppState;

/// Routes mounted at `/chat`. Any authenticated user.
///
/// ```text
/// GET  /contacts                      -> contacts
/// GET  /conversations/{user_id}       -> conversation
/// POST /conversations/{user_id}/read  -> mark_read
/// POST /messages                      -> send_message
/// GET  /unread                        -> unread
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/contacts", get(chat::contacts))
        .route("/conversations/{user_id}", get(chat::conversation))
        .route("/conversations/{user_id}/read", post(chat::mark_read))
        .route("/messages", post(chat::send_message))
        .route("/unread", get(chat::unread))
}
