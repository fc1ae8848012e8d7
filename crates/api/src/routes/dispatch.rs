//! Route definitions for `/motoristas-ordem-servico` (assignment management).

use axum::routing::get;
use axum::Router;

use crate::handlers::dispatch;
use crate::state::AppState;

/// Routes mounted at `/motoristas-ordem-servico`.
///
/// ```text
/// GET  /                  -> list
/// POST /                  -> create
/// GET  /{id}              -> get_by_id
/// PUT  /{id}              -> update
/// GET  /{id}/checklists   -> checklists
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(dispatch::list).post(dispatch::create))
        .route("/{id}", get(dispatch::get_by_id).put(dispatch::update))
        .route("/{id}/checklists", get(dispatch::checklists))
}
