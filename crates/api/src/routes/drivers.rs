//! Route definitions for `/motoristas` (drivers).

use axum::routing::get;
use axum::Router;

use crate::handlers::drivers;
use crate::state::AppState;

/// Routes mounted at `/motoristas`.
///
/// ```text
/// GET  /       -> list
/// POST /       -> create
/// GET  /{id}   -> get_by_id
/// PUT  /{id}   -> update
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(drivers::list).post(drivers::create))
        .route("/{id}", get(drivers::get_by_id).put(drivers::update))
}
