//! Route definitions for `/veiculos` (vehicles).

use axum::routing::get;
use axum::Router;

use crate::handlers::vehicles;
use crate::state::AppState;

/// Routes mounted at `/veiculos`.
///
/// ```text
/// GET  /       -> list
/// POST /       -> create
/// GET  /{id}   -> get_by_id
/// PUT  /{id}   -> update
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(vehicles::list).post(vehicles::create))
        .route("/{id}", get(vehicles::get_by_id).put(vehicles::update))
}
