//! Route definitions for `/ordens-servico` (service orders).

use axum::routing::get;
use axum::Router;

use crate::handlers::service_orders;
use crate::state::AppState;

/// Routes mounted at `/ordens-servico`.
///
/// ```text
/// GET  /       -> list
/// POST /       -> create
/// GET  /{id}   -> get_by_id
/// PUT  /{id}   -> update
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(service_orders::list).post(service_orders::create))
        .route("/{id}", get(service_orders::get_by_id).put(service_orders::update))
}
