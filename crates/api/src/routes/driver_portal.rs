//! Route definitions for `/motorista` (driver self-service).

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::driver_portal;
use crate::state::AppState;

/// Routes mounted at `/motorista`.
///
/// ```text
/// GET  /atribuicoes                          -> list_assignments
/// GET  /atribuicoes/{id}                     -> get_assignment
/// POST /atribuicoes/{id}/checklist-saida     -> submit_departure
/// POST /atribuicoes/{id}/checklist-chegada   -> submit_arrival
/// GET  /atribuicoes/{id}/checklists          -> get_checklists
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/atribuicoes", get(driver_portal::list_assignments))
        .route("/atribuicoes/{id}", get(driver_portal::get_assignment))
        .route(
            "/atribuicoes/{id}/checklist-saida",
            post(driver_portal::submit_departure),
        )
        .route(
            "/atribuicoes/{id}/checklist-chegada",
            post(driver_portal::submit_arrival),
        )
        .route(
            "/atribuicoes/{id}/checklists",
            get(driver_portal::get_checklists),
        )
}
