//! Handlers for `/motoristas-ordem-servico` (dispatch office).
//!
//! Links drivers to service orders and exposes the resulting assignments.
//! Office roles only; drivers use [`driver_portal`](super::driver_portal).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use sisfun_core::audit::{action_types, entity_types};
use sisfun_core::dispatch;
use sisfun_core::error::CoreError;
use sisfun_core::service_order;
use sisfun_core::types::DbId;
use sisfun_db::models::dispatch::{
    ChecklistPair, CreateDispatchAssignment, DispatchAssignment, DispatchDetail, DispatchQuery,
    UpdateDispatchAssignment,
};
use sisfun_db::models::driver::Driver;
use sisfun_db::repositories::{DispatchRepo, DriverRepo, VehicleRepo};
use sisfun_events::{types, PlatformEvent};
use validator::Validate;

use super::service_orders::ensure_order_exists;
use crate::audit::{AuditEntry, ClientInfo};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireOffice;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Shared lookups
// ---------------------------------------------------------------------------

pub(crate) async fn ensure_assignment_exists(
    state: &AppState,
    id: DbId,
) -> AppResult<DispatchAssignment> {
    DispatchRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "DispatchAssignment",
            id,
        }))
}

pub(crate) async fn find_detail_or_404(state: &AppState, id: DbId) -> AppResult<DispatchDetail> {
    DispatchRepo::find_detail(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "DispatchAssignment",
            id,
        }))
}

async fn ensure_active_driver(state: &AppState, id: DbId) -> AppResult<Driver> {
    DriverRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|d| d.is_active)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Driver",
            id,
        }))
}

async fn ensure_active_vehicle(state: &AppState, id: DbId) -> AppResult<()> {
    VehicleRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|v| v.is_active)
        .map(|_| ())
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Vehicle",
            id,
        }))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/motoristas-ordem-servico
///
/// Creates a `pending` assignment; an `open` order moves to `in_progress`.
pub async fn create(
    State(state): State<AppState>,
    RequireOffice(user): RequireOffice,
    client: ClientInfo,
    Json(input): Json<CreateDispatchAssignment>,
) -> AppResult<(StatusCode, Json<DataResponse<DispatchDetail>>)> {
    input.validate()?;

    let order = ensure_order_exists(&state, input.service_order_id).await?;
    service_order::ensure_open(&order.status)?;
    let driver = ensure_active_driver(&state, input.driver_id).await?;
    if let Some(vehicle_id) = input.vehicle_id {
        ensure_active_vehicle(&state, vehicle_id).await?;
    }

    let assignment = DispatchRepo::create(&state.pool, &input).await?;
    let detail = find_detail_or_404(&state, assignment.id).await?;

    AuditEntry::new(action_types::DISPATCH_ASSIGN)
        .user(user.user_id)
        .entity(entity_types::DISPATCH_ASSIGNMENT, assignment.id)
        .details(serde_json::json!({
            "service_order_id": order.id,
            "driver_id": driver.id,
            "vehicle_id": assignment.vehicle_id,
        }))
        .client(&client)
        .record(&state.pool)
        .await;

    state.event_bus.publish(
        PlatformEvent::new(types::DISPATCH_ASSIGNED)
            .with_source(entity_types::DISPATCH_ASSIGNMENT, assignment.id)
            .with_actor(user.user_id)
            .with_payload(serde_json::json!({
                "assignment_id": assignment.id,
                "service_order_id": order.id,
                "driver_id": driver.id,
                "driver_user_id": driver.user_id,
                "status": assignment.status,
                "order_status": detail.order_status,
            })),
    );
    tracing::info!(
        assignment_id = assignment.id,
        order_id = order.id,
        driver_id = driver.id,
        "Driver assigned to service order"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

/// GET /api/motoristas-ordem-servico?service_order_id=&driver_id=&status=
pub async fn list(
    State(state): State<AppState>,
    RequireOffice(_user): RequireOffice,
    Query(params): Query<DispatchQuery>,
) -> AppResult<Json<DataResponse<Vec<DispatchDetail>>>> {
    if let Some(status) = params.status.as_deref() {
        dispatch::validate_status(status)?;
    }
    let items = DispatchRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: items }))
}

/// GET /api/motoristas-ordem-servico/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireOffice(_user): RequireOffice,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<DispatchDetail>>> {
    let detail = find_detail_or_404(&state, id).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// PUT /api/motoristas-ordem-servico/{id}
///
/// Change vehicle and/or notes. Only allowed while the assignment is
/// `pending`; afterwards it is a 409.
pub async fn update(
    State(state): State<AppState>,
    RequireOffice(user): RequireOffice,
    client: ClientInfo,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateDispatchAssignment>,
) -> AppResult<Json<DataResponse<DispatchDetail>>> {
    input.validate()?;

    let existing = ensure_assignment_exists(&state, id).await?;
    dispatch::validate_editable(&existing.status)?;
    if let Some(vehicle_id) = input.vehicle_id {
        ensure_active_vehicle(&state, vehicle_id).await?;
    }

    // None here means a departure landed between the check and the update.
    DispatchRepo::update_pending(&state.pool, id, &input)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Assignment is no longer pending".into(),
            ))
        })?;

    AuditEntry::new(action_types::ENTITY_UPDATE)
        .user(user.user_id)
        .entity(entity_types::DISPATCH_ASSIGNMENT, id)
        .details(serde_json::json!({
            "vehicle_id": input.vehicle_id,
            "notes_changed": input.notes.is_some(),
        }))
        .client(&client)
        .record(&state.pool)
        .await;

    let detail = find_detail_or_404(&state, id).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// GET /api/motoristas-ordem-servico/{id}/checklists
pub async fn checklists(
    State(state): State<AppState>,
    RequireOffice(_user): RequireOffice,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ChecklistPair>>> {
    ensure_assignment_exists(&state, id).await?;
    let pair = DispatchRepo::checklists(&state.pool, id).await?;
    Ok(Json(DataResponse { data: pair }))
}
