//! Handlers for `/motorista` (driver self-service).
//!
//! A driver sees only their own assignments and moves them forward by
//! submitting the departure and arrival photo checklists.

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use sisfun_core::audit::{action_types, entity_types};
use sisfun_core::checklist::{
    extension_for, normalize_notes, photo_relative_path, photo_slot, require_all_photos,
    sniff_photo, NOTES_FIELD, PHOTO_FIELDS,
};
use sisfun_core::dispatch::{
    CheckpointKind, DRIVER_LIST_STATUSES, DRIVER_LIST_STATUSES_WITH_PENDING,
};
use sisfun_core::error::CoreError;
use sisfun_core::service_order;
use sisfun_core::types::DbId;
use sisfun_db::models::dispatch::{
    ChecklistPair, CheckpointRecord, DispatchDetail, NewChecklist,
};
use sisfun_db::repositories::DispatchRepo;
use sisfun_events::PlatformEvent;

use super::dispatch::{ensure_assignment_exists, find_detail_or_404};
use super::service_orders::ensure_order_exists;
use crate::audit::{AuditEntry, ClientInfo};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireDriver;
use crate::query::DriverAssignmentParams;
use crate::response::DataResponse;
use crate::state::AppState;

fn forbidden_assignment() -> AppError {
    AppError::Core(CoreError::Forbidden(
        "Assignment belongs to another driver".into(),
    ))
}

/// Keeps the status axum chose (413 for an over-limit body, 400 otherwise).
fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::BadRequest(e.body_text())
    }
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// GET /api/motorista/atribuicoes[?include_pending=true]
///
/// By default only assignments already on the road or finished are listed.
pub async fn list_assignments(
    State(state): State<AppState>,
    driver: RequireDriver,
    Query(params): Query<DriverAssignmentParams>,
) -> AppResult<Json<DataResponse<Vec<DispatchDetail>>>> {
    let statuses = if params.include_pending {
        DRIVER_LIST_STATUSES_WITH_PENDING
    } else {
        DRIVER_LIST_STATUSES
    };
    let items = DispatchRepo::list_for_driver(&state.pool, driver.driver_id, statuses).await?;
    Ok(Json(DataResponse { data: items }))
}

/// GET /api/motorista/atribuicoes/{id}
pub async fn get_assignment(
    State(state): State<AppState>,
    driver: RequireDriver,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<DispatchDetail>>> {
    let detail = find_detail_or_404(&state, id).await?;
    if detail.driver_id != driver.driver_id {
        return Err(forbidden_assignment());
    }
    Ok(Json(DataResponse { data: detail }))
}

/// GET /api/motorista/atribuicoes/{id}/checklists
pub async fn get_checklists(
    State(state): State<AppState>,
    driver: RequireDriver,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ChecklistPair>>> {
    let assignment = ensure_assignment_exists(&state, id).await?;
    if assignment.driver_id != driver.driver_id {
        return Err(forbidden_assignment());
    }
    let pair = DispatchRepo::checklists(&state.pool, id).await?;
    Ok(Json(DataResponse { data: pair }))
}

// ---------------------------------------------------------------------------
// Checklist submission
// ---------------------------------------------------------------------------

/// POST /api/motorista/atribuicoes/{id}/checklist-saida
pub async fn submit_departure(
    State(state): State<AppState>,
    driver: RequireDriver,
    client: ClientInfo,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<CheckpointRecord>>)> {
    submit_checklist(&state, &driver, &client, id, CheckpointKind::Departure, multipart).await
}

/// POST /api/motorista/atribuicoes/{id}/checklist-chegada
pub async fn submit_arrival(
    State(state): State<AppState>,
    driver: RequireDriver,
    client: ClientInfo,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<CheckpointRecord>>)> {
    submit_checklist(&state, &driver, &client, id, CheckpointKind::Arrival, multipart).await
}

/// Photos and notes read from a checklist form.
struct ChecklistForm {
    photos: [Option<(Vec<u8>, &'static str)>; 4],
    notes: Option<String>,
}

/// Read the multipart form, sniffing every photo.
///
/// Unknown fields are ignored. Invalid photos are collected and reported
/// together with any missing ones.
async fn read_checklist_form(mut multipart: Multipart) -> AppResult<ChecklistForm> {
    let mut photos: [Option<(Vec<u8>, &'static str)>; 4] = Default::default();
    let mut received = [false; 4];
    let mut problems: Vec<String> = Vec::new();
    let mut notes: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();
        if let Some(slot) = photo_slot(&name) {
            received[slot] = true;
            let data = field.bytes().await.map_err(multipart_error)?;
            match sniff_photo(&name, &data) {
                Ok(format) => photos[slot] = Some((data.to_vec(), extension_for(format))),
                Err(CoreError::Validation(msg)) => problems.push(msg),
                Err(other) => return Err(other.into()),
            }
        } else if name == NOTES_FIELD {
            notes = Some(field.text().await.map_err(multipart_error)?);
        }
    }

    // Invalid photos were reported above; only absent fields count as missing.
    if let Err(CoreError::Validation(msg)) = require_all_photos(&received.map(|r| r.then_some(())))
    {
        problems.push(msg);
    }
    if !problems.is_empty() {
        return Err(AppError::Core(CoreError::Validation(problems.join("; "))));
    }

    Ok(ChecklistForm {
        photos,
        notes: normalize_notes(notes.as_deref())?,
    })
}

/// Validate, store and record one checkpoint.
///
/// Files are written before the database transaction and removed again if
/// the transaction does not commit.
async fn submit_checklist(
    state: &AppState,
    driver: &RequireDriver,
    client: &ClientInfo,
    id: DbId,
    kind: CheckpointKind,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<CheckpointRecord>>)> {
    let assignment = ensure_assignment_exists(state, id).await?;
    if assignment.driver_id != driver.driver_id {
        return Err(forbidden_assignment());
    }
    let order = ensure_order_exists(state, assignment.service_order_id).await?;
    service_order::ensure_open(&order.status)?;
    kind.validate_from(&assignment.status)?;

    let form = read_checklist_form(multipart).await?;

    let mut written: Vec<String> = Vec::with_capacity(PHOTO_FIELDS.len());
    for (field, photo) in PHOTO_FIELDS.iter().zip(form.photos.iter()) {
        let Some((data, ext)) = photo else {
            continue;
        };
        let unique = uuid::Uuid::new_v4().simple().to_string();
        let relative = photo_relative_path(id, kind, field, &unique, ext);
        if let Err(e) = state.uploads.save(&relative, data).await {
            state.uploads.remove_all(&written).await;
            return Err(AppError::InternalError(format!(
                "Failed to store checklist photo: {e}"
            )));
        }
        written.push(relative);
    }

    let photos: [String; 4] = match written.clone().try_into() {
        Ok(paths) => paths,
        Err(_) => {
            state.uploads.remove_all(&written).await;
            return Err(AppError::InternalError(
                "Checklist photo set is incomplete".into(),
            ));
        }
    };

    let input = NewChecklist {
        kind,
        dispatch_assignment_id: id,
        photos,
        notes: form.notes,
    };

    let record = match DispatchRepo::record_checkpoint(&state.pool, &input).await {
        Ok(Some(record)) => record,
        Ok(None) => {
            state.uploads.remove_all(&written).await;
            return Err(AppError::Core(CoreError::Conflict(format!(
                "Assignment is no longer '{}' or its order was closed; {} checklist not recorded",
                kind.required_status(),
                kind.label()
            ))));
        }
        Err(e) => {
            state.uploads.remove_all(&written).await;
            return Err(e.into());
        }
    };

    let action = match kind {
        CheckpointKind::Departure => action_types::CHECKLIST_DEPARTURE,
        CheckpointKind::Arrival => action_types::CHECKLIST_ARRIVAL,
    };
    AuditEntry::new(action)
        .user(driver.user.user_id)
        .entity(entity_types::DISPATCH_ASSIGNMENT, id)
        .details(serde_json::json!({
            "checklist_id": record.checklist.id,
            "status": record.assignment.status,
        }))
        .client(client)
        .record(&state.pool)
        .await;

    state.event_bus.publish(
        PlatformEvent::new(kind.event_type())
            .with_source(entity_types::DISPATCH_ASSIGNMENT, id)
            .with_actor(driver.user.user_id)
            .with_payload(serde_json::json!({
                "assignment_id": id,
                "service_order_id": record.assignment.service_order_id,
                "driver_id": driver.driver_id,
                "driver_user_id": driver.user.user_id,
                "status": record.assignment.status,
                "checklist_id": record.checklist.id,
                "order_finalized": kind.finalizes_order(),
            })),
    );
    tracing::info!(
        assignment_id = id,
        checkpoint = kind.label(),
        status = %record.assignment.status,
        "Checklist recorded"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: record })))
}
