//! Handlers for `/veiculos` (fleet vehicles). Office roles only.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use sisfun_core::audit::{action_types, entity_types};
use sisfun_core::error::CoreError;
use sisfun_core::types::DbId;
use sisfun_core::vehicle::normalize_plate;
use sisfun_db::models::vehicle::{CreateVehicle, UpdateVehicle, Vehicle};
use sisfun_db::repositories::VehicleRepo;
use validator::Validate;

use crate::audit::{AuditEntry, ClientInfo};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireOffice;
use crate::query::IncludeInactiveParams;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Vehicle",
        id,
    })
}

/// POST /api/veiculos
///
/// The plate is stored normalized (`abc-1d23` becomes `ABC1D23`); a
/// duplicate plate is a 409.
pub async fn create(
    State(state): State<AppState>,
    RequireOffice(user): RequireOffice,
    client: ClientInfo,
    Json(input): Json<CreateVehicle>,
) -> AppResult<(StatusCode, Json<DataResponse<Vehicle>>)> {
    input.validate()?;
    let plate = normalize_plate(&input.plate)?;

    let vehicle = VehicleRepo::create(&state.pool, &plate, input.model.as_deref()).await?;

    AuditEntry::new(action_types::ENTITY_CREATE)
        .user(user.user_id)
        .entity(entity_types::VEHICLE, vehicle.id)
        .details(serde_json::json!({ "plate": vehicle.plate }))
        .client(&client)
        .record(&state.pool)
        .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: vehicle })))
}

/// GET /api/veiculos?include_inactive=
pub async fn list(
    State(state): State<AppState>,
    RequireOffice(_user): RequireOffice,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<Json<DataResponse<Vec<Vehicle>>>> {
    let vehicles = VehicleRepo::list(&state.pool, params.include_inactive).await?;
    Ok(Json(DataResponse { data: vehicles }))
}

/// GET /api/veiculos/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireOffice(_user): RequireOffice,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vehicle>>> {
    let vehicle = VehicleRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: vehicle }))
}

/// PUT /api/veiculos/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireOffice(user): RequireOffice,
    client: ClientInfo,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateVehicle>,
) -> AppResult<Json<DataResponse<Vehicle>>> {
    input.validate()?;
    let vehicle = VehicleRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    AuditEntry::new(action_types::ENTITY_UPDATE)
        .user(user.user_id)
        .entity(entity_types::VEHICLE, id)
        .client(&client)
        .record(&state.pool)
        .await;

    Ok(Json(DataResponse { data: vehicle }))
}
