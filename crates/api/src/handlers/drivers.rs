//! Handlers for `/motoristas` (driver registry). Office roles only.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use sisfun_core::audit::{action_types, entity_types};
use sisfun_core::error::CoreError;
use sisfun_core::roles::ROLE_DRIVER;
use sisfun_core::types::DbId;
use sisfun_db::models::driver::{CreateDriver, Driver, UpdateDriver};
use sisfun_db::repositories::{DriverRepo, RoleRepo, UserRepo};
use validator::Validate;

use crate::audit::{AuditEntry, ClientInfo};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireOffice;
use crate::query::IncludeInactiveParams;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Driver",
        id,
    })
}

/// POST /api/motoristas
///
/// When `user_id` is given it must name a `motorista` login; that login
/// then reaches this driver's assignments through the driver portal.
pub async fn create(
    State(state): State<AppState>,
    RequireOffice(user): RequireOffice,
    client: ClientInfo,
    Json(input): Json<CreateDriver>,
) -> AppResult<(StatusCode, Json<DataResponse<Driver>>)> {
    input.validate()?;

    if let Some(login_id) = input.user_id {
        let login = UserRepo::find_by_id(&state.pool, login_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "User",
                id: login_id,
            }))?;
        let role = RoleRepo::resolve_name(&state.pool, login.role_id).await?;
        if role != ROLE_DRIVER {
            return Err(AppError::Core(CoreError::Validation(format!(
                "User {login_id} has role '{role}', expected '{ROLE_DRIVER}'"
            ))));
        }
    }

    let driver = DriverRepo::create(&state.pool, &input).await?;

    AuditEntry::new(action_types::ENTITY_CREATE)
        .user(user.user_id)
        .entity(entity_types::DRIVER, driver.id)
        .details(serde_json::json!({ "name": driver.name, "user_id": driver.user_id }))
        .client(&client)
        .record(&state.pool)
        .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: driver })))
}

/// GET /api/motoristas?include_inactive=
pub async fn list(
    State(state): State<AppState>,
    RequireOffice(_user): RequireOffice,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<Json<DataResponse<Vec<Driver>>>> {
    let drivers = DriverRepo::list(&state.pool, params.include_inactive).await?;
    Ok(Json(DataResponse { data: drivers }))
}

/// GET /api/motoristas/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireOffice(_user): RequireOffice,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Driver>>> {
    let driver = DriverRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: driver }))
}

/// PUT /api/motoristas/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireOffice(user): RequireOffice,
    client: ClientInfo,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateDriver>,
) -> AppResult<Json<DataResponse<Driver>>> {
    input.validate()?;
    let driver = DriverRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    AuditEntry::new(action_types::ENTITY_UPDATE)
        .user(user.user_id)
        .entity(entity_types::DRIVER, id)
        .client(&client)
        .record(&state.pool)
        .await;

    Ok(Json(DataResponse { data: driver }))
}
