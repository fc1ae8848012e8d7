//! Handlers for `/ordens-servico` (service orders).
//!
//! Office roles only. Finalized and cancelled orders are read-only.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use sisfun_core::audit::{action_types, entity_types};
use sisfun_core::error::CoreError;
use sisfun_core::service_order;
use sisfun_core::types::DbId;
use sisfun_db::models::service_order::{
    CreateServiceOrder, ServiceOrder, ServiceOrderQuery, UpdateServiceOrder,
};
use sisfun_db::repositories::ServiceOrderRepo;
use validator::Validate;

use crate::audit::{AuditEntry, ClientInfo};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireOffice;
use crate::response::DataResponse;
use crate::state::AppState;

pub(crate) async fn ensure_order_exists(
    state: &AppState,
    id: DbId,
) -> AppResult<ServiceOrder> {
    ServiceOrderRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ServiceOrder",
            id,
        }))
}

/// POST /api/ordens-servico
pub async fn create(
    State(state): State<AppState>,
    RequireOffice(user): RequireOffice,
    client: ClientInfo,
    Json(input): Json<CreateServiceOrder>,
) -> AppResult<(StatusCode, Json<DataResponse<ServiceOrder>>)> {
    input.validate()?;

    let order = ServiceOrderRepo::create(&state.pool, &input, Some(user.user_id)).await?;

    AuditEntry::new(action_types::ENTITY_CREATE)
        .user(user.user_id)
        .entity(entity_types::SERVICE_ORDER, order.id)
        .details(serde_json::json!({ "order_number": order.order_number }))
        .client(&client)
        .record(&state.pool)
        .await;
    tracing::info!(order_id = order.id, order_number = %order.order_number, "Service order created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: order })))
}

/// GET /api/ordens-servico?status=&limit=&offset=
pub async fn list(
    State(state): State<AppState>,
    RequireOffice(_user): RequireOffice,
    Query(params): Query<ServiceOrderQuery>,
) -> AppResult<Json<DataResponse<Vec<ServiceOrder>>>> {
    if let Some(status) = params.status.as_deref() {
        service_order::validate_status(status)?;
    }
    let orders = ServiceOrderRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: orders }))
}

/// GET /api/ordens-servico/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireOffice(_user): RequireOffice,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ServiceOrder>>> {
    let order = ensure_order_exists(&state, id).await?;
    Ok(Json(DataResponse { data: order }))
}

/// PUT /api/ordens-servico/{id}
///
/// Partial update. Rejected with 409 once the order is finalized or
/// cancelled.
pub async fn update(
    State(state): State<AppState>,
    RequireOffice(user): RequireOffice,
    client: ClientInfo,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateServiceOrder>,
) -> AppResult<Json<DataResponse<ServiceOrder>>> {
    input.validate()?;
    if let Some(status) = input.status.as_deref() {
        service_order::validate_status(status)?;
    }

    let existing = ensure_order_exists(&state, id).await?;
    service_order::ensure_open(&existing.status)?;

    let order = ServiceOrderRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ServiceOrder",
            id,
        }))?;

    AuditEntry::new(action_types::ENTITY_UPDATE)
        .user(user.user_id)
        .entity(entity_types::SERVICE_ORDER, id)
        .details(serde_json::json!({ "from_status": existing.status, "status": order.status }))
        .client(&client)
        .record(&state.pool)
        .await;

    Ok(Json(DataResponse { data: order }))
}
