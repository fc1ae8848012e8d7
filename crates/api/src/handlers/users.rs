//! Handlers for `/admin/users` (account management).
//!
//! All handlers require the `admin` role via [`RequireAdmin`].

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use sisfun_core::audit::{action_types, entity_types};
use sisfun_core::error::CoreError;
use sisfun_db::models::user::{CreateUser, UserResponse};
use sisfun_db::repositories::{RoleRepo, UserRepo};
use validator::Validate;

use crate::audit::{AuditEntry, ClientInfo};
use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /admin/users`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    pub password: String,
    /// Role name: `admin`, `operador` or `motorista`.
    pub role: String,
}

/// POST /api/admin/users
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    client: ClientInfo,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    input.validate()?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let role = RoleRepo::find_by_name(&state.pool, &input.role)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!(
                "Unknown role '{}'",
                input.role
            )))
        })?;

    let hashed = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: input.username,
            email: input.email,
            password_hash: hashed,
            role_id: role.id,
        },
    )
    .await?;

    AuditEntry::new(action_types::ENTITY_CREATE)
        .user(admin.user_id)
        .entity(entity_types::USER, user.id)
        .details(serde_json::json!({ "username": user.username, "role": role.name }))
        .client(&client)
        .record(&state.pool)
        .await;

    let response = UserRepo::find_response_by_id(&state.pool, user.id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user.id,
        }))?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: response })))
}

/// GET /api/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list_responses(&state.pool).await?;
    Ok(Json(DataResponse { data: users }))
}
