//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does not
//! match, so authorization is enforced by the handler signature.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sisfun_core::error::CoreError;
use sisfun_core::roles::{is_office_role, ROLE_ADMIN, ROLE_DRIVER};
use sisfun_core::types::DbId;
use sisfun_db::repositories::DriverRepo;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `admin` role. Rejects with 403 otherwise.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ADMIN {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}

/// Requires a dispatch office role (`admin` or `operador`).
///
/// ```ignore
/// async fn create_order(RequireOffice(user): RequireOffice) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireOffice(pub AuthUser);

impl FromRequestParts<AppState> for RequireOffice {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !is_office_role(&user.role) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Office role required".into(),
            )));
        }
        Ok(RequireOffice(user))
    }
}

/// Requires the `motorista` role and resolves the caller's driver record.
///
/// A driver login with no active driver row is rejected with 403.
pub struct RequireDriver {
    pub user: AuthUser,
    pub driver_id: DbId,
}

impl FromRequestParts<AppState> for RequireDriver {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_DRIVER {
            return Err(AppError::Core(CoreError::Forbidden(
                "Driver role required".into(),
            )));
        }
        let driver = DriverRepo::find_by_user_id(&state.pool, user.user_id)
            .await?
            .filter(|d| d.is_active)
            .ok_or_else(|| {
                AppError::Core(CoreError::Forbidden(
                    "No active driver is linked to this login".into(),
                ))
            })?;
        Ok(RequireDriver {
            user,
            driver_id: driver.id,
        })
    }
}
