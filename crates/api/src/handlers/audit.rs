//! Handler for `/admin/audit-logs`.

use axum::extract::{Query, State};
use axum::Json;
use sisfun_db::models::audit::{AuditLogPage, AuditQuery};
use sisfun_db::repositories::AuditLogRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/admin/audit-logs?user_id=&action_type=&entity_type=&entity_id=&from=&to=&limit=&offset=
///
/// Newest first, with the total match count for paging.
pub async fn query_audit_logs(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<AuditQuery>,
) -> AppResult<Json<DataResponse<AuditLogPage>>> {
    let (items, total) = tokio::try_join!(
        AuditLogRepo::query(&state.pool, &params),
        AuditLogRepo::count(&state.pool, &params),
    )?;
    Ok(Json(DataResponse {
        data: AuditLogPage { items, total },
    }))
}
