//! Repository for the `audit_logs` table.

use sqlx::PgPool;
use sisfun_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};

use crate::models::audit::{AuditLog, AuditQuery, CreateAuditLog};

/// Column list for `audit_logs` SELECT queries.
const COLUMNS: &str = "\
    id, user_id, action_type, entity_type, entity_id, \
    details_json, ip_address, user_agent, created_at";

/// Shared WHERE clause; every filter is optional.
const FILTER: &str = "\
    WHERE ($1::BIGINT IS NULL OR user_id = $1) \
      AND ($2::TEXT IS NULL OR action_type = $2) \
      AND ($3::TEXT IS NULL OR entity_type = $3) \
      AND ($4::BIGINT IS NULL OR entity_id = $4) \
      AND ($5::TIMESTAMPTZ IS NULL OR created_at >= $5) \
      AND ($6::TIMESTAMPTZ IS NULL OR created_at <= $6)";

/// Provides insert and query operations for audit logs.
pub struct AuditLogRepo;

impl AuditLogRepo {
    /// Append one entry.
    pub async fn insert(pool: &PgPool, entry: &CreateAuditLog) -> Result<AuditLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO audit_logs
                (user_id, action_type, entity_type, entity_id, details_json, ip_address, user_agent)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AuditLog>(&query)
            .bind(entry.user_id)
            .bind(&entry.action_type)
            .bind(&entry.entity_type)
            .bind(entry.entity_id)
            .bind(&entry.details_json)
            .bind(&entry.ip_address)
            .bind(&entry.user_agent)
            .fetch_one(pool)
            .await
    }

    /// Query audit logs with filtering and pagination, newest first.
    pub async fn query(pool: &PgPool, params: &AuditQuery) -> Result<Vec<AuditLog>, sqlx::Error> {
        let limit = clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT);
        let offset = clamp_offset(params.offset);
        let query = format!(
            "SELECT {COLUMNS} FROM audit_logs {FILTER}
             ORDER BY created_at DESC, id DESC
             LIMIT $7 OFFSET $8"
        );
        sqlx::query_as::<_, AuditLog>(&query)
            .bind(params.user_id)
            .bind(&params.action_type)
            .bind(&params.entity_type)
            .bind(params.entity_id)
            .bind(params.from)
            .bind(params.to)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count audit logs matching the given filter (for pagination metadata).
    pub async fn count(pool: &PgPool, params: &AuditQuery) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*)::BIGINT FROM audit_logs {FILTER}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(params.user_id)
            .bind(&params.action_type)
            .bind(&params.entity_type)
            .bind(params.entity_id)
            .bind(params.from)
            .bind(params.to)
            .fetch_one(pool)
            .await
    }
}
