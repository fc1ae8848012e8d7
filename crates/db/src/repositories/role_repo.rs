//! Lookups on the seeded `roles` table (`admin`, `operador`, `motorista`).

use sqlx::PgPool;
use sisfun_core::types::DbId;

use crate::models::role::Role;

pub struct RoleRepo;

impl RoleRepo {
    /// Role by name. Names are stored lowercase and matched exactly.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Role>, sqlx::Error> {
        sqlx::query_as::<_, Role>(
            "SELECT id, name, description, created_at FROM roles WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(pool)
        .await
    }

    /// Name of the role behind `role_id`, or `"unknown"` for a dangling id.
    ///
    /// The result feeds JWT claims and RBAC checks, so an unknown role
    /// matches no guard.
    pub async fn resolve_name(pool: &PgPool, role_id: DbId) -> Result<String, sqlx::Error> {
        let name: Option<String> = sqlx::query_scalar("SELECT name FROM roles WHERE id = $1")
            .bind(role_id)
            .fetch_optional(pool)
            .await?;
        Ok(name.unwrap_or_else(|| "unknown".to_string()))
    }
}
