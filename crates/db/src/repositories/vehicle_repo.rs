//! Repository for the `vehicles` table.

use sqlx::PgPool;
use sisfun_core::types::DbId;

use crate::models::vehicle::{UpdateVehicle, Vehicle};

const COLUMNS: &str = "id, plate, model, is_active, created_at, updated_at";

/// Provides CRUD operations for vehicles.
pub struct VehicleRepo;

impl VehicleRepo {
    /// Insert a vehicle. `plate` must already be normalized.
    pub async fn create(
        pool: &PgPool,
        plate: &str,
        model: Option<&str>,
    ) -> Result<Vehicle, sqlx::Error> {
        let query = format!(
            "INSERT INTO vehicles (plate, model) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Vehicle>(&query)
            .bind(plate)
            .bind(model)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Vehicle>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM vehicles WHERE id = $1");
        sqlx::query_as::<_, Vehicle>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List vehicles ordered by plate. Inactive ones only when asked for.
    pub async fn list(pool: &PgPool, include_inactive: bool) -> Result<Vec<Vehicle>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM vehicles
             WHERE ($1 OR is_active)
             ORDER BY plate ASC"
        );
        sqlx::query_as::<_, Vehicle>(&query)
            .bind(include_inactive)
            .fetch_all(pool)
            .await
    }

    /// Update a vehicle. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateVehicle,
    ) -> Result<Option<Vehicle>, sqlx::Error> {
        let query = format!(
            "UPDATE vehicles SET
                model = COALESCE($2, model),
                is_active = COALESCE($3, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Vehicle>(&query)
            .bind(id)
            .bind(&input.model)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }
}
