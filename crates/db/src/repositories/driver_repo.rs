//! Repository for the `drivers` table.

use sqlx::PgPool;
use sisfun_core::types::DbId;

use crate::models::driver::{CreateDriver, Driver, UpdateDriver};

const COLUMNS: &str = "id, user_id, name, phone, license_number, is_active, created_at, updated_at";

/// Provides CRUD operations for drivers.
pub struct DriverRepo;

impl DriverRepo {
    pub async fn create(pool: &PgPool, input: &CreateDriver) -> Result<Driver, sqlx::Error> {
        let query = format!(
            "INSERT INTO drivers (user_id, name, phone, license_number)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Driver>(&query)
            .bind(input.user_id)
            .bind(&input.name)
            .bind(&input.phone)
            .bind(&input.license_number)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Driver>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM drivers WHERE id = $1");
        sqlx::query_as::<_, Driver>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Resolve the driver row linked to a login.
    pub async fn find_by_user_id(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<Driver>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM drivers WHERE user_id = $1");
        sqlx::query_as::<_, Driver>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List drivers ordered by name. Inactive ones only when asked for.
    pub async fn list(pool: &PgPool, include_inactive: bool) -> Result<Vec<Driver>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM drivers
             WHERE ($1 OR is_active)
             ORDER BY name ASC, id ASC"
        );
        sqlx::query_as::<_, Driver>(&query)
            .bind(include_inactive)
            .fetch_all(pool)
            .await
    }

    /// Update a driver. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateDriver,
    ) -> Result<Option<Driver>, sqlx::Error> {
        let query = format!(
            "UPDATE drivers SET
                name = COALESCE($2, name),
                phone = COALESCE($3, phone),
                license_number = COALESCE($4, license_number),
                is_active = COALESCE($5, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Driver>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.phone)
            .bind(&input.license_number)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }
}
