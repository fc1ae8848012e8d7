//! Repository for the `service_orders` table.

use sqlx::PgPool;
use sisfun_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use sisfun_core::types::DbId;

use crate::models::service_order::{
    CreateServiceOrder, ServiceOrder, ServiceOrderQuery, UpdateServiceOrder,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, order_number, deceased_name, requester_name, requester_phone, \
    origin_address, destination_address, scheduled_at, status, notes, created_by, \
    created_at, updated_at";

/// Provides CRUD operations for service orders.
pub struct ServiceOrderRepo;

impl ServiceOrderRepo {
    /// Insert a new service order in `open` status.
    pub async fn create(
        pool: &PgPool,
        input: &CreateServiceOrder,
        created_by: Option<DbId>,
    ) -> Result<ServiceOrder, sqlx::Error> {
        let query = format!(
            "INSERT INTO service_orders
                (order_number, deceased_name, requester_name, requester_phone,
                 origin_address, destination_address, scheduled_at, notes, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ServiceOrder>(&query)
            .bind(&input.order_number)
            .bind(&input.deceased_name)
            .bind(&input.requester_name)
            .bind(&input.requester_phone)
            .bind(&input.origin_address)
            .bind(&input.destination_address)
            .bind(input.scheduled_at)
            .bind(&input.notes)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ServiceOrder>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM service_orders WHERE id = $1");
        sqlx::query_as::<_, ServiceOrder>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List orders, newest first, optionally filtered by status.
    pub async fn list(
        pool: &PgPool,
        params: &ServiceOrderQuery,
    ) -> Result<Vec<ServiceOrder>, sqlx::Error> {
        let limit = clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT);
        let offset = clamp_offset(params.offset);
        let query = format!(
            "SELECT {COLUMNS} FROM service_orders
             WHERE ($1::TEXT IS NULL OR status = $1)
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, ServiceOrder>(&query)
            .bind(&params.status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update an order. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateServiceOrder,
    ) -> Result<Option<ServiceOrder>, sqlx::Error> {
        let query = format!(
            "UPDATE service_orders SET
                deceased_name = COALESCE($2, deceased_name),
                requester_name = COALESCE($3, requester_name),
                requester_phone = COALESCE($4, requester_phone),
                origin_address = COALESCE($5, origin_address),
                destination_address = COALESCE($6, destination_address),
                scheduled_at = COALESCE($7, scheduled_at),
                status = COALESCE($8, status),
                notes = COALESCE($9, notes)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ServiceOrder>(&query)
            .bind(id)
            .bind(&input.deceased_name)
            .bind(&input.requester_name)
            .bind(&input.requester_phone)
            .bind(&input.origin_address)
            .bind(&input.destination_address)
            .bind(input.scheduled_at)
            .bind(&input.status)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }
}
