//! Repository for `dispatch_assignments` and the two checklist tables.

use sqlx::PgPool;
use sisfun_core::dispatch::{CheckpointKind, STATUS_PENDING};
use sisfun_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use sisfun_core::service_order;
use sisfun_core::types::DbId;

use crate::models::dispatch::{
    Checklist, ChecklistPair, CheckpointRecord, CreateDispatchAssignment, DispatchAssignment,
    DispatchDetail, DispatchQuery, NewChecklist, UpdateDispatchAssignment,
};

/// Column list for `dispatch_assignments`.
const COLUMNS: &str = "id, service_order_id, driver_id, vehicle_id, departure_time, \
    arrival_time, status, notes, created_at, updated_at";

/// [`COLUMNS`] prefixed with a table alias, for statements that join.
fn qualified_columns(alias: &str) -> String {
    COLUMNS
        .split(", ")
        .map(|c| format!("{alias}.{c}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Column list for either checklist table.
const CHECKLIST_COLUMNS: &str =
    "id, dispatch_assignment_id, photo1, photo2, photo3, photo4, notes, created_at";

/// Select list and joins producing a [`DispatchDetail`].
const DETAIL_SELECT: &str = "\
    SELECT a.id, a.service_order_id, a.driver_id, a.vehicle_id, a.departure_time, \
           a.arrival_time, a.status, a.notes, a.created_at, a.updated_at, \
           o.order_number, o.deceased_name, o.origin_address, o.destination_address, \
           o.scheduled_at, o.status AS order_status, \
           d.name AS driver_name, \
           v.plate AS vehicle_plate, v.model AS vehicle_model \
    FROM dispatch_assignments a \
    JOIN service_orders o ON o.id = a.service_order_id \
    JOIN drivers d ON d.id = a.driver_id \
    LEFT JOIN vehicles v ON v.id = a.vehicle_id";

/// Provides the dispatch registry and checklist recorder operations.
pub struct DispatchRepo;

impl DispatchRepo {
    // ── Registry ─────────────────────────────────────────────────────

    /// Link a driver to a service order.
    ///
    /// The assignment starts `pending`. In the same transaction an `open`
    /// order moves to `in_progress`; orders already in progress are left
    /// untouched.
    pub async fn create(
        pool: &PgPool,
        input: &CreateDispatchAssignment,
    ) -> Result<DispatchAssignment, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO dispatch_assignments (service_order_id, driver_id, vehicle_id, notes)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let assignment = sqlx::query_as::<_, DispatchAssignment>(&query)
            .bind(input.service_order_id)
            .bind(input.driver_id)
            .bind(input.vehicle_id)
            .bind(&input.notes)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("UPDATE service_orders SET status = $2 WHERE id = $1 AND status = $3")
            .bind(input.service_order_id)
            .bind(service_order::STATUS_IN_PROGRESS)
            .bind(service_order::STATUS_OPEN)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(assignment)
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<DispatchAssignment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM dispatch_assignments WHERE id = $1");
        sqlx::query_as::<_, DispatchAssignment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch one assignment joined with its order, driver and vehicle.
    pub async fn find_detail(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<DispatchDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} WHERE a.id = $1");
        sqlx::query_as::<_, DispatchDetail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a driver's assignments whose status is in `statuses`, newest first.
    pub async fn list_for_driver(
        pool: &PgPool,
        driver_id: DbId,
        statuses: &[&str],
    ) -> Result<Vec<DispatchDetail>, sqlx::Error> {
        let query = format!(
            "{DETAIL_SELECT}
             WHERE a.driver_id = $1 AND a.status = ANY($2)
             ORDER BY a.created_at DESC, a.id DESC"
        );
        sqlx::query_as::<_, DispatchDetail>(&query)
            .bind(driver_id)
            .bind(statuses)
            .fetch_all(pool)
            .await
    }

    /// Office-side listing with optional order, driver and status filters.
    pub async fn list(
        pool: &PgPool,
        params: &DispatchQuery,
    ) -> Result<Vec<DispatchDetail>, sqlx::Error> {
        let limit = clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT);
        let offset = clamp_offset(params.offset);
        let query = format!(
            "{DETAIL_SELECT}
             WHERE ($1::BIGINT IS NULL OR a.service_order_id = $1)
               AND ($2::BIGINT IS NULL OR a.driver_id = $2)
               AND ($3::TEXT IS NULL OR a.status = $3)
             ORDER BY a.created_at DESC, a.id DESC
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, DispatchDetail>(&query)
            .bind(params.service_order_id)
            .bind(params.driver_id)
            .bind(&params.status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Change vehicle and/or notes of a still-pending assignment.
    ///
    /// Returns `None` if the assignment does not exist or has left `pending`.
    pub async fn update_pending(
        pool: &PgPool,
        id: DbId,
        input: &UpdateDispatchAssignment,
    ) -> Result<Option<DispatchAssignment>, sqlx::Error> {
        let query = format!(
            "UPDATE dispatch_assignments SET
                vehicle_id = COALESCE($2, vehicle_id),
                notes = COALESCE($3, notes)
             WHERE id = $1 AND status = $4
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DispatchAssignment>(&query)
            .bind(id)
            .bind(input.vehicle_id)
            .bind(&input.notes)
            .bind(STATUS_PENDING)
            .fetch_optional(pool)
            .await
    }

    // ── Checklist recorder ───────────────────────────────────────────

    /// Record a checkpoint and advance the assignment atomically.
    ///
    /// Within one transaction:
    /// 1. the assignment moves from the checkpoint's required status to its
    ///    target status and the matching timestamp is stamped;
    /// 2. the checklist row is inserted;
    /// 3. for the arrival checkpoint, the parent order becomes `finalized`.
    ///
    /// Returns `None` (and changes nothing) when the assignment is missing,
    /// not in the required status, or its order is already finalized or
    /// cancelled. This covers concurrent submissions and orders closed by
    /// the office after the handler's own checks.
    pub async fn record_checkpoint(
        pool: &PgPool,
        input: &NewChecklist,
    ) -> Result<Option<CheckpointRecord>, sqlx::Error> {
        let kind = input.kind;
        let mut tx = pool.begin().await?;

        let advance = format!(
            "UPDATE dispatch_assignments a SET status = $2, {ts} = NOW()
             FROM service_orders o
             WHERE a.id = $1 AND a.status = $3
               AND o.id = a.service_order_id AND o.status <> ALL($4)
             RETURNING {returning}",
            ts = kind.timestamp_column(),
            returning = qualified_columns("a"),
        );
        let Some(assignment) = sqlx::query_as::<_, DispatchAssignment>(&advance)
            .bind(input.dispatch_assignment_id)
            .bind(kind.target_status())
            .bind(kind.required_status())
            .bind(service_order::CLOSED_STATUSES)
            .fetch_optional(&mut *tx)
            .await?
        else {
            tx.rollback().await?;
            return Ok(None);
        };

        let insert = format!(
            "INSERT INTO {table}
                (dispatch_assignment_id, photo1, photo2, photo3, photo4, notes)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {CHECKLIST_COLUMNS}",
            table = kind.table(),
        );
        let [photo1, photo2, photo3, photo4] = &input.photos;
        let checklist = sqlx::query_as::<_, Checklist>(&insert)
            .bind(input.dispatch_assignment_id)
            .bind(photo1)
            .bind(photo2)
            .bind(photo3)
            .bind(photo4)
            .bind(&input.notes)
            .fetch_one(&mut *tx)
            .await?;

        if kind.finalizes_order() {
            sqlx::query(
                "UPDATE service_orders SET status = $2 WHERE id = $1 AND status <> ALL($3)",
            )
            .bind(assignment.service_order_id)
            .bind(service_order::STATUS_FINALIZED)
            .bind(service_order::CLOSED_STATUSES)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::debug!(
            assignment_id = assignment.id,
            checkpoint = kind.label(),
            status = %assignment.status,
            "Checkpoint recorded"
        );
        Ok(Some(CheckpointRecord {
            checklist,
            assignment,
        }))
    }

    /// Fetch the checklist of one checkpoint, if recorded.
    pub async fn find_checklist(
        pool: &PgPool,
        kind: CheckpointKind,
        assignment_id: DbId,
    ) -> Result<Option<Checklist>, sqlx::Error> {
        let query = format!(
            "SELECT {CHECKLIST_COLUMNS} FROM {table} WHERE dispatch_assignment_id = $1",
            table = kind.table(),
        );
        sqlx::query_as::<_, Checklist>(&query)
            .bind(assignment_id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch both checklists of an assignment.
    pub async fn checklists(pool: &PgPool, assignment_id: DbId) -> Result<ChecklistPair, sqlx::Error> {
        Ok(ChecklistPair {
            departure: Self::find_checklist(pool, CheckpointKind::Departure, assignment_id).await?,
            arrival: Self::find_checklist(pool, CheckpointKind::Arrival, assignment_id).await?,
        })
    }
}
