//! Dispatch assignment and checklist models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sisfun_core::dispatch::{CheckpointKind, MAX_NOTES_LENGTH};
use sisfun_core::types::{DbId, Timestamp};
use validator::{Validate, ValidationError};

fn validate_notes_length(notes: &str) -> Result<(), ValidationError> {
    if notes.chars().count() > MAX_NOTES_LENGTH {
        return Err(ValidationError::new("length"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Assignment
// ---------------------------------------------------------------------------

/// A row from the `dispatch_assignments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DispatchAssignment {
    pub id: DbId,
    pub service_order_id: DbId,
    pub driver_id: DbId,
    pub vehicle_id: Option<DbId>,
    pub departure_time: Option<Timestamp>,
    pub arrival_time: Option<Timestamp>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for linking a driver to a service order. Assignments start `pending`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDispatchAssignment {
    pub service_order_id: DbId,
    pub driver_id: DbId,
    pub vehicle_id: Option<DbId>,
    #[validate(custom(function = "validate_notes_length"))]
    pub notes: Option<String>,
}

/// DTO for editing a pending assignment.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateDispatchAssignment {
    pub vehicle_id: Option<DbId>,
    #[validate(custom(function = "validate_notes_length"))]
    pub notes: Option<String>,
}

/// Filter parameters for the office-side assignment list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DispatchQuery {
    pub service_order_id: Option<DbId>,
    pub driver_id: Option<DbId>,
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// An assignment joined with its service order, driver and vehicle.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DispatchDetail {
    pub id: DbId,
    pub service_order_id: DbId,
    pub driver_id: DbId,
    pub vehicle_id: Option<DbId>,
    pub departure_time: Option<Timestamp>,
    pub arrival_time: Option<Timestamp>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub order_number: String,
    pub deceased_name: String,
    pub origin_address: Option<String>,
    pub destination_address: Option<String>,
    pub scheduled_at: Option<Timestamp>,
    pub order_status: String,
    pub driver_name: String,
    pub vehicle_plate: Option<String>,
    pub vehicle_model: Option<String>,
}

// ---------------------------------------------------------------------------
// Checklists
// ---------------------------------------------------------------------------

/// A row from `departure_checklists` or `arrival_checklists`.
///
/// Both tables share the same shape; the table is picked by
/// [`CheckpointKind`].
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Checklist {
    pub id: DbId,
    pub dispatch_assignment_id: DbId,
    pub photo1: String,
    pub photo2: String,
    pub photo3: String,
    pub photo4: String,
    pub notes: Option<String>,
    pub created_at: Timestamp,
}

/// Input for recording a checkpoint. Photo paths are relative to the
/// upload root.
#[derive(Debug, Clone)]
pub struct NewChecklist {
    pub kind: CheckpointKind,
    pub dispatch_assignment_id: DbId,
    pub photos: [String; 4],
    pub notes: Option<String>,
}

/// Both checklists of an assignment, when recorded.
#[derive(Debug, Clone, Serialize)]
pub struct ChecklistPair {
    pub departure: Option<Checklist>,
    pub arrival: Option<Checklist>,
}

/// Result of a successful checkpoint: the new checklist and the advanced
/// assignment.
#[derive(Debug, Clone, Serialize)]
pub struct CheckpointRecord {
    pub checklist: Checklist,
    pub assignment: DispatchAssignment,
}
