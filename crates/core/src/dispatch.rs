//! Dispatch assignment statuses and the checkpoint-driven transition rules.
//!
//! An assignment links a driver (and optionally a vehicle) to a service
//! order. It only moves forward, and only by way of a checklist:
//!
//! ```text
//! pending --(departure checklist)--> in_progress --(arrival checklist)--> completed
//! ```

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

/// Driver linked to the order, not yet on the road.
pub const STATUS_PENDING: &str = "pending";
/// Departure checklist recorded, vehicle en route.
pub const STATUS_IN_PROGRESS: &str = "in_progress";
/// Arrival checklist recorded.
pub const STATUS_COMPLETED: &str = "completed";

/// All valid assignment statuses, in workflow order.
pub const VALID_STATUSES: &[&str] = &[STATUS_PENDING, STATUS_IN_PROGRESS, STATUS_COMPLETED];

/// Statuses shown by default in a driver's own assignment list.
pub const DRIVER_LIST_STATUSES: &[&str] = &[STATUS_IN_PROGRESS, STATUS_COMPLETED];

/// Statuses shown in a driver's list when pending work is requested too.
pub const DRIVER_LIST_STATUSES_WITH_PENDING: &[&str] =
    &[STATUS_PENDING, STATUS_IN_PROGRESS, STATUS_COMPLETED];

/// Maximum length for assignment and checklist notes (characters).
pub const MAX_NOTES_LENGTH: usize = 2000;

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// Returns the statuses that `from_status` may move to.
pub fn valid_transitions(from_status: &str) -> &'static [&'static str] {
    match from_status {
        STATUS_PENDING => &[STATUS_IN_PROGRESS],
        STATUS_IN_PROGRESS => &[STATUS_COMPLETED],
        _ => &[],
    }
}

/// Validate that an assignment may move from `current` to `next`.
///
/// Illegal moves are reported as conflicts: the request is well-formed but
/// the assignment is in the wrong state for it.
pub fn validate_transition(current: &str, next: &str) -> Result<(), CoreError> {
    if valid_transitions(current).contains(&next) {
        Ok(())
    } else {
        Err(CoreError::Conflict(format!(
            "Cannot move assignment from '{current}' to '{next}'"
        )))
    }
}

/// Validate that a status string is one of the known statuses.
pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid assignment status '{status}'. Must be one of: {VALID_STATUSES:?}"
        )))
    }
}

/// Only pending assignments may have their vehicle or notes edited.
pub fn validate_editable(status: &str) -> Result<(), CoreError> {
    if status == STATUS_PENDING {
        Ok(())
    } else {
        Err(CoreError::Conflict(format!(
            "Assignment is '{status}' and can no longer be edited"
        )))
    }
}

// ---------------------------------------------------------------------------
// Checkpoints
// ---------------------------------------------------------------------------

/// The two photo checkpoints of a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckpointKind {
    /// Checklist de saída.
    Departure,
    /// Checklist de chegada.
    Arrival,
}

impl CheckpointKind {
    /// Status the assignment must be in for this checkpoint to be recorded.
    pub fn required_status(self) -> &'static str {
        match self {
            Self::Departure => STATUS_PENDING,
            Self::Arrival => STATUS_IN_PROGRESS,
        }
    }

    /// Status the assignment moves to once the checkpoint is recorded.
    pub fn target_status(self) -> &'static str {
        match self {
            Self::Departure => STATUS_IN_PROGRESS,
            Self::Arrival => STATUS_COMPLETED,
        }
    }

    /// Table holding this checkpoint's checklists.
    pub fn table(self) -> &'static str {
        match self {
            Self::Departure => "departure_checklists",
            Self::Arrival => "arrival_checklists",
        }
    }

    /// Assignment column stamped when the checkpoint is recorded.
    pub fn timestamp_column(self) -> &'static str {
        match self {
            Self::Departure => "departure_time",
            Self::Arrival => "arrival_time",
        }
    }

    /// Short label used in stored file names and event names.
    pub fn label(self) -> &'static str {
        match self {
            Self::Departure => "departure",
            Self::Arrival => "arrival",
        }
    }

    /// Platform event published after a successful submission.
    pub fn event_type(self) -> &'static str {
        match self {
            Self::Departure => "dispatch.departed",
            Self::Arrival => "dispatch.arrived",
        }
    }

    /// Whether recording this checkpoint finalizes the parent service order.
    pub fn finalizes_order(self) -> bool {
        matches!(self, Self::Arrival)
    }

    /// Check that an assignment in `current` may record this checkpoint.
    pub fn validate_from(self, current: &str) -> Result<(), CoreError> {
        validate_transition(current, self.target_status())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
