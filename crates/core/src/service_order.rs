//! Service order (Ordem de Serviço) status constants and rules.

use crate::error::CoreError;

/// Order registered, no driver on the road yet.
pub const STATUS_OPEN: &str = "open";
/// At least one driver has been dispatched.
pub const STATUS_IN_PROGRESS: &str = "in_progress";
/// Arrival recorded; the order is closed.
pub const STATUS_FINALIZED: &str = "finalized";
/// Order called off.
pub const STATUS_CANCELLED: &str = "cancelled";

/// All valid service order statuses.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_OPEN,
    STATUS_IN_PROGRESS,
    STATUS_FINALIZED,
    STATUS_CANCELLED,
];

/// Validate that a status string is one of the known statuses.
pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid service order status '{status}'. Must be one of: {VALID_STATUSES:?}"
        )))
    }
}

/// Statuses after which the order is read-only.
pub const CLOSED_STATUSES: &[&str] = &[STATUS_FINALIZED, STATUS_CANCELLED];

/// Whether the order is closed to further changes and new assignments.
pub fn is_closed(status: &str) -> bool {
    CLOSED_STATUSES.contains(&status)
}

/// Reject edits and new assignments on a closed order.
pub fn ensure_open(status: &str) -> Result<(), CoreError> {
    if is_closed(status) {
        Err(CoreError::Conflict(format!(
            "Service order is '{status}' and can no longer be changed"
        )))
    } else {
        Ok(())
    }
}
