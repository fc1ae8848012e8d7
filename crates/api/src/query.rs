//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Query parameters for list endpoints that support an `include_inactive` flag.
///
/// Used by the vehicle and driver lists.
#[derive(Debug, Deserialize)]
pub struct IncludeInactiveParams {
    #[serde(default)]
    pub include_inactive: bool,
}

/// Query parameters of the driver's own assignment list.
#[derive(Debug, Default, Deserialize)]
pub struct DriverAssignmentParams {
    /// Also return assignments that have not departed yet.
    #[serde(default)]
    pub include_pending: bool,
}
