//! Driver (motorista) entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sisfun_core::types::{DbId, Timestamp};
use validator::Validate;

/// A row from the `drivers` table.
///
/// `user_id` links the driver to the login used on the driver portal.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Driver {
    pub id: DbId,
    pub user_id: Option<DbId>,
    pub name: String,
    pub phone: Option<String>,
    pub license_number: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a driver.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDriver {
    pub user_id: Option<DbId>,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    #[validate(length(max = 30))]
    pub license_number: Option<String>,
}

/// DTO for updating a driver. All fields optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateDriver {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    #[validate(length(max = 30))]
    pub license_number: Option<String>,
    pub is_active: Option<bool>,
}
