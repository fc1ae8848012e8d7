//! Vehicle (viatura) entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sisfun_core::types::{DbId, Timestamp};
use validator::Validate;

/// A row from the `vehicles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Vehicle {
    pub id: DbId,
    pub plate: String,
    pub model: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a vehicle. The plate is normalized before insert.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateVehicle {
    #[validate(length(min = 7, max = 10))]
    pub plate: String,
    #[validate(length(max = 100))]
    pub model: Option<String>,
}

/// DTO for updating a vehicle. All fields optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateVehicle {
    #[validate(length(max = 100))]
    pub model: Option<String>,
    pub is_active: Option<bool>,
}
