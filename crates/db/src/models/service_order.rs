//! Service order (Ordem de Serviço) entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sisfun_core::types::{DbId, Timestamp};
use validator::Validate;

/// A row from the `service_orders` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ServiceOrder {
    pub id: DbId,
    pub order_number: String,
    pub deceased_name: String,
    pub requester_name: Option<String>,
    pub requester_phone: Option<String>,
    pub origin_address: Option<String>,
    pub destination_address: Option<String>,
    pub scheduled_at: Option<Timestamp>,
    pub status: String,
    pub notes: Option<String>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a service order. New orders always start `open`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateServiceOrder {
    #[validate(length(min = 1, max = 50))]
    pub order_number: String,
    #[validate(length(min = 1, max = 200))]
    pub deceased_name: String,
    #[validate(length(max = 200))]
    pub requester_name: Option<String>,
    #[validate(length(max = 30))]
    pub requester_phone: Option<String>,
    #[validate(length(max = 500))]
    pub origin_address: Option<String>,
    #[validate(length(max = 500))]
    pub destination_address: Option<String>,
    pub scheduled_at: Option<Timestamp>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// DTO for updating a service order. All fields optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateServiceOrder {
    #[validate(length(min = 1, max = 200))]
    pub deceased_name: Option<String>,
    #[validate(length(max = 200))]
    pub requester_name: Option<String>,
    #[validate(length(max = 30))]
    pub requester_phone: Option<String>,
    #[validate(length(max = 500))]
    pub origin_address: Option<String>,
    #[validate(length(max = 500))]
    pub destination_address: Option<String>,
    pub scheduled_at: Option<Timestamp>,
    pub status: Option<String>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// Filter parameters for listing service orders.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceOrderQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
