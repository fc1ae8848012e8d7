//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod audit;
pub mod chat;
pub mod dispatch;
pub mod driver;
pub mod event;
pub mod role;
pub mod service_order;
pub mod session;
pub mod user;
pub mod vehicle;
