//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod audit_repo;
pub mod chat_repo;
pub mod dispatch_repo;
pub mod driver_repo;
pub mod event_repo;
pub mod role_repo;
pub mod service_order_repo;
pub mod session_repo;
pub mod user_repo;
pub mod vehicle_repo;

pub use audit_repo::AuditLogRepo;
pub use chat_repo::ChatRepo;
pub use dispatch_repo::DispatchRepo;
pub use driver_repo::DriverRepo;
pub use event_repo::EventRepo;
pub use role_repo::RoleRepo;
pub use service_order_repo::ServiceOrderRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
pub use vehicle_repo::VehicleRepo;
