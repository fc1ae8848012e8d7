pub mod audit;
pub mod auth;
pub mod chat;
pub mod dispatch;
pub mod driver_portal;
pub mod drivers;
pub mod service_orders;
pub mod users;
pub mod vehicles;
