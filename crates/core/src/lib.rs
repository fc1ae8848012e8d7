//! Domain rules shared by every layer of the funeral-service backend.
//!
//! Nothing in here touches the network, the database or the filesystem, so
//! the rules can be unit tested in isolation and reused by the repository
//! and HTTP layers alike.

pub mod audit;
pub mod chat;
pub mod checklist;
pub mod dispatch;
pub mod error;
pub mod pagination;
pub mod roles;
pub mod service_order;
pub mod types;
pub mod vehicle;
