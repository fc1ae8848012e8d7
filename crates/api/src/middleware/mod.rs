//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the authenticated user from a Bearer token.
//! - [`rbac::RequireAdmin`] -- requires the `admin` role.
//! - [`rbac::RequireOffice`] -- requires `admin` or `operador`.
//! - [`rbac::RequireDriver`] -- requires `motorista`.

pub mod auth;
pub mod rbac;
