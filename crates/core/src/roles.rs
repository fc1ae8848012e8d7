//! Well-known role name constants.
//!
//! These must match the seed data in `20260301000001_create_roles_and_users.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_OPERATOR: &str = "operador";
pub const ROLE_DRIVER: &str = "motorista";

/// Roles allowed to run the dispatch office (orders, vehicles, assignments).
pub const OFFICE_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_OPERATOR];

/// Returns `true` if `role` may manage orders and assignments.
pub fn is_office_role(role: &str) -> bool {
    OFFICE_ROLES.contains(&role)
}
