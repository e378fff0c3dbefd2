//! Well-known role name constants.
//!
//! Identity-provider tokens carry many realm roles (`offline_access`,
//! `uma_authorization`, ...). Only the names below are meaningful here.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_TEACHER: &str = "teacher";
pub const ROLE_STUDENT: &str = "student";
pub const ROLE_SUPPORT: &str = "support";

/// Every role this backend recognises.
pub const KNOWN_ROLES: [&str; 4] = [ROLE_ADMIN, ROLE_TEACHER, ROLE_STUDENT, ROLE_SUPPORT];

/// Keep only the known roles, deduplicated, in [`KNOWN_ROLES`] order.
pub fn filter_known_roles<S: AsRef<str>>(roles: &[S]) -> Vec<String> {
    KNOWN_ROLES
        .iter()
        .filter(|known| roles.iter().any(|r| r.as_ref() == **known))
        .map(|known| known.to_string())
        .collect()
}
