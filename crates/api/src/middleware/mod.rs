//! Request extractors for tenant resolution, authentication, and authorization.
//!
//! - [`tenant::CurrentTenant`] -- Resolves the tenant from the `Host` header or the default slug.
//! - [`auth::AuthUser`] -- Validates the bearer token and upserts the caller.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role.
//! - [`rbac::RequireSupport`] -- Requires `support` or `admin` role.

pub mod auth;
pub mod rbac;
pub mod tenant;
