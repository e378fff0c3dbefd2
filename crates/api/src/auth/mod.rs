//! Authentication primitives.
//!
//! - [`jwks`] -- Identity-provider key cache and access-token validation.

pub mod jwks;

pub use jwks::{AuthError, Claims, JwksCache};
