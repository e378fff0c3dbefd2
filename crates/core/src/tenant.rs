//! Tenant slugs and identity-provider addressing.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9-]{0,62}$").expect("valid regex"));

/// Validate a tenant slug (lowercase DNS label).
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if SLUG_RE.is_match(slug) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!("Invalid tenant slug '{slug}'")))
    }
}

/// Extract the tenant slug from a `Host` header value.
///
/// The slug is the first DNS label; ports are ignored. A bare host without
/// a subdomain (e.g. `localhost:8000`) yields `None`.
pub fn slug_from_host(host: &str) -> Option<&str> {
    let hostname = host.split(':').next().unwrap_or(host);
    let (label, rest) = hostname.split_once('.')?;
    if label.is_empty() || rest.is_empty() {
        return None;
    }
    Some(label)
}

/// The token issuer expected for a realm: `{provider_url}/realms/{realm_id}`.
pub fn issuer_url(provider_url: &str, realm_id: &str) -> String {
    format!("{}/realms/{realm_id}", provider_url.trim_end_matches('/'))
}

/// The JWKS endpoint of a realm.
pub fn jwks_url(provider_url: &str, realm_id: &str) -> String {
    format!(
        "{}/protocol/openid-connect/certs",
        issuer_url(provider_url, realm_id)
    )
}
