//! Tenant resolution.

use axum::extract::FromRequestParts;
use axum::http::header::HOST;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use campus_core::error::CoreError;
use campus_core::tenant::{slug_from_host, validate_slug};
use campus_db::models::tenant::Tenant;
use campus_db::repositories::TenantRepo;

use crate::config::TenantConfig;
use crate::error::AppError;
use crate::state::AppState;

/// The active tenant addressed by the request.
#[derive(Debug, Clone)]
pub struct CurrentTenant(pub Tenant);

/// Pick the tenant slug for a request.
///
/// With subdomain routing the slug is the first label of `host`; a host
/// without a subdomain falls back to the default slug.
pub fn resolve_slug<'a>(config: &'a TenantConfig, host: Option<&'a str>) -> Result<&'a str, CoreError> {
    let slug = match (config.subdomain_routing, host.and_then(slug_from_host)) {
        (true, Some(slug)) => slug,
        _ => config.default_slug.as_str(),
    };
    validate_slug(slug)?;
    Ok(slug)
}

/// Load the active tenant for a request's `Host` header.
pub async fn load_tenant(state: &AppState, headers: &HeaderMap) -> Result<Tenant, AppError> {
    let host = headers.get(HOST).and_then(|v| v.to_str().ok());
    let slug = resolve_slug(&state.config.tenant, host)?;

    let tenant = TenantRepo::find_active_by_slug(&state.pool, slug)
        .await?
        .ok_or_else(|| CoreError::not_found("Tenant", slug))?;
    Ok(tenant)
}

impl FromRequestParts<AppState> for CurrentTenant {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(CurrentTenant(load_tenant(state, &parts.headers).await?))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn config(subdomain_routing: bool) -> TenantConfig {
        TenantConfig {
            default_slug: "default".to_string(),
            subdomain_routing,
        }
    }

    #[test]
    fn default_slug_without_routing() {
        let config = config(false);
        assert_eq!(resolve_slug(&config, Some("nak.campus.example:8000")).unwrap(), "default");
    }

    #[test]
    fn subdomain_with_routing() {
        let config = config(true);
        assert_eq!(resolve_slug(&config, Some("nak.campus.example:8000")).unwrap(), "nak");
        assert_eq!(resolve_slug(&config, Some("localhost:8000")).unwrap(), "default");
        assert_eq!(resolve_slug(&config, None).unwrap(), "default");
    }

    #[test]
    fn invalid_subdomain_is_rejected() {
        let config = config(true);
        assert_matches!(
            resolve_slug(&config, Some("Bad_Label.campus.example")),
            Err(CoreError::Validation(_))
        );
    }
}
