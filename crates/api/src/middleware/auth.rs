//! Bearer-token authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use campus_core::error::CoreError;
use campus_core::roles::filter_known_roles;
use campus_db::models::tenant::Tenant;
use campus_db::models::user::{UpsertUser, User};
use campus_db::repositories::UserRepo;

use super::tenant::CurrentTenant;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user, resolved from an identity-provider access token.
///
/// The token is validated against the tenant realm's key set, then the user
/// row is upserted with the token's email and known roles:
///
/// ```ignore
/// async fn my_handler(auth: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = auth.user.id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
    pub tenant: Tenant,
}

/// Extract the token from an `Authorization: Bearer <token>` value.
pub fn bearer_token(header: Option<&str>) -> Result<&str, CoreError> {
    let header =
        header.ok_or_else(|| CoreError::Unauthorized("Missing Authorization header".into()))?;
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            CoreError::Unauthorized("Invalid Authorization format. Expected: Bearer <token>".into())
        })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts.headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
        let token = bearer_token(header)?.to_string();

        let CurrentTenant(tenant) = CurrentTenant::from_request_parts(parts, state).await?;

        let provider_url = match tenant.identity_provider_url.trim() {
            "" => state.config.idp_url.clone().ok_or_else(|| {
                AppError::InternalError(format!(
                    "No identity provider configured for tenant {}",
                    tenant.slug
                ))
            })?,
            url => url.to_string(),
        };

        let claims = state
            .jwks
            .verify(&token, &provider_url, &tenant.realm_id)
            .await?;

        let user = UserRepo::upsert(
            &state.pool,
            &UpsertUser {
                tenant_id: tenant.id,
                external_id: claims.sub,
                email: claims.email.unwrap_or_default(),
                roles: filter_known_roles(&claims.realm_access.roles),
            },
        )
        .await?;

        Ok(AuthUser { user, tenant })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn bearer_token_parsing() {
        assert_eq!(bearer_token(Some("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
        assert_matches!(bearer_token(None), Err(CoreError::Unauthorized(_)));
        assert_matches!(bearer_token(Some("Basic dXNlcjpwdw==")), Err(CoreError::Unauthorized(_)));
        assert_matches!(bearer_token(Some("Bearer ")), Err(CoreError::Unauthorized(_)));
    }
}
