//! Access-token validation against an OpenID Connect realm's JWKS.
//!
//! Tokens are RS256-signed by the identity provider. Key sets are cached per
//! issuer and refetched when a token names a `kid` the cache doesn't know,
//! which covers key rotation without a refresh timer. Refetches for one
//! issuer are at least [`MIN_REFRESH_INTERVAL`] apart, so tokens with made-up
//! key ids cannot drive traffic to the identity provider.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use campus_core::tenant::{issuer_url, jwks_url};
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Timeout for a single JWKS fetch.
pub const JWKS_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Minimum gap between two key-set fetches for the same issuer.
pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("token header has no key id")]
    MissingKeyId,

    #[error("no signing key '{0}' in the realm key set")]
    UnknownKey(String),

    #[error("failed to fetch key set: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("invalid token: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

impl AuthError {
    /// Whether the failure lies with the identity provider rather than the token.
    pub fn is_upstream(&self) -> bool {
        matches!(self, AuthError::Fetch(_))
    }
}

/// Realm roles as carried by the identity provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RealmAccess {
    #[serde(default)]
    pub roles: Vec<String>,
}

/// The claims consumed from an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// External user id.
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub realm_access: RealmAccess,
    pub exp: i64,
}

struct IssuerKeys {
    set: JwkSet,
    fetched_at: Instant,
}

/// Per-issuer cache of realm signing keys.
pub struct JwksCache {
    client: reqwest::Client,
    keys: RwLock<HashMap<String, IssuerKeys>>,
    min_refresh: Duration,
}

impl JwksCache {
    pub fn new(timeout: Duration) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            keys: RwLock::new(HashMap::new()),
            min_refresh: MIN_REFRESH_INTERVAL,
        })
    }

    /// Override the minimum gap between refetches for one issuer.
    pub fn with_min_refresh(mut self, interval: Duration) -> Self {
        self.min_refresh = interval;
        self
    }

    /// Validate `token` for the realm `realm_id` at `provider_url`.
    ///
    /// Checks signature, expiry, and that the issuer is exactly
    /// `{provider_url}/realms/{realm_id}`. The audience is not checked.
    pub async fn verify(
        &self,
        token: &str,
        provider_url: &str,
        realm_id: &str,
    ) -> Result<Claims, AuthError> {
        let header = decode_header(token)?;
        let kid = header.kid.ok_or(AuthError::MissingKeyId)?;
        let issuer = issuer_url(provider_url, realm_id);

        let key = match self.cached_key(&issuer, &kid).await? {
            Some(key) => key,
            None => {
                if self.recently_fetched(&issuer).await {
                    tracing::debug!(%issuer, %kid, "Unknown key id, key set fetched recently");
                    return Err(AuthError::UnknownKey(kid));
                }
                self.refresh(&issuer, &jwks_url(provider_url, realm_id))
                    .await?;
                self.cached_key(&issuer, &kid)
                    .await?
                    .ok_or_else(|| AuthError::UnknownKey(kid.clone()))?
            }
        };

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[issuer.as_str()]);
        validation.validate_aud = false;

        let data = decode::<Claims>(token, &key, &validation)?;
        Ok(data.claims)
    }

    async fn cached_key(&self, issuer: &str, kid: &str) -> Result<Option<DecodingKey>, AuthError> {
        let keys = self.keys.read().await;
        match keys.get(issuer).and_then(|cached| cached.set.find(kid)) {
            Some(jwk) => Ok(Some(DecodingKey::from_jwk(jwk)?)),
            None => Ok(None),
        }
    }

    async fn recently_fetched(&self, issuer: &str) -> bool {
        self.keys
            .read()
            .await
            .get(issuer)
            .is_some_and(|cached| cached.fetched_at.elapsed() < self.min_refresh)
    }

    async fn refresh(&self, issuer: &str, url: &str) -> Result<(), AuthError> {
        tracing::debug!(%issuer, %url, "Fetching realm key set");
        let set: JwkSet = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        tracing::info!(%issuer, keys = set.keys.len(), "Realm key set refreshed");
        self.keys.write().await.insert(
            issuer.to_string(),
            IssuerKeys {
                set,
                fetched_at: Instant::now(),
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const SIGNING_KEY: &[u8] = include_bytes!("../../tests/fixtures/jwt_signing_key.pem");
    const MODULUS: &str = "tVriaFDuYJmREO9qRPTIfS8kGjqWbC_fPP79nVGW9eEa5pMym0WE3Dq3-YKSmLcmDxWtm-siaHBk3ixTUbK_HoIwUCJuuXVnPHmiTcIe_G1mgmpNJUTYL9-EMMK6jwShA7V-FLZ_duJ6HpI-Xbeqk40CKf7o3-JLgLo0dARYzFWTYFW7Rr5LqLyFMpGQElpvdGcxBHYeQ9T37ytvq_H15rjivAvmWKcFw40HFV-N0wY8u_Am1Ar43Kbl_RluN6H0gb68ivVx1BpCKoBz3S27F6KScstezRDQ9LSmkPEHU-YtK-j6pSIeHFePsjNkjO9eCqjDansdTzzKx7ElVi18vQ";
    const REALM: &str = "campus";
    const JWKS_PATH: &str = "/realms/campus/protocol/openid-connect/certs";

    fn jwks_body(kid: &str) -> serde_json::Value {
        json!({
            "keys": [{
                "kid": kid,
                "kty": "RSA",
                "alg": "RS256",
                "use": "sig",
                "n": MODULUS,
                "e": "AQAB",
            }]
        })
    }

    fn sign(kid: &str, issuer: &str, exp_offset: i64) -> String {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(kid.to_string());
        let claims = json!({
            "sub": "f3b1c0de-0000-4000-8000-000000000001",
            "email": "anna@example.org",
            "realm_access": { "roles": ["student", "offline_access"] },
            "iss": issuer,
            "exp": Utc::now().timestamp() + exp_offset,
        });
        let key = EncodingKey::from_rsa_pem(SIGNING_KEY).unwrap();
        encode(&header, &claims, &key).unwrap()
    }

    async fn provider(kid: &str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(JWKS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(jwks_body(kid)))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn valid_token_yields_claims() {
        let server = provider("k1").await;
        let cache = JwksCache::new(JWKS_FETCH_TIMEOUT).unwrap();
        let token = sign("k1", &issuer_url(&server.uri(), REALM), 300);

        let claims = cache.verify(&token, &server.uri(), REALM).await.unwrap();
        assert_eq!(claims.email.as_deref(), Some("anna@example.org"));
        assert_eq!(claims.realm_access.roles, vec!["student", "offline_access"]);
    }

    #[tokio::test]
    async fn key_set_is_cached_per_issuer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(JWKS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(jwks_body("k1")))
            .expect(1)
            .mount(&server)
            .await;

        let cache = JwksCache::new(JWKS_FETCH_TIMEOUT).unwrap();
        let token = sign("k1", &issuer_url(&server.uri(), REALM), 300);
        cache.verify(&token, &server.uri(), REALM).await.unwrap();
        cache.verify(&token, &server.uri(), REALM).await.unwrap();
    }

    #[tokio::test]
    async fn wrong_issuer_is_rejected() {
        let server = provider("k1").await;
        let cache = JwksCache::new(JWKS_FETCH_TIMEOUT).unwrap();
        let token = sign("k1", &issuer_url(&server.uri(), "other"), 300);

        assert_matches!(
            cache.verify(&token, &server.uri(), REALM).await,
            Err(AuthError::Jwt(_))
        );
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let server = provider("k1").await;
        let cache = JwksCache::new(JWKS_FETCH_TIMEOUT).unwrap();
        let token = sign("k1", &issuer_url(&server.uri(), REALM), -3600);

        assert_matches!(
            cache.verify(&token, &server.uri(), REALM).await,
            Err(AuthError::Jwt(_))
        );
    }

    #[tokio::test]
    async fn unknown_kid_after_refresh_is_rejected() {
        let server = provider("k1").await;
        let cache = JwksCache::new(JWKS_FETCH_TIMEOUT).unwrap();
        let token = sign("rotated", &issuer_url(&server.uri(), REALM), 300);

        assert_matches!(
            cache.verify(&token, &server.uri(), REALM).await,
            Err(AuthError::UnknownKey(kid)) if kid == "rotated"
        );
    }

    #[tokio::test]
    async fn unknown_kids_do_not_refetch_within_interval() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(JWKS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(jwks_body("k1")))
            .expect(1)
            .mount(&server)
            .await;

        let cache = JwksCache::new(JWKS_FETCH_TIMEOUT).unwrap();
        let issuer = issuer_url(&server.uri(), REALM);
        for kid in ["made-up-1", "made-up-2", "made-up-3"] {
            let token = sign(kid, &issuer, 300);
            assert_matches!(
                cache.verify(&token, &server.uri(), REALM).await,
                Err(AuthError::UnknownKey(_))
            );
        }

        // Known keys keep working from the cache.
        let token = sign("k1", &issuer, 300);
        assert!(cache.verify(&token, &server.uri(), REALM).await.is_ok());
    }

    #[tokio::test]
    async fn rotated_key_is_picked_up_after_interval() {
        let server = provider("k1").await;
        let cache = JwksCache::new(JWKS_FETCH_TIMEOUT)
            .unwrap()
            .with_min_refresh(Duration::ZERO);
        let issuer = issuer_url(&server.uri(), REALM);
        cache
            .verify(&sign("k1", &issuer, 300), &server.uri(), REALM)
            .await
            .unwrap();

        server.reset().await;
        Mock::given(method("GET"))
            .and(path(JWKS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(jwks_body("k2")))
            .mount(&server)
            .await;

        let claims = cache
            .verify(&sign("k2", &issuer, 300), &server.uri(), REALM)
            .await
            .unwrap();
        assert_eq!(claims.sub, "f3b1c0de-0000-4000-8000-000000000001");
    }

    #[tokio::test]
    async fn unreachable_provider_is_upstream_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(JWKS_PATH))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let cache = JwksCache::new(JWKS_FETCH_TIMEOUT).unwrap();
        let token = sign("k1", &issuer_url(&server.uri(), REALM), 300);
        let err = cache.verify(&token, &server.uri(), REALM).await.unwrap_err();
        assert!(err.is_upstream());
    }

    #[tokio::test]
    async fn garbage_token_is_rejected_without_fetch() {
        let cache = JwksCache::new(JWKS_FETCH_TIMEOUT).unwrap();
        assert_matches!(
            cache.verify("not-a-jwt", "http://127.0.0.1:1", REALM).await,
            Err(AuthError::Jwt(_))
        );
    }
}
