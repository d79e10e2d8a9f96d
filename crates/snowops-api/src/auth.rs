//! Actor extraction: turns request credentials into an [`Actor`].
//!
//! Two strategies are available, chosen once at startup:
//!
//! - [`AuthMode::Header`] trusts the `X-User-ID`, `X-User-Role` and
//!   `X-Org-ID` headers. Development only.
//! - [`AuthMode::Jwt`] verifies an HS256 `Authorization: Bearer` token and
//!   reads the same triple from its `user_id`, `role` and `organization_id`
//!   claims.
//!
//! Both feed [`Actor::from_identity`], so an incomplete triple is rejected
//! the same way regardless of where it came from.

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use snowops_core::{Error, actor::Actor, store::Store};

use crate::{AppState, error::ApiError};

pub const USER_ID_HEADER: &str = "x-user-id";
pub const ROLE_HEADER: &str = "x-user-role";
pub const ORG_ID_HEADER: &str = "x-org-id";

// ─── Strategies ──────────────────────────────────────────────────────────────

pub enum AuthMode {
  Header,
  Jwt(JwtVerifier),
}

impl AuthMode {
  pub fn jwt(secret: &str) -> Self { AuthMode::Jwt(JwtVerifier::new(secret)) }

  /// Resolve the actor for a request from its headers.
  pub fn authenticate(&self, headers: &HeaderMap) -> Result<Actor, Error> {
    match self {
      AuthMode::Header => Actor::from_identity(
        header_str(headers, USER_ID_HEADER),
        header_str(headers, ROLE_HEADER),
        header_str(headers, ORG_ID_HEADER),
      ),
      AuthMode::Jwt(verifier) => {
        let token = bearer_token(headers).ok_or(Error::Unauthenticated)?;
        let claims = verifier.verify(token)?;
        Actor::from_identity(&claims.user_id, &claims.role, &claims.organization_id)
      }
    }
  }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
  headers.get(name).and_then(|v| v.to_str().ok()).unwrap_or_default()
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
  let value = header_str(headers, header::AUTHORIZATION.as_str());
  value
    .strip_prefix("Bearer ")
    .or_else(|| value.strip_prefix("bearer "))
    .map(str::trim)
    .filter(|t| !t.is_empty())
}

// ─── JWT ─────────────────────────────────────────────────────────────────────

/// Claims carried by an access token. Missing string claims decode as empty
/// and are rejected by [`Actor::from_identity`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Claims {
  #[serde(default)]
  pub user_id:         String,
  #[serde(default)]
  pub role:            String,
  #[serde(default)]
  pub organization_id: String,
  /// Expiry as a Unix timestamp; checked only when present.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub exp:             Option<u64>,
}

pub struct JwtVerifier {
  key:        DecodingKey,
  validation: Validation,
}

impl JwtVerifier {
  pub fn new(secret: &str) -> Self {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_required_spec_claims::<&str>(&[]);
    Self { key: DecodingKey::from_secret(secret.as_bytes()), validation }
  }

  pub fn verify(&self, token: &str) -> Result<Claims, Error> {
    decode::<Claims>(token, &self.key, &self.validation)
      .map(|data| data.claims)
      .map_err(|e| {
        tracing::debug!(error = %e, "token rejected");
        Error::Unauthenticated
      })
  }
}

// ─── Extractor ───────────────────────────────────────────────────────────────

/// The authenticated actor of the current request.
pub struct CurrentActor(pub Actor);

impl<S> FromRequestParts<AppState<S>> for CurrentActor
where
  S: Store + Clone + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let actor = state.auth.authenticate(&parts.headers)?;
    Ok(CurrentActor(actor))
  }
}
