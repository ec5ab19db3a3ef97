//! Bearer-token auth: argon2 password verification, HS256 token issuance,
//! and the axum extractors that gate routes.
//!
//! Two token shapes share one claims struct. An *admin* token (issued by
//! login) gates every mutating route. A *viewer* token (minted by an admin
//! for a subscriber) carries an entitled plan tier and widens what the public
//! list endpoint returns in full. Expiry is the only lifecycle bound — there
//! is no refresh and no revocation list.

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use tipsheet_core::{
  admin::Admin,
  store::Store,
  tip::{Entitlement, Plan},
};

use crate::{AppState, error::ApiError};

/// Fixed token lifetime.
pub const TOKEN_TTL_HOURS: i64 = 24;

// ─── Claims ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Admin,
  Viewer,
}

/// JWT payload. `sub` is the admin id for admin tokens and `0` for viewer
/// entitlement tokens (which identify a tier, not a person).
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
  pub sub:      i64,
  pub role:     Role,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub username: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub plan:     Option<Plan>,
  pub exp:      usize,
}

impl Claims {
  /// The entitlement this token grants on tier-gated reads.
  pub fn entitlement(&self) -> Entitlement {
    match self.role {
      Role::Admin => Entitlement::Admin,
      Role::Viewer => Entitlement::Viewer(self.plan.unwrap_or_default()),
    }
  }
}

// ─── Keys ────────────────────────────────────────────────────────────────────

/// HS256 signing/verification keys derived from the configured secret.
pub struct AuthKeys {
  encoding: EncodingKey,
  decoding: DecodingKey,
}

impl AuthKeys {
  pub fn new(secret: &str) -> Self {
    Self {
      encoding: EncodingKey::from_secret(secret.as_bytes()),
      decoding: DecodingKey::from_secret(secret.as_bytes()),
    }
  }

  fn expiry() -> usize {
    (Utc::now() + Duration::hours(TOKEN_TTL_HOURS)).timestamp() as usize
  }

  /// Issue an admin token binding the admin's id and username.
  pub fn issue_admin(&self, admin: &Admin) -> Result<String, ApiError> {
    let claims = Claims {
      sub:      admin.id,
      role:     Role::Admin,
      username: Some(admin.username.clone()),
      plan:     None,
      exp:      Self::expiry(),
    };
    jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)
      .map_err(|e| ApiError::Store(Box::new(e)))
  }

  /// Issue a viewer entitlement token for `plan`.
  pub fn issue_entitlement(&self, plan: Plan) -> Result<String, ApiError> {
    let claims = Claims {
      sub:      0,
      role:     Role::Viewer,
      username: None,
      plan:     Some(plan),
      exp:      Self::expiry(),
    };
    jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)
      .map_err(|e| ApiError::Store(Box::new(e)))
  }

  /// Decode and validate a token (signature + expiry).
  pub fn decode(&self, token: &str) -> Result<Claims, ApiError> {
    jsonwebtoken::decode::<Claims>(token, &self.decoding, &Validation::default())
      .map(|data| data.claims)
      .map_err(|_| ApiError::Unauthorized)
  }
}

// ─── Passwords ───────────────────────────────────────────────────────────────

/// Hash a password into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
  let salt = SaltString::generate(&mut OsRng);
  Ok(
    Argon2::default()
      .hash_password(password.as_bytes(), &salt)?
      .to_string(),
  )
}

/// Constant-shape verification: parse failures and mismatches both report
/// `false` so login can answer uniformly.
pub fn verify_password(password: &str, phc_hash: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(phc_hash) else {
    return false;
  };
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .is_ok()
}

// ─── Bootstrap ───────────────────────────────────────────────────────────────

/// Seed the first admin if the admins table is empty, so a fresh deployment
/// is never locked out. Returns `true` if a row was created.
pub async fn seed_admin<S>(
  store: &S,
  username: &str,
  password: &str,
) -> anyhow::Result<bool>
where
  S: Store,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if store.count_admins().await? > 0 {
    return Ok(false);
  }
  let hash = hash_password(password)
    .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?;
  store.add_admin(username.to_string(), hash).await?;
  Ok(true)
}

// ─── Extractors ──────────────────────────────────────────────────────────────

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
  headers
    .get(header::AUTHORIZATION)?
    .to_str()
    .ok()?
    .strip_prefix("Bearer ")
}

/// Present in a handler signature means the request carried a valid admin
/// token. Rejects with 401 otherwise.
pub struct AdminAuth {
  pub admin_id: i64,
  pub username: String,
}

impl<S> FromRequestParts<AppState<S>> for AdminAuth
where
  S: Store + Clone + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let token = bearer_token(&parts.headers).ok_or(ApiError::Unauthorized)?;
    let claims = state.keys.decode(token)?;
    if claims.role != Role::Admin {
      return Err(ApiError::Unauthorized);
    }
    Ok(AdminAuth {
      admin_id: claims.sub,
      username: claims.username.unwrap_or_default(),
    })
  }
}

/// The caller's entitlement on tier-gated reads. Never rejects: a missing,
/// malformed, or expired token degrades the read to `Free` rather than
/// failing it.
pub struct Caller(pub Entitlement);

impl<S> FromRequestParts<AppState<S>> for Caller
where
  S: Store + Clone + Send + Sync + 'static,
{
  type Rejection = std::convert::Infallible;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let entitlement = bearer_token(&parts.headers)
      .and_then(|token| state.keys.decode(token).ok())
      .map(|claims| claims.entitlement())
      .unwrap_or(Entitlement::Viewer(Plan::Free));
    Ok(Caller(entitlement))
  }
}
