//! Handlers for `/auth` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/api/auth/login` | Body: `{"username","password"}` → `{"token"}` |
//! | `POST` | `/api/auth/entitlement` | Admin-only; mints a viewer token for a plan |

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use tipsheet_core::{store::Store, tip::Plan};

use crate::{AppState, auth::AdminAuth, error::ApiError};

// ─── Login ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  #[serde(default)]
  pub username: String,
  #[serde(default)]
  pub password: String,
}

/// `POST /api/auth/login`
///
/// Uniform failure: a missing user and a wrong password produce the same
/// response, so usernames cannot be enumerated.
pub async fn login<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<LoginBody>,
) -> Result<Json<Value>, ApiError>
where
  S: Store + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let admin = state
    .store
    .find_admin(&body.username)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or(ApiError::InvalidCredentials)?;

  if !crate::auth::verify_password(&body.password, &admin.password_hash) {
    return Err(ApiError::InvalidCredentials);
  }

  let token = state.keys.issue_admin(&admin)?;
  Ok(Json(json!({ "token": token })))
}

// ─── Entitlement ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct EntitlementBody {
  pub plan: Plan,
}

/// `POST /api/auth/entitlement` — admin mints a viewer token for a manually
/// assigned subscription tier. The token is what the public list endpoint
/// verifies; no trusted plan marker ever lives client-side.
pub async fn entitlement<S>(
  _admin: AdminAuth,
  State(state): State<AppState<S>>,
  Json(body): Json<EntitlementBody>,
) -> Result<Json<Value>, ApiError>
where
  S: Store + Clone + Send + Sync + 'static,
{
  let token = state.keys.issue_entitlement(body.plan)?;
  Ok(Json(json!({ "token": token })))
}
