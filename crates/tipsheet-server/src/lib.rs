//! JSON REST layer for the tipsheet betting-tips service.
//!
//! Exposes an axum [`Router`] backed by any [`tipsheet_core::store::Store`].
//! Admin mutations are gated by a bearer token; tier-gated reads are
//! projected through the caller's entitlement before they leave the server.

pub mod auth;
pub mod error;
pub mod handlers;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post, put},
};
use serde::Deserialize;
use tipsheet_core::store::Store;
use tower_http::trace::TraceLayer;

use auth::AuthKeys;
use handlers::{login, results, tips};

// ─── Configuration ────────────────────────────────────────────────────────────

fn default_seed_username() -> String { "admin".to_string() }
fn default_seed_password() -> String { "admin123".to_string() }

/// Runtime server configuration, deserialised from `config.toml` (with
/// `TIPSHEET_*` environment overrides).
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  /// HS256 signing secret for admin and entitlement tokens.
  pub jwt_secret: String,
  /// Credentials seeded at first boot when the admins table is empty.
  #[serde(default = "default_seed_username")]
  pub seed_username: String,
  #[serde(default = "default_seed_password")]
  pub seed_password: String,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: Store> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
  pub keys:   Arc<AuthKeys>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the tipsheet API.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: Store + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Auth
    .route("/api/auth/login", post(login::login::<S>))
    .route("/api/auth/entitlement", post(login::entitlement::<S>))
    // Tips
    .route("/api/tips", get(tips::list::<S>).post(tips::create::<S>))
    .route(
      "/api/tips/{id}",
      put(tips::update::<S>)
        .patch(tips::settle::<S>)
        .delete(tips::delete::<S>),
    )
    // Results
    .route("/api/tips/recent/results", get(results::recent::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use chrono::Local;
  use serde_json::{Value, json};
  use tipsheet_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  async fn make_state() -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    auth::seed_admin(&store, "admin", "secret").await.unwrap();

    AppState {
      store:  Arc::new(store),
      config: Arc::new(ServerConfig {
        host:          "127.0.0.1".to_string(),
        port:          5000,
        store_path:    PathBuf::from(":memory:"),
        jwt_secret:    "test-secret".to_string(),
        seed_username: "admin".to_string(),
        seed_password: "secret".to_string(),
      }),
      keys: Arc::new(AuthKeys::new("test-secret")),
    }
  }

  async fn request(
    state:  AppState<SqliteStore>,
    method: &str,
    uri:    &str,
    token:  Option<&str>,
    body:   Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
      builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = match body {
      Some(value) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(value.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };

    let resp = router(state).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  async fn admin_token(state: &AppState<SqliteStore>) -> String {
    let (status, body) = request(
      state.clone(),
      "POST",
      "/api/auth/login",
      None,
      Some(json!({ "username": "admin", "password": "secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
  }

  fn today_string() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
  }

  fn tip_body(date: &str, home: &str, plan: &str) -> Value {
    json!({
      "date":   date,
      "time":   "18:30",
      "league": "Premier League",
      "home":   home,
      "away":   "Rovers",
      "market": "1X2",
      "pick":   format!("{home} win"),
      "odds":   2.5,
      "plan":   plan,
    })
  }

  // ── Login ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn login_with_valid_credentials_returns_token() {
    let state = make_state().await;
    let token = admin_token(&state).await;
    assert!(!token.is_empty());
  }

  #[tokio::test]
  async fn login_failures_are_uniform() {
    let state = make_state().await;

    let (status_a, body_a) = request(
      state.clone(),
      "POST",
      "/api/auth/login",
      None,
      Some(json!({ "username": "admin", "password": "wrong" })),
    )
    .await;
    let (status_b, body_b) = request(
      state,
      "POST",
      "/api/auth/login",
      None,
      Some(json!({ "username": "nobody", "password": "secret" })),
    )
    .await;

    // Wrong password and unknown user are indistinguishable.
    assert_eq!(status_a, StatusCode::BAD_REQUEST);
    assert_eq!(status_b, StatusCode::BAD_REQUEST);
    assert_eq!(body_a, body_b);
  }

  // ── Auth gate ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn mutating_routes_require_a_valid_token() {
    let state = make_state().await;
    let body = tip_body(&today_string(), "City", "Free");

    let (status, _) =
      request(state.clone(), "POST", "/api/tips", None, Some(body.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = request(
      state.clone(),
      "POST",
      "/api/tips",
      Some("not-a-token"),
      Some(body.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) =
      request(state.clone(), "DELETE", "/api/tips/1", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // A viewer entitlement token is not an admin token.
    let viewer = state
      .keys
      .issue_entitlement(tipsheet_core::tip::Plan::Platinum)
      .unwrap();
    let (status, _) =
      request(state, "POST", "/api/tips", Some(&viewer), Some(body)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
  }

  // ── Create ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_rejects_missing_or_bad_date() {
    let state = make_state().await;
    let token = admin_token(&state).await;

    let mut body = tip_body("", "City", "Free");
    body["date"] = Value::Null;
    let (status, resp) =
      request(state.clone(), "POST", "/api/tips", Some(&token), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["error"], "Invalid date provided");

    let body = tip_body("not-a-date", "City", "Free");
    let (status, _) =
      request(state, "POST", "/api/tips", Some(&token), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn create_rejects_non_positive_odds() {
    let state = make_state().await;
    let token = admin_token(&state).await;

    let mut body = tip_body(&today_string(), "City", "Free");
    body["odds"] = json!(-1.5);
    let (status, _) =
      request(state, "POST", "/api/tips", Some(&token), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn create_then_list_round_trips_with_today_label() {
    let state = make_state().await;
    let token = admin_token(&state).await;

    let (status, resp) = request(
      state.clone(),
      "POST",
      "/api/tips",
      Some(&token),
      Some(tip_body(&today_string(), "City", "Gold")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["message"], "Tip added successfully");
    assert_eq!(resp["tip"]["day"], "Today");

    let (status, listed) =
      request(state, "GET", "/api/tips", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);

    let tip = &listed[0];
    assert_eq!(tip["home"], "City");
    assert_eq!(tip["away"], "Rovers");
    assert_eq!(tip["league"], "Premier League");
    assert_eq!(tip["market"], "1X2");
    assert_eq!(tip["pick"], "City win");
    assert_eq!(tip["odds"], 2.5);
    assert_eq!(tip["plan"], "Gold");
    assert_eq!(tip["status"], "Pending");
    assert_eq!(tip["day"], "Today");
    assert_eq!(tip["locked"], false);
  }

  #[tokio::test]
  async fn create_normalizes_single_digit_hours() {
    let state = make_state().await;
    let token = admin_token(&state).await;

    let mut body = tip_body(&today_string(), "City", "Free");
    body["time"] = json!("9:00");
    let (_, resp) =
      request(state, "POST", "/api/tips", Some(&token), Some(body)).await;
    assert_eq!(resp["tip"]["time"], "09:00");
  }

  // ── Plan filter and tier gating ────────────────────────────────────────────

  async fn seed_three_tiers(state: &AppState<SqliteStore>, token: &str) {
    for (home, plan) in [("FreeMatch", "Free"), ("SilverMatch", "Silver"), ("GoldMatch", "Gold")] {
      let (status, _) = request(
        state.clone(),
        "POST",
        "/api/tips",
        Some(token),
        Some(tip_body(&today_string(), home, plan)),
      )
      .await;
      assert_eq!(status, StatusCode::OK);
    }
  }

  #[tokio::test]
  async fn plan_filter_is_exact() {
    let state = make_state().await;
    let token = admin_token(&state).await;
    seed_three_tiers(&state, &token).await;

    let (_, listed) =
      request(state.clone(), "GET", "/api/tips?plan=Gold", Some(&token), None).await;
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["plan"], "Gold");

    let (_, listed) =
      request(state, "GET", "/api/tips?plan=Silver", Some(&token), None).await;
    assert!(listed.as_array().unwrap().iter().all(|t| t["plan"] == "Silver"));
  }

  #[tokio::test]
  async fn premium_tips_are_locked_for_unentitled_callers() {
    let state = make_state().await;
    let token = admin_token(&state).await;
    seed_three_tiers(&state, &token).await;

    // Anonymous caller: only the Free tip is open.
    let (_, listed) = request(state.clone(), "GET", "/api/tips", None, None).await;
    for tip in listed.as_array().unwrap() {
      let open = tip["plan"] == "Free";
      assert_eq!(tip["locked"], !open, "tip: {tip}");
      assert_eq!(tip["pick"].is_null(), !open);
      assert_eq!(tip["odds"].is_null(), !open);
    }

    // Silver entitlement opens Free + Silver, Gold stays locked.
    let silver = state
      .keys
      .issue_entitlement(tipsheet_core::tip::Plan::Silver)
      .unwrap();
    let (_, listed) =
      request(state.clone(), "GET", "/api/tips", Some(&silver), None).await;
    for tip in listed.as_array().unwrap() {
      let open = tip["plan"] == "Free" || tip["plan"] == "Silver";
      assert_eq!(tip["locked"], !open, "tip: {tip}");
    }

    // Admin sees everything in full.
    let (_, listed) = request(state, "GET", "/api/tips", Some(&token), None).await;
    assert!(listed.as_array().unwrap().iter().all(|t| t["locked"] == false));
  }

  #[tokio::test]
  async fn entitlement_endpoint_mints_viewer_tokens() {
    let state = make_state().await;
    let token = admin_token(&state).await;
    seed_three_tiers(&state, &token).await;

    // Viewers cannot mint tokens.
    let (status, _) = request(
      state.clone(),
      "POST",
      "/api/auth/entitlement",
      None,
      Some(json!({ "plan": "Gold" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, resp) = request(
      state.clone(),
      "POST",
      "/api/auth/entitlement",
      Some(&token),
      Some(json!({ "plan": "Gold" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let viewer = resp["token"].as_str().unwrap();

    let (_, listed) =
      request(state, "GET", "/api/tips", Some(viewer), None).await;
    assert!(listed.as_array().unwrap().iter().all(|t| t["locked"] == false));
  }

  // ── Update / settle / delete ───────────────────────────────────────────────

  #[tokio::test]
  async fn settle_preserves_descriptive_fields() {
    let state = make_state().await;
    let token = admin_token(&state).await;

    let (_, created) = request(
      state.clone(),
      "POST",
      "/api/tips",
      Some(&token),
      Some(tip_body(&today_string(), "City", "Free")),
    )
    .await;
    let id = created["tip"]["id"].as_i64().unwrap();

    let (status, resp) = request(
      state.clone(),
      "PATCH",
      &format!("/api/tips/{id}"),
      Some(&token),
      Some(json!({ "status": "Won", "score": "2-0" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["message"], "Tip status updated successfully");

    let (_, listed) = request(state, "GET", "/api/tips", Some(&token), None).await;
    let tip = &listed.as_array().unwrap()[0];
    assert_eq!(tip["status"], "Won");
    assert_eq!(tip["score"], "2-0");
    // Everything else untouched.
    assert_eq!(tip["home"], "City");
    assert_eq!(tip["pick"], "City win");
    assert_eq!(tip["odds"], 2.5);
    assert_eq!(tip["time"], "18:30");
  }

  #[tokio::test]
  async fn full_update_recomputes_day_label() {
    let state = make_state().await;
    let token = admin_token(&state).await;

    let (_, created) = request(
      state.clone(),
      "POST",
      "/api/tips",
      Some(&token),
      Some(tip_body(&today_string(), "City", "Free")),
    )
    .await;
    let id = created["tip"]["id"].as_i64().unwrap();

    let tomorrow = (Local::now().date_naive() + chrono::Days::new(1))
      .format("%Y-%m-%d")
      .to_string();
    let (status, _) = request(
      state.clone(),
      "PUT",
      &format!("/api/tips/{id}"),
      Some(&token),
      Some(tip_body(&tomorrow, "City", "Free")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, listed) = request(state, "GET", "/api/tips", Some(&token), None).await;
    assert_eq!(listed.as_array().unwrap()[0]["day"], "Tomorrow");
  }

  #[tokio::test]
  async fn id_targeted_routes_answer_404_for_missing_ids() {
    let state = make_state().await;
    let token = admin_token(&state).await;

    let (status, resp) = request(
      state.clone(),
      "PUT",
      "/api/tips/99999",
      Some(&token),
      Some(tip_body(&today_string(), "City", "Free")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(resp["error"], "Tip not found");

    let (status, _) = request(
      state.clone(),
      "PATCH",
      "/api/tips/99999",
      Some(&token),
      Some(json!({ "status": "Won", "score": "1-0" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) =
      request(state, "DELETE", "/api/tips/99999", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn delete_twice_answers_404_the_second_time() {
    let state = make_state().await;
    let token = admin_token(&state).await;

    let (_, created) = request(
      state.clone(),
      "POST",
      "/api/tips",
      Some(&token),
      Some(tip_body(&today_string(), "City", "Free")),
    )
    .await;
    let id = created["tip"]["id"].as_i64().unwrap();
    let uri = format!("/api/tips/{id}");

    let (status, _) =
      request(state.clone(), "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = request(state, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Search ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn search_filters_by_team_and_league_substring() {
    let state = make_state().await;
    let token = admin_token(&state).await;

    let mut arsenal = tip_body(&today_string(), "Arsenal", "Free");
    arsenal["away"] = json!("Chelsea");
    request(state.clone(), "POST", "/api/tips", Some(&token), Some(arsenal)).await;

    let mut milan = tip_body(&today_string(), "Milan", "Free");
    milan["league"] = json!("Serie A");
    request(state.clone(), "POST", "/api/tips", Some(&token), Some(milan)).await;

    let (_, listed) = request(
      state.clone(),
      "GET",
      "/api/tips?search=chel",
      Some(&token),
      None,
    )
    .await;
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["home"], "Arsenal");

    let (_, listed) = request(
      state,
      "GET",
      "/api/tips?search=serie",
      Some(&token),
      None,
    )
    .await;
    assert_eq!(listed.as_array().unwrap()[0]["home"], "Milan");
  }

  // ── Results ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn recent_results_groups_by_tier_with_all_keys_present() {
    let state = make_state().await;
    let token = admin_token(&state).await;

    let (_, created) = request(
      state.clone(),
      "POST",
      "/api/tips",
      Some(&token),
      Some(tip_body(&today_string(), "City", "Gold")),
    )
    .await;
    let id = created["tip"]["id"].as_i64().unwrap();
    request(
      state.clone(),
      "PATCH",
      &format!("/api/tips/{id}"),
      Some(&token),
      Some(json!({ "status": "Won", "score": "2-1" })),
    )
    .await;

    // A pending tip must not appear in results.
    request(
      state.clone(),
      "POST",
      "/api/tips",
      Some(&token),
      Some(tip_body(&today_string(), "United", "Gold")),
    )
    .await;

    let (status, resp) =
      request(state, "GET", "/api/tips/recent/results", None, None).await;
    assert_eq!(status, StatusCode::OK);

    for plan in ["Free", "Silver", "Gold", "Platinum"] {
      assert!(resp.get(plan).is_some(), "missing tier key {plan}");
    }
    let gold = resp["Gold"].as_array().unwrap();
    assert_eq!(gold.len(), 1);
    assert_eq!(gold[0]["fixture"], "City vs Rovers");
    assert_eq!(gold[0]["result"], "2-1");
    assert_eq!(gold[0]["status"], "Won");
    assert!(resp["Free"].as_array().unwrap().is_empty());
  }
}
