//! Handlers for `/tips` CRUD endpoints.
//!
//! | Method | Path | Auth | Notes |
//! |--------|------|------|-------|
//! | `GET`    | `/api/tips` | optional bearer | `?date\|day, plan, status, search` |
//! | `POST`   | `/api/tips` | admin | 400 on missing/unparseable date |
//! | `PUT`    | `/api/tips/{id}` | admin | full overwrite, 404 on no match |
//! | `PATCH`  | `/api/tips/{id}` | admin | status + score only, 404 on no match |
//! | `DELETE` | `/api/tips/{id}` | admin | hard delete, 404 on no match |

use axum::{
  Json,
  extract::{Path, Query, State},
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::{Value, json};
use tipsheet_core::{
  day::{DayLabel, normalize_time},
  store::{Store, TipQuery},
  tip::{Entitlement, NewTip, Plan, Settlement, TipStatus, TipView},
};

use crate::{
  AppState,
  auth::{AdminAuth, Caller},
  error::ApiError,
};

fn parse_date(raw: &str) -> Result<NaiveDate, ApiError> {
  NaiveDate::parse_from_str(raw, "%Y-%m-%d")
    .map_err(|_| ApiError::InvalidInput("Invalid date provided".to_string()))
}

fn store_err<E: std::error::Error + Send + Sync + 'static>(e: E) -> ApiError {
  ApiError::Store(Box::new(e))
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub date:   Option<String>,
  /// Relative day label: `Today`, `Tomorrow`, or a weekday name.
  pub day:    Option<String>,
  pub plan:   Option<Plan>,
  pub status: Option<TipStatus>,
  pub search: Option<String>,
}

/// `GET /api/tips[?date=…&day=…&plan=…&status=…&search=…]`
///
/// Tips above the caller's entitled tier come back locked: `pick` and `odds`
/// withheld, `locked: true`. The premium payload never crosses the wire.
pub async fn list<S>(
  Caller(entitlement): Caller,
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<TipView>>, ApiError>
where
  S: Store + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let today = Local::now().date_naive();

  let mut query = TipQuery {
    plan: params.plan,
    status: params.status,
    search: params.search.filter(|s| !s.trim().is_empty()),
    ..Default::default()
  };
  if let Some(raw) = params.date.as_deref() {
    query.date = Some(parse_date(raw)?);
  }
  if let Some(raw) = params.day.as_deref() {
    let label: DayLabel = raw
      .parse()
      .map_err(|_| ApiError::InvalidInput("Invalid day provided".to_string()))?;
    query = query.with_day_label(label, today);
  }

  let tips = state.store.list_tips(&query).await.map_err(store_err)?;
  let views = tips
    .iter()
    .map(|tip| TipView::project(tip, today, entitlement))
    .collect();
  Ok(Json(views))
}

// ─── Create / update body ─────────────────────────────────────────────────────

/// Shared body for create and full update. `date` and `odds` are validated
/// here rather than typed, so a bad value answers 400 with a message instead
/// of a deserializer rejection.
#[derive(Debug, Deserialize)]
pub struct TipBody {
  pub date:   Option<String>,
  #[serde(default)]
  pub time:   String,
  #[serde(default)]
  pub league: String,
  #[serde(default)]
  pub home:   String,
  #[serde(default)]
  pub away:   String,
  #[serde(default)]
  pub market: String,
  #[serde(default)]
  pub pick:   String,
  pub odds:   Option<f64>,
  pub plan:   Option<Plan>,
  pub status: Option<TipStatus>,
  pub score:  Option<String>,
}

impl TipBody {
  fn into_new_tip(self) -> Result<NewTip, ApiError> {
    let date = self
      .date
      .as_deref()
      .map(parse_date)
      .transpose()?
      .ok_or_else(|| ApiError::InvalidInput("Invalid date provided".to_string()))?;
    let odds = self
      .odds
      .ok_or_else(|| ApiError::InvalidInput("Invalid odds provided".to_string()))?;

    let tip = NewTip {
      date,
      time: normalize_time(&self.time),
      league: self.league,
      home: self.home,
      away: self.away,
      market: self.market,
      pick: self.pick,
      odds,
      plan: self.plan.unwrap_or_default(),
      status: self.status.unwrap_or_default(),
      score: self.score,
    };
    tip
      .validate()
      .map_err(|e| ApiError::InvalidInput(e.to_string()))?;
    Ok(tip)
  }
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /api/tips`
pub async fn create<S>(
  _admin: AdminAuth,
  State(state): State<AppState<S>>,
  Json(body): Json<TipBody>,
) -> Result<Json<Value>, ApiError>
where
  S: Store + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let input = body.into_new_tip()?;
  let tip = state.store.create_tip(input).await.map_err(store_err)?;

  // The created row rides along with the ack so the admin UI can merge it
  // without refetching — including the derived day label.
  let today = Local::now().date_naive();
  Ok(Json(json!({
    "message": "Tip added successfully",
    "tip": TipView::project(&tip, today, Entitlement::Admin),
  })))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /api/tips/{id}` — full overwrite including status and score.
pub async fn update<S>(
  _admin: AdminAuth,
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
  Json(body): Json<TipBody>,
) -> Result<Json<Value>, ApiError>
where
  S: Store + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let input = body.into_new_tip()?;
  let matched = state.store.update_tip(id, input).await.map_err(store_err)?;
  if !matched {
    return Err(ApiError::NotFound);
  }
  Ok(Json(json!({ "message": "Tip updated successfully" })))
}

// ─── Settle ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SettleBody {
  pub status: Option<TipStatus>,
  pub score:  Option<String>,
}

/// `PATCH /api/tips/{id}` — narrow settlement update; every descriptive
/// field is left untouched.
pub async fn settle<S>(
  _admin: AdminAuth,
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
  Json(body): Json<SettleBody>,
) -> Result<Json<Value>, ApiError>
where
  S: Store + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let status = body
    .status
    .ok_or_else(|| ApiError::InvalidInput("Invalid status provided".to_string()))?;

  let matched = state
    .store
    .settle_tip(id, Settlement { status, score: body.score })
    .await
    .map_err(store_err)?;
  if !matched {
    return Err(ApiError::NotFound);
  }
  Ok(Json(json!({ "message": "Tip status updated successfully" })))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /api/tips/{id}` — hard delete; no child entities, no cascade.
pub async fn delete<S>(
  _admin: AdminAuth,
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError>
where
  S: Store + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let matched = state.store.delete_tip(id).await.map_err(store_err)?;
  if !matched {
    return Err(ApiError::NotFound);
  }
  Ok(Json(json!({ "message": "Tip deleted successfully" })))
}
