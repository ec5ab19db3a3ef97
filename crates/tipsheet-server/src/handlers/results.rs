//! Handler for `/tips/recent/results` — the public results aggregator.

use std::collections::BTreeMap;

use axum::{Json, extract::State};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tipsheet_core::{
  store::Store,
  tip::{Plan, Tip, TipStatus},
};

use crate::{AppState, error::ApiError};

/// How many settled tips the aggregator reads, newest first.
pub const RESULTS_WINDOW: usize = 100;

/// One settled tip as shown on the public results board. The pick is public
/// here: once a match is settled its premium value has lapsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultEntry {
  pub date:    NaiveDate,
  pub fixture: String,
  pub market:  String,
  pub tip:     String,
  /// Final score, or `"-"` when settlement recorded no score.
  pub result:  String,
  pub status:  TipStatus,
}

impl ResultEntry {
  fn from_tip(tip: &Tip) -> Self {
    Self {
      date:    tip.date,
      fixture: format!("{} vs {}", tip.home, tip.away),
      market:  tip.market.clone(),
      tip:     tip.pick.clone(),
      result:  tip.score.clone().unwrap_or_else(|| "-".to_string()),
      status:  tip.status,
    }
  }
}

/// Group settled tips by plan tier. Every tier key is always present — a
/// tier with no settled tips maps to an empty list, never an absent key.
pub fn group_by_plan(tips: &[Tip]) -> BTreeMap<Plan, Vec<ResultEntry>> {
  let mut grouped: BTreeMap<Plan, Vec<ResultEntry>> =
    Plan::ALL.iter().map(|p| (*p, Vec::new())).collect();
  for tip in tips {
    grouped
      .entry(tip.plan)
      .or_default()
      .push(ResultEntry::from_tip(tip));
  }
  grouped
}

/// `GET /api/tips/recent/results`
pub async fn recent<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<BTreeMap<Plan, Vec<ResultEntry>>>, ApiError>
where
  S: Store + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let tips = state
    .store
    .recent_results(RESULTS_WINDOW)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(group_by_plan(&tips)))
}
