//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use tipsheet_core::{
  day::DayLabel,
  store::{Store, TipQuery},
  tip::{NewTip, Plan, Settlement, TipStatus},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn tip(date: NaiveDate, time: &str, home: &str, plan: Plan) -> NewTip {
  NewTip {
    date,
    time:   time.into(),
    league: "Premier League".into(),
    home:   home.into(),
    away:   "Rovers".into(),
    market: "1X2".into(),
    pick:   format!("{home} win"),
    odds:   1.85,
    plan,
    status: TipStatus::Pending,
    score:  None,
  }
}

// ─── Create / list ───────────────────────────────────────────────────────────

#[tokio::test]
async fn create_assigns_sequential_ids() {
  let s = store().await;

  let a = s.create_tip(tip(d(2024, 6, 10), "18:30", "City", Plan::Free)).await.unwrap();
  let b = s.create_tip(tip(d(2024, 6, 10), "20:00", "United", Plan::Free)).await.unwrap();

  assert!(a.id > 0);
  assert!(b.id > a.id);
}

#[tokio::test]
async fn create_then_list_round_trips_fields() {
  let s = store().await;

  let input = tip(d(2024, 6, 10), "18:30", "City", Plan::Gold);
  s.create_tip(input.clone()).await.unwrap();

  let all = s.list_tips(&TipQuery::default()).await.unwrap();
  assert_eq!(all.len(), 1);

  let got = &all[0];
  assert_eq!(got.date, input.date);
  assert_eq!(got.time, input.time);
  assert_eq!(got.league, input.league);
  assert_eq!(got.home, input.home);
  assert_eq!(got.away, input.away);
  assert_eq!(got.market, input.market);
  assert_eq!(got.pick, input.pick);
  assert_eq!(got.odds, input.odds);
  assert_eq!(got.plan, Plan::Gold);
  assert_eq!(got.status, TipStatus::Pending);
  assert_eq!(got.score, None);
}

#[tokio::test]
async fn list_orders_by_date_then_time() {
  let s = store().await;

  s.create_tip(tip(d(2024, 6, 11), "09:00", "C", Plan::Free)).await.unwrap();
  s.create_tip(tip(d(2024, 6, 10), "20:00", "B", Plan::Free)).await.unwrap();
  s.create_tip(tip(d(2024, 6, 10), "09:00", "A", Plan::Free)).await.unwrap();

  let all = s.list_tips(&TipQuery::default()).await.unwrap();
  let homes: Vec<_> = all.iter().map(|t| t.home.as_str()).collect();
  assert_eq!(homes, ["A", "B", "C"]);
}

#[tokio::test]
async fn zero_padded_times_sort_chronologically() {
  let s = store().await;

  // "9:00" is normalized to "09:00" at the service boundary before it
  // reaches the store; the store's lexicographic sort then holds.
  s.create_tip(tip(d(2024, 6, 10), "18:00", "Late", Plan::Free)).await.unwrap();
  s.create_tip(tip(d(2024, 6, 10), "09:00", "Early", Plan::Free)).await.unwrap();

  let all = s.list_tips(&TipQuery::default()).await.unwrap();
  let homes: Vec<_> = all.iter().map(|t| t.home.as_str()).collect();
  assert_eq!(homes, ["Early", "Late"]);
}

// ─── Filters ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn filter_by_exact_date() {
  let s = store().await;

  s.create_tip(tip(d(2024, 6, 10), "18:30", "A", Plan::Free)).await.unwrap();
  s.create_tip(tip(d(2024, 6, 11), "18:30", "B", Plan::Free)).await.unwrap();

  let query = TipQuery { date: Some(d(2024, 6, 10)), ..Default::default() };
  let got = s.list_tips(&query).await.unwrap();
  assert_eq!(got.len(), 1);
  assert_eq!(got[0].home, "A");
}

#[tokio::test]
async fn filter_by_plan_is_exact() {
  let s = store().await;

  s.create_tip(tip(d(2024, 6, 10), "18:30", "A", Plan::Silver)).await.unwrap();
  s.create_tip(tip(d(2024, 6, 10), "19:30", "B", Plan::Gold)).await.unwrap();
  s.create_tip(tip(d(2024, 6, 10), "20:30", "C", Plan::Platinum)).await.unwrap();

  let query = TipQuery { plan: Some(Plan::Gold), ..Default::default() };
  let got = s.list_tips(&query).await.unwrap();
  assert_eq!(got.len(), 1);
  assert!(got.iter().all(|t| t.plan == Plan::Gold));
}

#[tokio::test]
async fn filter_by_status() {
  let s = store().await;

  let a = s.create_tip(tip(d(2024, 6, 10), "18:30", "A", Plan::Free)).await.unwrap();
  s.create_tip(tip(d(2024, 6, 10), "19:30", "B", Plan::Free)).await.unwrap();
  s.settle_tip(a.id, Settlement { status: TipStatus::Won, score: Some("2-1".into()) })
    .await
    .unwrap();

  let query = TipQuery { status: Some(TipStatus::Pending), ..Default::default() };
  let got = s.list_tips(&query).await.unwrap();
  assert_eq!(got.len(), 1);
  assert_eq!(got[0].home, "B");
}

#[tokio::test]
async fn filter_by_weekday_label() {
  let s = store().await;

  // 2024-06-10 is a Monday, 2024-06-14 a Friday.
  s.create_tip(tip(d(2024, 6, 10), "18:30", "MondayMatch", Plan::Free)).await.unwrap();
  s.create_tip(tip(d(2024, 6, 14), "18:30", "FridayMatch", Plan::Free)).await.unwrap();

  let today = d(2024, 6, 8);
  let label: DayLabel = "Friday".parse().unwrap();
  let query = TipQuery::default().with_day_label(label, today);
  let got = s.list_tips(&query).await.unwrap();
  assert_eq!(got.len(), 1);
  assert_eq!(got[0].home, "FridayMatch");
}

#[tokio::test]
async fn filter_by_today_label_resolves_against_reference_date() {
  let s = store().await;

  s.create_tip(tip(d(2024, 6, 10), "18:30", "A", Plan::Free)).await.unwrap();
  s.create_tip(tip(d(2024, 6, 11), "18:30", "B", Plan::Free)).await.unwrap();

  let today = d(2024, 6, 10);
  let query = TipQuery::default().with_day_label(DayLabel::Tomorrow, today);
  let got = s.list_tips(&query).await.unwrap();
  assert_eq!(got.len(), 1);
  assert_eq!(got[0].home, "B");
}

#[tokio::test]
async fn search_matches_home_away_and_league() {
  let s = store().await;

  let mut arsenal = tip(d(2024, 6, 10), "18:30", "Arsenal", Plan::Free);
  arsenal.away = "Chelsea".into();
  s.create_tip(arsenal).await.unwrap();

  let mut seria = tip(d(2024, 6, 10), "19:30", "Milan", Plan::Free);
  seria.league = "Serie A".into();
  s.create_tip(seria).await.unwrap();

  let query = TipQuery { search: Some("chel".into()), ..Default::default() };
  assert_eq!(s.list_tips(&query).await.unwrap().len(), 1);

  let query = TipQuery { search: Some("serie".into()), ..Default::default() };
  let got = s.list_tips(&query).await.unwrap();
  assert_eq!(got.len(), 1);
  assert_eq!(got[0].home, "Milan");

  let query = TipQuery { search: Some("nomatch".into()), ..Default::default() };
  assert!(s.list_tips(&query).await.unwrap().is_empty());
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_overwrites_every_field() {
  let s = store().await;

  let created = s.create_tip(tip(d(2024, 6, 10), "18:30", "A", Plan::Free)).await.unwrap();

  let mut replacement = tip(d(2024, 6, 12), "20:00", "X", Plan::Platinum);
  replacement.status = TipStatus::Won;
  replacement.score = Some("3-0".into());
  assert!(s.update_tip(created.id, replacement).await.unwrap());

  let all = s.list_tips(&TipQuery::default()).await.unwrap();
  assert_eq!(all.len(), 1);
  let got = &all[0];
  assert_eq!(got.id, created.id);
  assert_eq!(got.date, d(2024, 6, 12));
  assert_eq!(got.home, "X");
  assert_eq!(got.plan, Plan::Platinum);
  assert_eq!(got.status, TipStatus::Won);
  assert_eq!(got.score.as_deref(), Some("3-0"));
}

#[tokio::test]
async fn update_missing_tip_reports_no_match() {
  let s = store().await;
  let matched = s
    .update_tip(99_999, tip(d(2024, 6, 10), "18:30", "A", Plan::Free))
    .await
    .unwrap();
  assert!(!matched);
}

// ─── Settlement ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn settle_touches_only_status_and_score() {
  let s = store().await;

  let created = s.create_tip(tip(d(2024, 6, 10), "18:30", "A", Plan::Gold)).await.unwrap();
  let matched = s
    .settle_tip(created.id, Settlement {
      status: TipStatus::Won,
      score:  Some("2-0".into()),
    })
    .await
    .unwrap();
  assert!(matched);

  let all = s.list_tips(&TipQuery::default()).await.unwrap();
  let got = &all[0];
  assert_eq!(got.status, TipStatus::Won);
  assert_eq!(got.score.as_deref(), Some("2-0"));
  // Descriptive fields unchanged.
  assert_eq!(got.date, created.date);
  assert_eq!(got.time, created.time);
  assert_eq!(got.home, created.home);
  assert_eq!(got.pick, created.pick);
  assert_eq!(got.odds, created.odds);
  assert_eq!(got.plan, Plan::Gold);
}

#[tokio::test]
async fn settle_missing_tip_reports_no_match() {
  let s = store().await;
  let matched = s
    .settle_tip(42, Settlement { status: TipStatus::Lost, score: None })
    .await
    .unwrap();
  assert!(!matched);
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_removes_row() {
  let s = store().await;

  let created = s.create_tip(tip(d(2024, 6, 10), "18:30", "A", Plan::Free)).await.unwrap();
  assert!(s.delete_tip(created.id).await.unwrap());

  assert!(s.list_tips(&TipQuery::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_twice_reports_no_match_the_second_time() {
  let s = store().await;

  let created = s.create_tip(tip(d(2024, 6, 10), "18:30", "A", Plan::Free)).await.unwrap();
  assert!(s.delete_tip(created.id).await.unwrap());
  assert!(!s.delete_tip(created.id).await.unwrap());
}

#[tokio::test]
async fn delete_missing_tip_reports_no_match() {
  let s = store().await;
  assert!(!s.delete_tip(99_999).await.unwrap());
}

// ─── Recent results ──────────────────────────────────────────────────────────

#[tokio::test]
async fn recent_results_returns_only_settled_newest_first() {
  let s = store().await;

  let won = s.create_tip(tip(d(2024, 6, 8), "18:30", "Won8", Plan::Silver)).await.unwrap();
  let lost = s.create_tip(tip(d(2024, 6, 9), "18:30", "Lost9", Plan::Gold)).await.unwrap();
  s.create_tip(tip(d(2024, 6, 10), "18:30", "StillPending", Plan::Free)).await.unwrap();

  s.settle_tip(won.id, Settlement { status: TipStatus::Won, score: Some("1-0".into()) })
    .await
    .unwrap();
  s.settle_tip(lost.id, Settlement { status: TipStatus::Lost, score: Some("0-2".into()) })
    .await
    .unwrap();

  let results = s.recent_results(100).await.unwrap();
  let homes: Vec<_> = results.iter().map(|t| t.home.as_str()).collect();
  assert_eq!(homes, ["Lost9", "Won8"]);
  assert!(results.iter().all(|t| t.status.is_settled()));
}

#[tokio::test]
async fn recent_results_respects_limit() {
  let s = store().await;

  for day in 1..=5 {
    let t = s.create_tip(tip(d(2024, 6, day), "18:30", "H", Plan::Free)).await.unwrap();
    s.settle_tip(t.id, Settlement { status: TipStatus::Won, score: Some("1-0".into()) })
      .await
      .unwrap();
  }

  let results = s.recent_results(3).await.unwrap();
  assert_eq!(results.len(), 3);
  // Newest three.
  assert_eq!(results[0].date, d(2024, 6, 5));
  assert_eq!(results[2].date, d(2024, 6, 3));
}

// ─── Admins ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn admin_seed_and_lookup() {
  let s = store().await;

  assert_eq!(s.count_admins().await.unwrap(), 0);

  let admin = s
    .add_admin("admin".into(), "$argon2id$v=19$stub".into())
    .await
    .unwrap();
  assert!(admin.id > 0);
  assert_eq!(s.count_admins().await.unwrap(), 1);

  let found = s.find_admin("admin").await.unwrap().unwrap();
  assert_eq!(found.id, admin.id);
  assert_eq!(found.password_hash, "$argon2id$v=19$stub");

  assert!(s.find_admin("nobody").await.unwrap().is_none());
}
