//! The `Store` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g.
//! `tipsheet-store-sqlite`). Higher layers (`tipsheet-server`) depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use chrono::{NaiveDate, Weekday};

use crate::{
  admin::Admin,
  day::DayLabel,
  tip::{NewTip, Plan, Settlement, Tip, TipStatus},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`Store::list_tips`]. All filters are conjunctive; an empty
/// query lists everything, ordered date ascending then time ascending.
#[derive(Debug, Clone, Default)]
pub struct TipQuery {
  /// Exact match-date filter.
  pub date:    Option<NaiveDate>,
  /// Weekday filter — the resolved form of a weekday day-label.
  pub weekday: Option<Weekday>,
  pub plan:    Option<Plan>,
  pub status:  Option<TipStatus>,
  /// Substring match over home, away, and league.
  pub search:  Option<String>,
}

impl TipQuery {
  /// Resolve a relative day label into a concrete date or weekday predicate.
  /// "Today"/"Tomorrow" are anchored to the caller-supplied `today` so the
  /// store itself never reads the clock.
  pub fn with_day_label(mut self, label: DayLabel, today: NaiveDate) -> Self {
    match label {
      DayLabel::Today => self.date = Some(today),
      DayLabel::Tomorrow => self.date = today.succ_opt(),
      DayLabel::Weekday(wd) => self.weekday = Some(wd),
    }
    self
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the tipsheet storage backend: one table of tips, one of
/// admin credentials.
///
/// Every write is a single-row statement; no operation spans rows, so the
/// trait exposes no transaction scoping.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait Store: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Tips ──────────────────────────────────────────────────────────────

  /// List tips matching `query`, ordered date ascending then time ascending.
  fn list_tips<'a>(
    &'a self,
    query: &'a TipQuery,
  ) -> impl Future<Output = Result<Vec<Tip>, Self::Error>> + Send + 'a;

  /// Persist a new tip and return it with its store-assigned id.
  fn create_tip(
    &self,
    input: NewTip,
  ) -> impl Future<Output = Result<Tip, Self::Error>> + Send + '_;

  /// Overwrite every field of tip `id`. Returns `false` when zero rows were
  /// affected (no such tip) — the service layer turns that into NotFound.
  fn update_tip(
    &self,
    id: i64,
    input: NewTip,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Update only `status` and `score` of tip `id`, leaving all descriptive
  /// fields untouched. Returns `false` when zero rows were affected.
  fn settle_tip(
    &self,
    id: i64,
    settlement: Settlement,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Hard-delete tip `id`. Returns `false` when zero rows were affected; a
  /// repeat delete of the same id therefore reports `false`, never a crash.
  fn delete_tip(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// The most recent `limit` settled tips (`Won` or `Lost`), ordered date
  /// descending then time descending.
  fn recent_results(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<Tip>, Self::Error>> + Send + '_;

  // ── Admins ────────────────────────────────────────────────────────────

  /// Look up an admin by username. Returns `None` if not found.
  fn find_admin<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<Admin>, Self::Error>> + Send + 'a;

  /// Insert an admin credential row. Used only by first-boot seeding.
  fn add_admin(
    &self,
    username: String,
    password_hash: String,
  ) -> impl Future<Output = Result<Admin, Self::Error>> + Send + '_;

  /// Number of admin rows — the bootstrap check.
  fn count_admins(
    &self,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;
}
