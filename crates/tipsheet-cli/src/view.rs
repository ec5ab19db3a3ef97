//! Display-shaping logic for tip tables: sorting, section filtering,
//! day-header grouping, and pagination.
//!
//! Everything here is pure — the UI layer feeds it the fetched list and
//! renders whatever comes back, so the shaping rules are testable without a
//! terminal.

use std::cmp::Ordering;

use chrono::NaiveDate;
use tipsheet_core::{
  day::results_bucket,
  tip::{TipStatus, TipView},
};

use crate::client::ResultRow;

// ─── Sections ────────────────────────────────────────────────────────────────

/// Which slice of the tip list a table shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
  /// Public "today/upcoming" table: pending tips only.
  Upcoming,
  /// Public results table: settled tips only.
  Results,
  /// Admin table: every status, unfiltered.
  Admin,
}

/// Keep only the tips this section shows.
pub fn section_filter(tips: &[TipView], section: Section) -> Vec<TipView> {
  tips
    .iter()
    .filter(|tip| match section {
      Section::Upcoming => tip.status == TipStatus::Pending,
      Section::Results => tip.status.is_settled(),
      Section::Admin => true,
    })
    .cloned()
    .collect()
}

// ─── Sorting ─────────────────────────────────────────────────────────────────

/// A user-selected column sort. While active it *replaces* the default
/// date/time sort entirely; the two modes are never composed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSort {
  pub key:       SortKey,
  pub ascending: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
  Date,
  Time,
  Status,
  Plan,
  Odds,
}

/// Kick-off time as minutes past midnight, when the free-text field looks
/// like `HH:MM`.
fn time_minutes(time: &str) -> Option<u32> {
  let (h, m) = time.trim().split_once(':')?;
  let h: u32 = h.parse().ok()?;
  let m: u32 = m.parse().ok()?;
  Some(h * 60 + m)
}

fn chronological(a: &TipView, b: &TipView) -> Ordering {
  a.date
    .cmp(&b.date)
    .then_with(|| {
      let (ta, tb) = (time_minutes(&a.time), time_minutes(&b.time));
      ta.unwrap_or(0).cmp(&tb.unwrap_or(0))
    })
    .then_with(|| a.time.cmp(&b.time))
}

fn status_rank(status: TipStatus) -> u8 {
  match status {
    TipStatus::Pending => 0,
    TipStatus::Won => 1,
    TipStatus::Lost => 2,
  }
}

fn by_column(a: &TipView, b: &TipView, key: SortKey) -> Ordering {
  match key {
    SortKey::Date => a.date.cmp(&b.date),
    SortKey::Time => a.time.cmp(&b.time),
    SortKey::Status => status_rank(a.status).cmp(&status_rank(b.status)),
    SortKey::Plan => a.plan.cmp(&b.plan),
    SortKey::Odds => a
      .odds
      .unwrap_or(0.0)
      .partial_cmp(&b.odds.unwrap_or(0.0))
      .unwrap_or(Ordering::Equal),
  }
}

/// Sort tips for display: date then time by default, or by the selected
/// column when a column sort is active.
pub fn sort_tips(tips: &mut [TipView], column: Option<ColumnSort>) {
  match column {
    None => tips.sort_by(chronological),
    Some(ColumnSort { key, ascending }) => tips.sort_by(|a, b| {
      let ord = by_column(a, b, key);
      if ascending { ord } else { ord.reverse() }
    }),
  }
}

// ─── Day-header grouping ─────────────────────────────────────────────────────

/// One row of the rendered table: either a synthetic day header or a tip.
#[derive(Debug, Clone, PartialEq)]
pub enum Row {
  Header(String),
  Tip(TipView),
}

/// Walk an ordered tip list and insert a header row whenever the day label
/// changes from the previous row's.
pub fn group_by_day(tips: &[TipView]) -> Vec<Row> {
  let mut rows = Vec::with_capacity(tips.len());
  let mut current_day: Option<&str> = None;
  for tip in tips {
    if current_day != Some(tip.day.as_str()) {
      rows.push(Row::Header(tip.day.clone()));
      current_day = Some(tip.day.as_str());
    }
    rows.push(Row::Tip(tip.clone()));
  }
  rows
}

// ─── Pagination ──────────────────────────────────────────────────────────────

/// Selectable rows-per-page values; `PAGE_SIZES[1]` is the default.
pub const PAGE_SIZES: [usize; 3] = [5, 10, 25];

/// Window `rows` to one page. Headers and tips count equally, exactly as the
/// combined sequence is rendered.
pub fn paginate(rows: &[Row], page: usize, per_page: usize) -> &[Row] {
  let start = page.saturating_mul(per_page).min(rows.len());
  let end = start.saturating_add(per_page).min(rows.len());
  &rows[start..end]
}

/// Number of pages for `len` rows (at least 1 so an empty table still has a
/// page to stand on).
pub fn page_count(len: usize, per_page: usize) -> usize {
  len.div_ceil(per_page).max(1)
}

// ─── Results buckets ─────────────────────────────────────────────────────────

/// Group one tier's settled results by their display bucket
/// (Today / Yesterday / literal date), preserving the server's order.
pub fn bucket_results(
  rows: &[ResultRow],
  today: NaiveDate,
) -> Vec<(String, Vec<ResultRow>)> {
  let mut buckets: Vec<(String, Vec<ResultRow>)> = Vec::new();
  for row in rows {
    let label = results_bucket(row.date, today);
    match buckets.last_mut() {
      Some((last, group)) if *last == label => group.push(row.clone()),
      _ => buckets.push((label, vec![row.clone()])),
    }
  }
  buckets
}
