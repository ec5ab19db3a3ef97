//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Dates are stored as ISO 8601 `YYYY-MM-DD` strings (which also makes the
//! `ORDER BY date` clauses chronological). Plan and status enums are stored
//! as their display strings.

use chrono::NaiveDate;
use tipsheet_core::tip::{Plan, Tip, TipStatus};

use crate::{Error, Result};

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(date: NaiveDate) -> String {
  date.format("%Y-%m-%d").to_string()
}

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Plan ────────────────────────────────────────────────────────────────────

pub fn encode_plan(plan: Plan) -> String { plan.to_string() }

pub fn decode_plan(s: &str) -> Result<Plan> {
  s.parse()
    .map_err(|_| Error::Core(tipsheet_core::Error::UnknownPlan(s.to_string())))
}

// ─── TipStatus ───────────────────────────────────────────────────────────────

pub fn encode_status(status: TipStatus) -> String { status.to_string() }

pub fn decode_status(s: &str) -> Result<TipStatus> {
  s.parse()
    .map_err(|_| Error::Core(tipsheet_core::Error::UnknownStatus(s.to_string())))
}

// ─── Row type ────────────────────────────────────────────────────────────────

/// Raw values read directly from a `tips` row.
pub struct RawTip {
  pub id:     i64,
  pub date:   String,
  pub time:   String,
  pub league: String,
  pub home:   String,
  pub away:   String,
  pub market: String,
  pub pick:   String,
  pub odds:   f64,
  pub plan:   String,
  pub status: String,
  pub score:  Option<String>,
}

impl RawTip {
  /// The column list matching [`RawTip::from_row`]'s indices.
  pub const COLUMNS: &'static str =
    "id, date, time, league, home, away, market, pick, odds, plan, status, score";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:     row.get(0)?,
      date:   row.get(1)?,
      time:   row.get(2)?,
      league: row.get(3)?,
      home:   row.get(4)?,
      away:   row.get(5)?,
      market: row.get(6)?,
      pick:   row.get(7)?,
      odds:   row.get(8)?,
      plan:   row.get(9)?,
      status: row.get(10)?,
      score:  row.get(11)?,
    })
  }

  pub fn into_tip(self) -> Result<Tip> {
    Ok(Tip {
      id:     self.id,
      date:   decode_date(&self.date)?,
      time:   self.time,
      league: self.league,
      home:   self.home,
      away:   self.away,
      market: self.market,
      pick:   self.pick,
      odds:   self.odds,
      plan:   decode_plan(&self.plan)?,
      status: decode_status(&self.status)?,
      score:  self.score,
    })
  }
}
