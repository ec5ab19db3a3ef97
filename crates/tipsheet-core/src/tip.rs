//! Tip — a single match prediction with odds, plan tier, and settlement
//! status.
//!
//! The stored record keeps only the match `date`; the human-readable day
//! label ("Today", "Tomorrow", a weekday name) is derived at read time by
//! [`crate::day::day_label`] so it can never go stale.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Result, day::day_label, error::Error};

// ─── Plan tier ───────────────────────────────────────────────────────────────

/// Visibility tier for a tip. Ordered: each tier sees its own tips and every
/// tier below it.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Default,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
)]
pub enum Plan {
  #[default]
  Free,
  Silver,
  Gold,
  Platinum,
}

impl Plan {
  /// All tiers, lowest first. Used by the results aggregator to guarantee
  /// every tier key is present in its output.
  pub const ALL: [Plan; 4] = [Plan::Free, Plan::Silver, Plan::Gold, Plan::Platinum];
}

// ─── Settlement status ───────────────────────────────────────────────────────

/// Lifecycle state of a tip: live until settled as won or lost.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
)]
pub enum TipStatus {
  #[default]
  Pending,
  Won,
  Lost,
}

impl TipStatus {
  /// A settled tip has a final outcome and belongs in results listings.
  pub fn is_settled(self) -> bool { self != TipStatus::Pending }
}

// ─── Tip ─────────────────────────────────────────────────────────────────────

/// A persisted tip. `id` is assigned by the store on creation and never
/// changes; every other field is overwritten wholesale by a full update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tip {
  pub id:     i64,
  pub date:   NaiveDate,
  /// Kick-off time as entered by the admin. Not validated as a time value,
  /// but zero-padded on write when it parses as `H:MM` so lexicographic
  /// ordering matches chronological ordering.
  pub time:   String,
  pub league: String,
  pub home:   String,
  pub away:   String,
  pub market: String,
  pub pick:   String,
  pub odds:   f64,
  pub plan:   Plan,
  pub status: TipStatus,
  /// Final score, recorded at settlement. `None` while pending.
  pub score:  Option<String>,
}

// ─── NewTip ──────────────────────────────────────────────────────────────────

/// Input to [`crate::store::Store::create_tip`] and
/// [`crate::store::Store::update_tip`]. `id` is always assigned by the store.
#[derive(Debug, Clone)]
pub struct NewTip {
  pub date:   NaiveDate,
  pub time:   String,
  pub league: String,
  pub home:   String,
  pub away:   String,
  pub market: String,
  pub pick:   String,
  pub odds:   f64,
  pub plan:   Plan,
  pub status: TipStatus,
  pub score:  Option<String>,
}

impl NewTip {
  /// Check the domain invariants that are not captured by the type system.
  pub fn validate(&self) -> Result<()> {
    if !(self.odds > 0.0) {
      return Err(Error::InvalidOdds(self.odds));
    }
    Ok(())
  }
}

// ─── Settlement ──────────────────────────────────────────────────────────────

/// Input to [`crate::store::Store::settle_tip`]: the narrow status-only
/// update that leaves every descriptive field untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settlement {
  pub status: TipStatus,
  pub score:  Option<String>,
}

// ─── Entitlement ─────────────────────────────────────────────────────────────

/// What the caller of a read endpoint is allowed to see.
///
/// Admins see everything; a viewer sees tips at or below their entitled
/// tier. An unauthenticated caller is a `Viewer(Plan::Free)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entitlement {
  Admin,
  Viewer(Plan),
}

impl Entitlement {
  /// Whether a tip of tier `plan` may be shown in full.
  pub fn can_view(self, plan: Plan) -> bool {
    match self {
      Entitlement::Admin => true,
      Entitlement::Viewer(mine) => mine >= plan,
    }
  }
}

// ─── TipView ─────────────────────────────────────────────────────────────────

/// The wire representation of a tip: the stored record plus its read-time
/// day label, projected through the caller's entitlement.
///
/// For a tip above the caller's tier, `pick` and `odds` are withheld and
/// `locked` is set — the premium payload never crosses the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TipView {
  pub id:     i64,
  pub date:   NaiveDate,
  pub day:    String,
  pub time:   String,
  pub league: String,
  pub home:   String,
  pub away:   String,
  pub market: String,
  pub pick:   Option<String>,
  pub odds:   Option<f64>,
  pub plan:   Plan,
  pub status: TipStatus,
  pub score:  Option<String>,
  pub locked: bool,
}

impl TipView {
  /// Project `tip` for a caller with `entitlement`, deriving the day label
  /// relative to `today`.
  pub fn project(tip: &Tip, today: NaiveDate, entitlement: Entitlement) -> Self {
    let open = entitlement.can_view(tip.plan);
    Self {
      id:     tip.id,
      date:   tip.date,
      day:    day_label(tip.date, today).to_string(),
      time:   tip.time.clone(),
      league: tip.league.clone(),
      home:   tip.home.clone(),
      away:   tip.away.clone(),
      market: tip.market.clone(),
      pick:   open.then(|| tip.pick.clone()),
      odds:   open.then_some(tip.odds),
      plan:   tip.plan,
      status: tip.status,
      score:  tip.score.clone(),
      locked: !open,
    }
  }

  /// `"Home vs Away"`, the fixture string used in results and slip text.
  pub fn fixture(&self) -> String { format!("{} vs {}", self.home, self.away) }
}
