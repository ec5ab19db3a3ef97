//! Bet slip — the ephemeral client-side selection set.
//!
//! Held in memory only and lost on exit; nothing here is persisted or sent
//! to the server.

use tipsheet_core::tip::TipView;

/// Selected tips plus a stake. Combined odds are the product of the
/// selections' odds; the potential return is stake × combined odds.
#[derive(Debug, Default)]
pub struct BetSlip {
  selections: Vec<TipView>,
  pub stake:  f64,
}

impl BetSlip {
  pub fn new() -> Self { Self::default() }

  pub fn is_empty(&self) -> bool { self.selections.is_empty() }

  pub fn len(&self) -> usize { self.selections.len() }

  pub fn selections(&self) -> &[TipView] { &self.selections }

  pub fn contains(&self, id: i64) -> bool {
    self.selections.iter().any(|t| t.id == id)
  }

  /// Add a tip to the slip. Locked rows carry no odds and are rejected, as
  /// are duplicates. Returns whether the tip was added.
  pub fn add(&mut self, tip: &TipView) -> bool {
    if tip.locked || tip.odds.is_none() || self.contains(tip.id) {
      return false;
    }
    self.selections.push(tip.clone());
    true
  }

  pub fn remove(&mut self, id: i64) {
    self.selections.retain(|t| t.id != id);
  }

  /// Add if absent, remove if present. Returns whether the tip is now on the
  /// slip.
  pub fn toggle(&mut self, tip: &TipView) -> bool {
    if self.contains(tip.id) {
      self.remove(tip.id);
      false
    } else {
      self.add(tip)
    }
  }

  /// Product of all selection odds; 1.0 for an empty slip.
  pub fn total_odds(&self) -> f64 {
    self
      .selections
      .iter()
      .filter_map(|t| t.odds)
      .product()
  }

  /// Stake × combined odds, or 0 when no stake is entered.
  pub fn potential_return(&self) -> f64 {
    if self.stake > 0.0 {
      self.stake * self.total_odds()
    } else {
      0.0
    }
  }

  /// Shareable plain-text rendering, one selection per line.
  pub fn copy_text(&self) -> String {
    self
      .selections
      .iter()
      .map(|t| {
        format!(
          "{} - {} @ {}",
          t.fixture(),
          t.pick.as_deref().unwrap_or("-"),
          t.odds.unwrap_or(0.0),
        )
      })
      .collect::<Vec<_>>()
      .join("\n")
  }
}
