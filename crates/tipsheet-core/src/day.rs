//! Day-label derivation and time normalization.
//!
//! The stored record keeps a calendar date only; labels are computed against
//! a caller-supplied "today" so the functions stay pure and the label can be
//! recomputed on every read.

use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate, Weekday};

use crate::error::Error;

// ─── DayLabel ────────────────────────────────────────────────────────────────

/// Human-readable bucket for a match date: "Today", "Tomorrow", or a weekday
/// name for anything else (past dates included).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayLabel {
  Today,
  Tomorrow,
  Weekday(Weekday),
}

impl fmt::Display for DayLabel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      DayLabel::Today => f.write_str("Today"),
      DayLabel::Tomorrow => f.write_str("Tomorrow"),
      DayLabel::Weekday(wd) => f.write_str(weekday_name(*wd)),
    }
  }
}

impl FromStr for DayLabel {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "today" => Ok(DayLabel::Today),
      "tomorrow" => Ok(DayLabel::Tomorrow),
      other => other
        .parse::<Weekday>()
        .map(DayLabel::Weekday)
        .map_err(|_| Error::UnknownDay(s.to_string())),
    }
  }
}

fn weekday_name(wd: Weekday) -> &'static str {
  match wd {
    Weekday::Mon => "Monday",
    Weekday::Tue => "Tuesday",
    Weekday::Wed => "Wednesday",
    Weekday::Thu => "Thursday",
    Weekday::Fri => "Friday",
    Weekday::Sat => "Saturday",
    Weekday::Sun => "Sunday",
  }
}

/// Label `date` relative to `today`.
pub fn day_label(date: NaiveDate, today: NaiveDate) -> DayLabel {
  if date == today {
    DayLabel::Today
  } else if date == today.succ_opt().unwrap_or(today) {
    DayLabel::Tomorrow
  } else {
    DayLabel::Weekday(date.weekday())
  }
}

// ─── Results bucket ──────────────────────────────────────────────────────────

/// Display bucket for a settled result: "Today", "Yesterday", or the literal
/// ISO date.
pub fn results_bucket(date: NaiveDate, today: NaiveDate) -> String {
  if date == today {
    "Today".to_string()
  } else if Some(date) == today.pred_opt() {
    "Yesterday".to_string()
  } else {
    date.format("%Y-%m-%d").to_string()
  }
}

// ─── Time normalization ──────────────────────────────────────────────────────

/// Zero-pad an `H:MM` kick-off time to `HH:MM` so that lexicographic ordering
/// (the order the store sorts by) is also chronological. Anything that does
/// not look like `H:MM` is returned unchanged — the field is free text.
pub fn normalize_time(time: &str) -> String {
  let trimmed = time.trim();
  if let Some((h, m)) = trimmed.split_once(':')
    && h.len() == 1
    && h.chars().all(|c| c.is_ascii_digit())
    && m.len() == 2
    && m.chars().all(|c| c.is_ascii_digit())
  {
    return format!("0{h}:{m}");
  }
  trimmed.to_string()
}
