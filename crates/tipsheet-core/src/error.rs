//! Error types for `tipsheet-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("odds must be positive, got {0}")]
  InvalidOdds(f64),

  #[error("unknown plan tier: {0:?}")]
  UnknownPlan(String),

  #[error("unknown tip status: {0:?}")]
  UnknownStatus(String),

  #[error("unknown day label: {0:?}")]
  UnknownDay(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
