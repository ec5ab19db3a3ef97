//! Admin — credential holder for the publishing side.
//!
//! Admin rows are effectively static reference data: one is seeded at first
//! boot and there is no self-service registration. Admins never cross the
//! wire; only the signed token derived from one does.

/// A stored admin. `password_hash` is an argon2 PHC string; the raw password
/// is never persisted.
#[derive(Debug, Clone)]
pub struct Admin {
  pub id:            i64,
  pub username:      String,
  pub password_hash: String,
}
