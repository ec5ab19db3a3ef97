//! SQL schema for the tipsheet SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS tips (
    id      INTEGER PRIMARY KEY AUTOINCREMENT,
    date    TEXT NOT NULL,                    -- ISO 8601 calendar date
    time    TEXT NOT NULL DEFAULT '',         -- free text, zero-padded HH:MM when parseable
    league  TEXT NOT NULL DEFAULT '',
    home    TEXT NOT NULL DEFAULT '',
    away    TEXT NOT NULL DEFAULT '',
    market  TEXT NOT NULL DEFAULT '',
    pick    TEXT NOT NULL DEFAULT '',
    odds    REAL NOT NULL,
    plan    TEXT NOT NULL DEFAULT 'Free',     -- 'Free' | 'Silver' | 'Gold' | 'Platinum'
    status  TEXT NOT NULL DEFAULT 'Pending',  -- 'Pending' | 'Won' | 'Lost'
    score   TEXT                              -- final score, NULL while pending
);

CREATE TABLE IF NOT EXISTS admins (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    username      TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL               -- argon2 PHC string
);

CREATE INDEX IF NOT EXISTS tips_date_idx   ON tips(date, time);
CREATE INDEX IF NOT EXISTS tips_plan_idx   ON tips(plan);
CREATE INDEX IF NOT EXISTS tips_status_idx ON tips(status);

PRAGMA user_version = 1;
";
