//! [`SqliteStore`] — the SQLite implementation of [`Store`].

use std::path::Path;

use rusqlite::{OptionalExtension as _, types::Value};
use tipsheet_core::{
  admin::Admin,
  store::{Store, TipQuery},
  tip::{NewTip, Settlement, Tip},
};

use crate::{
  Error, Result,
  encode::{RawTip, encode_date, encode_plan, encode_status},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A tipsheet store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run an id-targeted single-row statement; `true` iff a row was affected.
  async fn execute_targeting(
    &self,
    sql: &'static str,
    params: Vec<Value>,
  ) -> Result<bool> {
    let rows = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(sql, rusqlite::params_from_iter(params))?)
      })
      .await?;
    Ok(rows > 0)
  }
}

// ─── Store impl ──────────────────────────────────────────────────────────────

impl Store for SqliteStore {
  type Error = Error;

  // ── Tips ──────────────────────────────────────────────────────────────────

  async fn list_tips(&self, query: &TipQuery) -> Result<Vec<Tip>> {
    // Owned filter values so the closure can be 'static.
    let date_str = query.date.map(encode_date);
    let weekday = query
      .weekday
      .map(|wd| wd.num_days_from_sunday() as i64); // strftime('%w'): 0 = Sunday
    let plan_str = query.plan.map(encode_plan);
    let status_str = query.status.map(encode_status);
    let search_pat = query.search.as_deref().map(|s| format!("%{s}%"));

    let raws: Vec<RawTip> = self
      .conn
      .call(move |conn| {
        let mut sql = format!("SELECT {} FROM tips WHERE 1=1", RawTip::COLUMNS);
        let mut params: Vec<Value> = Vec::new();

        if let Some(d) = date_str {
          sql.push_str(" AND date = ?");
          params.push(Value::Text(d));
        }
        if let Some(w) = weekday {
          sql.push_str(" AND CAST(strftime('%w', date) AS INTEGER) = ?");
          params.push(Value::Integer(w));
        }
        if let Some(p) = plan_str {
          sql.push_str(" AND plan = ?");
          params.push(Value::Text(p));
        }
        if let Some(s) = status_str {
          sql.push_str(" AND status = ?");
          params.push(Value::Text(s));
        }
        if let Some(pat) = search_pat {
          sql.push_str(" AND (home LIKE ? OR away LIKE ? OR league LIKE ?)");
          params.push(Value::Text(pat.clone()));
          params.push(Value::Text(pat.clone()));
          params.push(Value::Text(pat));
        }

        sql.push_str(" ORDER BY date ASC, time ASC");

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), RawTip::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawTip::into_tip).collect()
  }

  async fn create_tip(&self, input: NewTip) -> Result<Tip> {
    let date_str = encode_date(input.date);
    let plan_str = encode_plan(input.plan);
    let status_str = encode_status(input.status);
    let fields = input.clone();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO tips (date, time, league, home, away, market, pick, odds, plan, status, score)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
          rusqlite::params![
            date_str,
            fields.time,
            fields.league,
            fields.home,
            fields.away,
            fields.market,
            fields.pick,
            fields.odds,
            plan_str,
            status_str,
            fields.score,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Tip {
      id,
      date:   input.date,
      time:   input.time,
      league: input.league,
      home:   input.home,
      away:   input.away,
      market: input.market,
      pick:   input.pick,
      odds:   input.odds,
      plan:   input.plan,
      status: input.status,
      score:  input.score,
    })
  }

  async fn update_tip(&self, id: i64, input: NewTip) -> Result<bool> {
    let params = vec![
      Value::Text(encode_date(input.date)),
      Value::Text(input.time),
      Value::Text(input.league),
      Value::Text(input.home),
      Value::Text(input.away),
      Value::Text(input.market),
      Value::Text(input.pick),
      Value::Real(input.odds),
      Value::Text(encode_plan(input.plan)),
      Value::Text(encode_status(input.status)),
      input.score.map_or(Value::Null, Value::Text),
      Value::Integer(id),
    ];

    self
      .execute_targeting(
        "UPDATE tips
         SET date=?1, time=?2, league=?3, home=?4, away=?5, market=?6,
             pick=?7, odds=?8, plan=?9, status=?10, score=?11
         WHERE id=?12",
        params,
      )
      .await
  }

  async fn settle_tip(&self, id: i64, settlement: Settlement) -> Result<bool> {
    let params = vec![
      Value::Text(encode_status(settlement.status)),
      settlement.score.map_or(Value::Null, Value::Text),
      Value::Integer(id),
    ];

    self
      .execute_targeting("UPDATE tips SET status=?1, score=?2 WHERE id=?3", params)
      .await
  }

  async fn delete_tip(&self, id: i64) -> Result<bool> {
    let params = vec![Value::Integer(id)];
    self.execute_targeting("DELETE FROM tips WHERE id=?1", params).await
  }

  async fn recent_results(&self, limit: usize) -> Result<Vec<Tip>> {
    let limit = limit as i64;

    let raws: Vec<RawTip> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM tips
           WHERE status IN ('Won', 'Lost')
           ORDER BY date DESC, time DESC
           LIMIT ?1",
          RawTip::COLUMNS
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![limit], RawTip::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawTip::into_tip).collect()
  }

  // ── Admins ────────────────────────────────────────────────────────────────

  async fn find_admin(&self, username: &str) -> Result<Option<Admin>> {
    let username = username.to_owned();

    let admin = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, username, password_hash FROM admins WHERE username = ?1",
              rusqlite::params![username],
              |row| {
                Ok(Admin {
                  id:            row.get(0)?,
                  username:      row.get(1)?,
                  password_hash: row.get(2)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    Ok(admin)
  }

  async fn add_admin(&self, username: String, password_hash: String) -> Result<Admin> {
    let user = username.clone();
    let hash = password_hash.clone();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO admins (username, password_hash) VALUES (?1, ?2)",
          rusqlite::params![user, hash],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Admin { id, username, password_hash })
  }

  async fn count_admins(&self) -> Result<usize> {
    let count: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM admins", [], |row| row.get(0))?)
      })
      .await?;
    Ok(count as usize)
  }
}
