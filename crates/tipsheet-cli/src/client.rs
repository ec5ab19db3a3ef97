//! Async HTTP client wrapping the tipsheet JSON API.

use std::{collections::BTreeMap, time::Duration};

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tipsheet_core::tip::{Plan, TipStatus, TipView};

/// Connection settings for the tipsheet API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  /// Bearer token: an admin token or a viewer entitlement token. `None`
  /// browses as a Free-tier visitor.
  pub token:    Option<String>,
}

/// One settled tip as served by the results endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultRow {
  pub date:    NaiveDate,
  pub fixture: String,
  pub market:  String,
  pub tip:     String,
  pub result:  String,
  pub status:  TipStatus,
}

/// Recent results grouped by tier; every tier key is always present.
pub type RecentResults = BTreeMap<Plan, Vec<ResultRow>>;

/// Async HTTP client for the tipsheet JSON REST API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    match &self.config.token {
      Some(token) => req.bearer_auth(token),
      None => req,
    }
  }

  // ── Tips ──────────────────────────────────────────────────────────────────

  /// `GET /api/tips`
  pub async fn list_tips(&self) -> Result<Vec<TipView>> {
    let resp = self
      .auth(self.client.get(self.url("/tips")))
      .send()
      .await
      .context("GET /tips failed")?;

    if !resp.status().is_success() {
      return Err(anyhow!("GET /tips → {}", resp.status()));
    }
    resp.json().await.context("deserialising tips")
  }

  /// `GET /api/tips/recent/results`
  pub async fn recent_results(&self) -> Result<RecentResults> {
    let resp = self
      .auth(self.client.get(self.url("/tips/recent/results")))
      .send()
      .await
      .context("GET /tips/recent/results failed")?;

    if !resp.status().is_success() {
      return Err(anyhow!("GET /tips/recent/results → {}", resp.status()));
    }
    resp.json().await.context("deserialising results")
  }

  // ── Auth ──────────────────────────────────────────────────────────────────

  /// `POST /api/auth/login` — exchange admin credentials for a bearer token.
  pub async fn login(&self, username: &str, password: &str) -> Result<String> {
    let resp = self
      .client
      .post(self.url("/auth/login"))
      .json(&json!({ "username": username, "password": password }))
      .send()
      .await
      .context("POST /auth/login failed")?;

    if !resp.status().is_success() {
      return Err(anyhow!("login rejected → {}", resp.status()));
    }

    #[derive(Deserialize)]
    struct TokenResponse {
      token: String,
    }
    let body: TokenResponse = resp.json().await.context("deserialising token")?;
    Ok(body.token)
  }
}
