//! Application state machine and event dispatcher.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use tipsheet_core::tip::TipView;

use crate::{
  client::{ApiClient, RecentResults},
  slip::BetSlip,
  view::{self, ColumnSort, Row, Section, SortKey},
};

// ─── Pane ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
  /// Upcoming tips table plus the bet slip.
  Tips,
  /// Recent settled results grouped by tier.
  Results,
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  /// Current pane / keyboard focus.
  pub pane: Pane,

  /// Admin mode: the tips table shows every status, unfiltered.
  pub admin_view: bool,

  /// All tips returned by the API, as projected for our entitlement.
  pub tips: Vec<TipView>,

  /// Recent results, loaded lazily the first time the pane is opened.
  pub results: Option<RecentResults>,

  /// Current fuzzy-filter string (only applied when non-empty).
  pub filter: String,

  /// Whether the user is typing a filter query.
  pub filter_active: bool,

  /// Cursor position within the current page's row list.
  pub cursor: usize,

  /// Zero-based page over the grouped (header + tip) row sequence.
  pub page: usize,

  /// Index into [`view::PAGE_SIZES`].
  pub page_size_idx: usize,

  /// Active column sort; `None` means the default date/time order.
  pub sort: Option<ColumnSort>,

  pub slip: BetSlip,

  /// In-progress stake entry; `Some` while the stake field is focused.
  pub stake_input: Option<String>,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  /// Shared HTTP client.
  pub client: Arc<ApiClient>,
}

impl App {
  pub fn new(client: ApiClient, admin_view: bool) -> Self {
    Self {
      pane: Pane::Tips,
      admin_view,
      tips: Vec::new(),
      results: None,
      filter: String::new(),
      filter_active: false,
      cursor: 0,
      page: 0,
      page_size_idx: 1, // default 10
      sort: None,
      slip: BetSlip::new(),
      stake_input: None,
      status_msg: String::new(),
      client: Arc::new(client),
    }
  }

  pub fn per_page(&self) -> usize { view::PAGE_SIZES[self.page_size_idx] }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Fetch all tips from the API and populate `self.tips`.
  pub async fn load_tips(&mut self) -> anyhow::Result<()> {
    self.status_msg = "Loading tips…".into();
    match self.client.list_tips().await {
      Ok(tips) => {
        self.tips = tips;
        self.cursor = 0;
        self.page = 0;
        self.status_msg = String::new();
        Ok(())
      }
      Err(e) => {
        self.status_msg = format!("Error: {e}");
        Err(e)
      }
    }
  }

  /// Fetch recent results if not already loaded.
  pub async fn ensure_results(&mut self) {
    if self.results.is_some() {
      return;
    }
    match self.client.recent_results().await {
      Ok(results) => self.results = Some(results),
      Err(e) => self.status_msg = format!("Error: {e}"),
    }
  }

  // ── Shaped views ──────────────────────────────────────────────────────────

  fn section(&self) -> Section {
    if self.admin_view { Section::Admin } else { Section::Upcoming }
  }

  /// Tips as the table shows them: section-filtered, fuzzy-filtered, sorted.
  pub fn visible_tips(&self) -> Vec<TipView> {
    let mut tips = view::section_filter(&self.tips, self.section());

    if !self.filter.is_empty() {
      let matcher = SkimMatcherV2::default();
      tips.retain(|t| {
        matcher.fuzzy_match(&t.fixture(), &self.filter).is_some()
          || matcher.fuzzy_match(&t.league, &self.filter).is_some()
      });
    }

    view::sort_tips(&mut tips, self.sort);
    tips
  }

  /// The grouped header+tip row sequence the table paginates over.
  pub fn rows(&self) -> Vec<Row> { view::group_by_day(&self.visible_tips()) }

  /// Rows on the current page.
  pub fn page_rows(&self) -> Vec<Row> {
    view::paginate(&self.rows(), self.page, self.per_page()).to_vec()
  }

  /// The tip under the cursor, if the cursor is on a tip row.
  pub fn cursor_tip(&self) -> Option<TipView> {
    match self.page_rows().get(self.cursor) {
      Some(Row::Tip(tip)) => Some(tip.clone()),
      _ => None,
    }
  }

  fn reset_listing(&mut self) {
    self.cursor = 0;
    self.page = 0;
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    if self.filter_active {
      self.handle_filter_key(key);
      return Ok(true);
    }
    if self.stake_input.is_some() {
      self.handle_stake_key(key);
      return Ok(true);
    }

    match self.pane {
      Pane::Tips => self.handle_tips_key(key).await,
      Pane::Results => self.handle_results_key(key).await,
    }
  }

  fn handle_filter_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.filter_active = false;
        self.filter.clear();
        self.reset_listing();
      }
      KeyCode::Enter => {
        self.filter_active = false;
        self.reset_listing();
      }
      KeyCode::Backspace => {
        self.filter.pop();
        self.reset_listing();
      }
      KeyCode::Char(c) => {
        self.filter.push(c);
        self.reset_listing();
      }
      _ => {}
    }
  }

  fn handle_stake_key(&mut self, key: KeyEvent) {
    let Some(buffer) = self.stake_input.as_mut() else { return };
    match key.code {
      KeyCode::Esc => {
        self.stake_input = None;
      }
      KeyCode::Enter => {
        self.slip.stake = buffer.parse().unwrap_or(0.0);
        self.stake_input = None;
      }
      KeyCode::Backspace => {
        buffer.pop();
      }
      KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => {
        buffer.push(c);
      }
      _ => {}
    }
  }

  async fn handle_tips_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      // Quit
      KeyCode::Char('q') => return Ok(false),

      // Switch pane
      KeyCode::Tab => {
        self.pane = Pane::Results;
        self.ensure_results().await;
      }

      // Navigation within the page
      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.page_rows().len();
        if len > 0 && self.cursor + 1 < len {
          self.cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        if self.cursor > 0 {
          self.cursor -= 1;
        }
      }

      // Pagination
      KeyCode::Right | KeyCode::Char('n') => {
        let pages = view::page_count(self.rows().len(), self.per_page());
        if self.page + 1 < pages {
          self.page += 1;
          self.cursor = 0;
        }
      }
      KeyCode::Left | KeyCode::Char('p') => {
        if self.page > 0 {
          self.page -= 1;
          self.cursor = 0;
        }
      }
      KeyCode::Char('z') => {
        self.page_size_idx = (self.page_size_idx + 1) % view::PAGE_SIZES.len();
        self.reset_listing();
      }

      // Column sort: cycle off → status → plan → odds, 'r' flips direction.
      KeyCode::Char('s') => {
        self.sort = match self.sort.map(|s| s.key) {
          None => Some(ColumnSort { key: SortKey::Status, ascending: true }),
          Some(SortKey::Status) => {
            Some(ColumnSort { key: SortKey::Plan, ascending: true })
          }
          Some(SortKey::Plan) => {
            Some(ColumnSort { key: SortKey::Odds, ascending: true })
          }
          _ => None,
        };
        self.reset_listing();
      }
      KeyCode::Char('r') => {
        if let Some(sort) = self.sort.as_mut() {
          sort.ascending = !sort.ascending;
          self.reset_listing();
        }
      }

      // Fuzzy filter
      KeyCode::Char('/') => {
        self.filter_active = true;
        self.filter.clear();
        self.reset_listing();
      }

      // Slip
      KeyCode::Enter | KeyCode::Char(' ') => {
        if let Some(tip) = self.cursor_tip() {
          if tip.locked {
            self.status_msg = "Locked — subscribe to unlock this tier".into();
          } else if self.slip.toggle(&tip) {
            self.status_msg = format!("Added {} to slip", tip.fixture());
          } else {
            self.status_msg = format!("Removed {} from slip", tip.fixture());
          }
        }
      }
      KeyCode::Char('$') => {
        self.stake_input = Some(String::new());
      }
      KeyCode::Char('y') => {
        if self.slip.is_empty() {
          self.status_msg = "Slip is empty".into();
        } else {
          self.status_msg = self.slip.copy_text().replace('\n', "  |  ");
        }
      }

      // Reload
      KeyCode::Char('R') => {
        let _ = self.load_tips().await;
      }

      _ => {}
    }
    Ok(true)
  }

  async fn handle_results_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Char('q') => return Ok(false),
      KeyCode::Tab | KeyCode::Esc => {
        self.pane = Pane::Tips;
      }
      KeyCode::Char('R') => {
        self.results = None;
        self.ensure_results().await;
      }
      _ => {}
    }
    Ok(true)
  }
}
