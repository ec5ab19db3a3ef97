//! `tipsheet` — terminal UI for the tipsheet betting-tips service.
//!
//! # Usage
//!
//! ```
//! tipsheet --url http://localhost:5000
//! tipsheet --url http://localhost:5000 --token <entitlement-or-admin-token>
//! tipsheet --config ~/.config/tipsheet/config.toml
//! ```

mod app;
mod client;
mod slip;
mod ui;
mod view;

use std::{io, time::Duration};

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use client::{ApiClient, ApiConfig};
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "tipsheet", about = "Terminal UI for the tipsheet betting-tips service")]
struct Args {
  /// Path to a TOML config file (url, token).
  #[arg(short, long, value_name = "FILE")]
  config: Option<std::path::PathBuf>,

  /// Base URL of the tipsheet server (default: http://localhost:5000).
  #[arg(long, env = "TIPSHEET_URL")]
  url: Option<String>,

  /// Bearer token: a viewer entitlement token, or an admin token.
  #[arg(long, env = "TIPSHEET_TOKEN")]
  token: Option<String>,

  /// Admin username; with --password, logs in and uses the issued token.
  #[arg(long, env = "TIPSHEET_USER")]
  user: Option<String>,

  /// Admin password (plaintext).
  #[arg(long, env = "TIPSHEET_PASSWORD")]
  password: Option<String>,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:   String,
  #[serde(default)]
  token: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let base_url = args
    .url
    .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
    .unwrap_or_else(|| "http://localhost:5000".to_string());
  let mut token = args
    .token
    .or_else(|| (!file_cfg.token.is_empty()).then(|| file_cfg.token.clone()));

  // With credentials given, log in first and use the admin token.
  let mut admin_view = false;
  if let (Some(user), Some(password)) = (&args.user, &args.password) {
    let login_client = ApiClient::new(ApiConfig {
      base_url: base_url.clone(),
      token:    None,
    })?;
    token = Some(
      login_client
        .login(user, password)
        .await
        .context("admin login failed")?,
    );
    admin_view = true;
  }

  let client = ApiClient::new(ApiConfig { base_url, token })?;
  let mut app = App::new(client, admin_view);

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  // Load initial data.
  let load_result = app.load_tips().await;

  // Run the event loop; restore terminal even on error.
  let run_result = if load_result.is_ok() {
    run_event_loop(&mut terminal, &mut app).await
  } else {
    load_result
  };

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
) -> Result<()> {
  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(evt) = maybe_event {
      match evt {
        Event::Key(key) => {
          let cont = app.handle_key(key).await?;
          if !cont {
            break;
          }
        }
        Event::Resize(_, _) => {
          // Terminal will redraw on next iteration.
        }
        _ => {}
      }
    }
  }

  Ok(())
}
