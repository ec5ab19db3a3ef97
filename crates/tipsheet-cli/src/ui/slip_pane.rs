//! Bet slip pane — selections, stake, combined odds, potential return.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use crate::app::App;

/// Render the bet slip into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let block = Block::default()
    .title(format!(" Bet Slip ({}) ", app.slip.len()))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let mut lines: Vec<Line> = Vec::new();

  if app.slip.is_empty() {
    lines.push(Line::from(Span::styled(
      "No selections yet",
      Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
      "Enter/Space on a tip adds it here.",
      Style::default().fg(Color::DarkGray),
    )));
  } else {
    for tip in app.slip.selections() {
      lines.push(Line::from(Span::styled(
        tip.fixture(),
        Style::default().add_modifier(Modifier::BOLD),
      )));
      lines.push(Line::from(Span::styled(
        format!(
          "  {} @ {}",
          tip.pick.as_deref().unwrap_or("-"),
          tip.odds.unwrap_or(0.0),
        ),
        Style::default().fg(Color::DarkGray),
      )));
    }

    lines.push(Line::raw(""));

    let stake_line = match &app.stake_input {
      Some(buffer) => format!("Stake: {buffer}_"),
      None => format!("Stake: {:.2}", app.slip.stake),
    };
    lines.push(Line::from(Span::styled(
      stake_line,
      Style::default().fg(Color::Yellow),
    )));
    lines.push(Line::raw(format!("Total odds: {:.2}", app.slip.total_odds())));
    lines.push(Line::from(Span::styled(
      format!("Potential return: {:.2}", app.slip.potential_return()),
      Style::default()
        .fg(Color::Green)
        .add_modifier(Modifier::BOLD),
    )));
  }

  f.render_widget(Paragraph::new(lines), inner);
}
