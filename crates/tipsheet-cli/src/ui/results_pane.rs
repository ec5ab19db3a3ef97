//! Recent-results pane — settled tips grouped by tier, then by day bucket.

use chrono::Local;
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};
use tipsheet_core::tip::{Plan, TipStatus};

use crate::{app::App, view};

/// Render the results board into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let block = Block::default()
    .title(" Recent Results ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let Some(results) = &app.results else {
    f.render_widget(
      Paragraph::new(Line::from(Span::styled(
        "Loading results…",
        Style::default().fg(Color::DarkGray),
      ))),
      inner,
    );
    return;
  };

  let today = Local::now().date_naive();
  let mut lines: Vec<Line> = Vec::new();

  for plan in Plan::ALL {
    let rows = results.get(&plan).map(Vec::as_slice).unwrap_or_default();

    lines.push(Line::from(Span::styled(
      format!("{plan} Plan"),
      Style::default()
        .fg(tier_color(plan))
        .add_modifier(Modifier::BOLD),
    )));

    if rows.is_empty() {
      lines.push(Line::from(Span::styled(
        format!("  No recent results for the {plan} plan"),
        Style::default().fg(Color::DarkGray),
      )));
      lines.push(Line::raw(""));
      continue;
    }

    for (bucket, group) in view::bucket_results(rows, today) {
      lines.push(Line::from(Span::styled(
        format!("  {bucket}"),
        Style::default().fg(Color::Cyan),
      )));
      for row in group {
        let status = match row.status {
          TipStatus::Won => Span::styled("Won", Style::default().fg(Color::Green)),
          TipStatus::Lost => Span::styled("Lost", Style::default().fg(Color::Red)),
          TipStatus::Pending => Span::raw("Pending"),
        };
        lines.push(Line::from(vec![
          Span::raw(format!(
            "    {:<28} {:<10} {:<16} {:<8} ",
            row.fixture, row.market, row.tip, row.result,
          )),
          status,
        ]));
      }
    }
    lines.push(Line::raw(""));
  }

  f.render_widget(Paragraph::new(lines), inner);
}

fn tier_color(plan: Plan) -> Color {
  match plan {
    Plan::Free => Color::White,
    Plan::Silver => Color::Gray,
    Plan::Gold => Color::Yellow,
    Plan::Platinum => Color::Magenta,
  }
}
