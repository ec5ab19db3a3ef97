//! Tips table pane — day-grouped, paginated tip rows.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use tipsheet_core::tip::{TipStatus, TipView};

use crate::{
  app::App,
  view::{self, Row},
};

/// Render the tips table into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let rows = app.rows();
  let pages = view::page_count(rows.len(), app.per_page());
  let page_rows = app.page_rows();

  let title = format!(
    " Tips ({})  page {}/{}  [{}/page] ",
    app.visible_tips().len(),
    app.page + 1,
    pages,
    app.per_page(),
  );

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let mut inner_area = block.inner(area);
  f.render_widget(block, area);

  // Filter bar at the bottom of the pane while a query is set.
  if (app.filter_active || !app.filter.is_empty()) && inner_area.height > 2 {
    let filter_area = Rect {
      x:      inner_area.x,
      y:      inner_area.y + inner_area.height - 1,
      width:  inner_area.width,
      height: 1,
    };
    inner_area.height = inner_area.height.saturating_sub(1);

    let filter_text = if app.filter_active {
      format!("/{}_", app.filter)
    } else {
      format!("/{}", app.filter)
    };
    f.render_widget(
      Paragraph::new(filter_text).style(Style::default().fg(Color::Yellow)),
      filter_area,
    );
  }

  if page_rows.is_empty() {
    f.render_widget(
      Paragraph::new(Line::from(Span::styled(
        "No tips available",
        Style::default().fg(Color::DarkGray),
      ))),
      inner_area,
    );
    return;
  }

  let items: Vec<ListItem> = page_rows
    .iter()
    .map(|row| match row {
      Row::Header(day) => ListItem::new(Line::from(Span::styled(
        format!("── {day} ──"),
        Style::default()
          .fg(Color::Cyan)
          .add_modifier(Modifier::BOLD),
      ))),
      Row::Tip(tip) => ListItem::new(tip_line(app, tip)),
    })
    .collect();

  let mut state = ListState::default();
  state.select(Some(app.cursor));

  f.render_stateful_widget(
    List::new(items)
      .highlight_style(
        Style::default()
          .bg(Color::Blue)
          .fg(Color::White)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol(""),
    inner_area,
    &mut state,
  );
}

fn status_span(status: TipStatus) -> Span<'static> {
  match status {
    TipStatus::Pending => Span::styled("Pending", Style::default().fg(Color::Yellow)),
    TipStatus::Won => Span::styled("Won", Style::default().fg(Color::Green)),
    TipStatus::Lost => Span::styled("Lost", Style::default().fg(Color::Red)),
  }
}

fn tip_line<'a>(app: &App, tip: &'a TipView) -> Line<'a> {
  let marker = if app.slip.contains(tip.id) { "[+] " } else { "    " };
  let head = format!("{marker}{:<6} {:<28}", tip.time, tip.fixture());

  if tip.locked {
    return Line::from(vec![
      Span::raw(head),
      Span::styled(
        format!("🔒 {} tier — subscribe to unlock", tip.plan),
        Style::default().fg(Color::DarkGray),
      ),
    ]);
  }

  let mut spans = vec![
    Span::raw(head),
    Span::raw(format!(
      "{:<10} {:<16} @ {:<5} ",
      tip.market,
      tip.pick.as_deref().unwrap_or("-"),
      tip.odds.map(|o| o.to_string()).unwrap_or_else(|| "-".into()),
    )),
  ];

  if app.admin_view {
    spans.push(status_span(tip.status));
    spans.push(Span::raw(format!("  {}", tip.plan)));
    if let Some(score) = &tip.score {
      spans.push(Span::raw(format!("  {score}")));
    }
  } else if tip.status.is_settled() {
    spans.push(status_span(tip.status));
    if let Some(score) = &tip.score {
      spans.push(Span::raw(format!(" {score}")));
    }
  }

  Line::from(spans)
}
