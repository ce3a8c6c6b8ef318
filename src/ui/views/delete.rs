use crate::app::DeleteItem;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};

use super::entries::truncate;

pub fn draw_delete_list(
  frame: &mut Frame,
  area: Rect,
  items: &[DeleteItem],
  selected: usize,
  confirming: bool,
) {
  let checked = items.iter().filter(|i| i.checked).count();
  let block = Block::default()
    .title(format!(" Delete entries ({} selected) ", checked))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Red));

  if items.is_empty() {
    let paragraph = Paragraph::new("Nothing to delete.")
      .block(block)
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
    return;
  }

  let list_items: Vec<ListItem> = items
    .iter()
    .map(|item| {
      let marker = if item.checked { "[x]" } else { "[ ]" };
      let style = if item.checked {
        Style::default().fg(Color::Red)
      } else {
        Style::default()
      };
      let line = Line::from(vec![
        Span::styled(marker, style),
        Span::raw(" "),
        Span::raw(truncate(&item.entry.title, 60)),
      ]);
      ListItem::new(line)
    })
    .collect();

  let list = List::new(list_items)
    .block(block)
    .highlight_style(
      Style::default()
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("> ");

  let mut state = ListState::default();
  state.select(Some(selected));

  frame.render_stateful_widget(list, area, &mut state);

  if confirming {
    draw_confirmation(frame, area, items);
  }
}

/// Explicit acknowledgment naming every selected title.
fn draw_confirmation(frame: &mut Frame, area: Rect, items: &[DeleteItem]) {
  let titles: Vec<&str> = items
    .iter()
    .filter(|i| i.checked)
    .map(|i| i.entry.title.as_str())
    .collect();

  let mut lines = vec![Line::from("Delete the following entries?"), Line::from("")];
  for title in &titles {
    lines.push(Line::from(format!("  - {}", title)));
  }
  lines.push(Line::from(""));
  lines.push(Line::from(Span::styled(
    "y:confirm  n:cancel",
    Style::default().fg(Color::DarkGray),
  )));

  let height = (lines.len() as u16 + 2).min(area.height);
  let overlay = centered_rect(area, 50, height);

  let block = Block::default()
    .title(" Confirm deletion ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Red));

  frame.render_widget(Clear, overlay);
  frame.render_widget(
    Paragraph::new(lines).wrap(Wrap { trim: false }).block(block),
    overlay,
  );
}

fn centered_rect(area: Rect, percent_x: u16, height: u16) -> Rect {
  let width = area.width * percent_x / 100;
  let x = area.x + (area.width.saturating_sub(width)) / 2;
  let y = area.y + (area.height.saturating_sub(height)) / 2;
  Rect::new(x, y, width, height)
}
