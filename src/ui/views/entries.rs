use crate::store::types::Entry;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

pub fn draw_entry_list(
  frame: &mut Frame,
  area: Rect,
  entries: &[Entry],
  selected: usize,
  refreshing: bool,
) {
  let title = if refreshing {
    format!(" Watchlist ({}) (refreshing...) ", entries.len())
  } else {
    format!(" Watchlist ({}) ", entries.len())
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  if entries.is_empty() && !refreshing {
    let paragraph = Paragraph::new("No entries yet. Press 'a' to add one.")
      .block(block)
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
    return;
  }

  let items: Vec<ListItem> = entries
    .iter()
    .map(|entry| {
      let line = Line::from(vec![
        Span::raw(truncate(&entry.title, 60)),
        Span::raw("  "),
        Span::styled(
          format!("#{}", entry.series_id),
          Style::default().fg(Color::DarkGray),
        ),
      ]);
      ListItem::new(line)
    })
    .collect();

  let list = List::new(items)
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
}

pub(crate) fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", cut)
  }
}
