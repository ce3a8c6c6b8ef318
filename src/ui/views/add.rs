use crate::ui::components::form::{AddForm, FormField};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

pub fn draw_add_form(frame: &mut Frame, area: Rect, form: &AddForm) {
  let block = Block::default()
    .title(" Add entry ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  let inner = block.inner(area);
  frame.render_widget(block, area);

  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(3), // Series id field
      Constraint::Length(3), // Title field
      Constraint::Length(1), // Hint
      Constraint::Min(0),
    ])
    .split(inner);

  draw_field(
    frame,
    chunks[0],
    "Series id",
    form.series_id(),
    form.focus() == FormField::SeriesId,
  );
  draw_field(
    frame,
    chunks[1],
    "Title",
    form.title(),
    form.focus() == FormField::Title,
  );

  let hint = form
    .hint()
    .unwrap_or("Tab:switch field  Enter:submit  Esc:cancel");
  let hint_style = if form.hint().is_some() {
    Style::default().fg(Color::Red)
  } else {
    Style::default().fg(Color::DarkGray)
  };
  frame.render_widget(Paragraph::new(hint).style(hint_style), chunks[2]);
}

fn draw_field(frame: &mut Frame, area: Rect, label: &str, value: &str, focused: bool) {
  let border_color = if focused { Color::Yellow } else { Color::DarkGray };

  let block = Block::default()
    .title(format!(" {} ", label))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(border_color));

  // Trailing block cursor on the focused field
  let content = if focused {
    format!("{}\u{2588}", value)
  } else {
    value.to_string()
  };

  let paragraph = Paragraph::new(content).block(block);
  frame.render_widget(paragraph, area);
}
