pub mod components;
mod views;

use crate::app::{App, Mode, Pane};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Min(1),    // Main content
      Constraint::Length(1), // Status bar
    ])
    .split(frame.area());

  match app.pane() {
    Pane::List { selected } => {
      views::entries::draw_entry_list(
        frame,
        chunks[0],
        &app.entries_for_display(),
        *selected,
        app.refreshing(),
      );
    }
    Pane::Add { form } => {
      views::add::draw_add_form(frame, chunks[0], form);
    }
    Pane::Delete {
      items,
      selected,
      confirming,
    } => {
      views::delete::draw_delete_list(frame, chunks[0], items, *selected, *confirming);
    }
  }

  draw_status_bar(frame, chunks[1], app);
}

fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
  if let Mode::Command = app.mode() {
    let mut spans = vec![Span::styled(
      format!(":{}", app.command_input()),
      Style::default().fg(Color::Yellow),
    )];

    if let Some(cmd) = app.autocomplete_suggestions().get(app.selected_suggestion()) {
      spans.push(Span::styled(
        format!("  ({}: {})", cmd.name, cmd.description),
        Style::default().fg(Color::DarkGray),
      ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
    return;
  }

  let (content, style) = if let Some(error) = app.status_error() {
    (format!(" {}", error), Style::default().fg(Color::Red))
  } else if let Some(message) = app.notification() {
    (format!(" {}", message), Style::default().fg(Color::Green))
  } else {
    let hint = match app.pane() {
      Pane::List { .. } => {
        " :command  j/k:nav  Enter:open  a:add  d:delete  r:refresh  q:quit"
      }
      Pane::Add { .. } => " Tab:switch field  Enter:submit  Esc:back",
      Pane::Delete { .. } => " j/k:nav  Space:toggle  Enter:delete selected  Esc:back",
    };
    (hint.to_string(), Style::default().fg(Color::DarkGray))
  };

  let paragraph = Paragraph::new(content).style(style);
  frame.render_widget(paragraph, area);
}
