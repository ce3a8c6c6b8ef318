use crossterm::event::{KeyCode, KeyEvent};

/// Which field of the add form has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
  #[default]
  SeriesId,
  Title,
}

/// Result of handling a key event in the add form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormResult {
  /// Key was handled, stay in the form
  Consumed,
  /// Both fields filled and Enter pressed on the title field
  Submitted { series_id: String, title: String },
  /// Escape pressed
  Cancelled,
}

/// Two-field input form for the create flow.
#[derive(Debug, Clone, Default)]
pub struct AddForm {
  series_id: String,
  title: String,
  focus: FormField,
  hint: Option<&'static str>,
}

impl AddForm {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn series_id(&self) -> &str {
    &self.series_id
  }

  pub fn title(&self) -> &str {
    &self.title
  }

  pub fn focus(&self) -> FormField {
    self.focus
  }

  /// Validation hint shown under the fields, if any
  pub fn hint(&self) -> Option<&'static str> {
    self.hint
  }

  pub fn clear(&mut self) {
    self.series_id.clear();
    self.title.clear();
    self.focus = FormField::SeriesId;
    self.hint = None;
  }

  fn focused_buffer(&mut self) -> &mut String {
    match self.focus {
      FormField::SeriesId => &mut self.series_id,
      FormField::Title => &mut self.title,
    }
  }

  fn toggle_focus(&mut self) {
    self.focus = match self.focus {
      FormField::SeriesId => FormField::Title,
      FormField::Title => FormField::SeriesId,
    };
  }

  /// Handle a key event. Enter on the series-id field moves to the title
  /// field; Enter on the title field submits once both fields are non-empty.
  pub fn handle_key(&mut self, key: KeyEvent) -> FormResult {
    match key.code {
      KeyCode::Esc => FormResult::Cancelled,
      KeyCode::Tab | KeyCode::BackTab => {
        self.toggle_focus();
        FormResult::Consumed
      }
      KeyCode::Enter => {
        if self.focus == FormField::SeriesId {
          self.focus = FormField::Title;
          return FormResult::Consumed;
        }

        let series_id = self.series_id.trim().to_string();
        let title = self.title.trim().to_string();
        if series_id.is_empty() || title.is_empty() {
          self.hint = Some("Both id and title are required");
          return FormResult::Consumed;
        }

        FormResult::Submitted { series_id, title }
      }
      KeyCode::Backspace => {
        self.focused_buffer().pop();
        FormResult::Consumed
      }
      KeyCode::Char(c) => {
        self.hint = None;
        self.focused_buffer().push(c);
        FormResult::Consumed
      }
      _ => FormResult::Consumed,
    }
  }
}
