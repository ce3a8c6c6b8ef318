use crate::client::api::WatchlistApi;
use crate::client::snapshot::SnapshotRepository;
use crate::client::sync;
use crate::commands::{self, Command};
use crate::config::Config;
use crate::event::{Event, EventHandler, SyncEvent};
use crate::store::types::Entry;
use crate::ui;
use crate::ui::components::form::{AddForm, FormResult};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{error, warn};

/// How long the add-confirmation message stays on screen.
const NOTIFICATION_TTL: Duration = Duration::from_secs(7);

/// Input mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
  Normal,
  Command,
}

/// Active pane of the watchlist. List is the root; Add and Delete collapse
/// back to it.
#[derive(Debug)]
pub enum Pane {
  List {
    selected: usize,
  },
  Add {
    form: AddForm,
  },
  Delete {
    items: Vec<DeleteItem>,
    selected: usize,
    confirming: bool,
  },
}

/// One row of the delete checklist, keyed by the entry's record id.
#[derive(Debug)]
pub struct DeleteItem {
  pub entry: Entry,
  pub checked: bool,
}

/// Main application state
pub struct App {
  /// Entries as fetched from the store; sorted at render time
  entries: Vec<Entry>,

  /// Active pane
  pane: Pane,

  /// Current input mode
  mode: Mode,

  /// Command input buffer (after pressing :)
  command_input: String,

  /// Selected autocomplete suggestion index
  selected_suggestion: usize,

  /// Transient confirmation message and when it appeared
  notification: Option<(String, Instant)>,

  /// Last background failure, shown in the status line
  status_error: Option<String>,

  /// Whether a background refresh is in flight (display only; submissions
  /// are not debounced)
  refreshing: bool,

  /// Application configuration
  config: Config,

  /// Proxy API client
  api: WatchlistApi,

  /// Persisted snapshot of the list
  snapshot: SnapshotRepository,

  /// Event sender for async tasks
  event_tx: mpsc::UnboundedSender<Event>,

  /// Whether to quit
  should_quit: bool,
}

impl App {
  pub async fn new(config: Config) -> Result<Self> {
    let api = WatchlistApi::new(&config.api_url)?;
    let snapshot = SnapshotRepository::open()?;

    // Cache-first: render whatever the snapshot holds, refresh in background
    let entries = match snapshot.load() {
      Ok(Some(entries)) => entries,
      Ok(None) => Vec::new(),
      Err(e) => {
        warn!("Ignoring unreadable snapshot: {e}");
        Vec::new()
      }
    };

    let (tx, _rx) = mpsc::unbounded_channel();

    Ok(Self {
      entries,
      pane: Pane::List { selected: 0 },
      mode: Mode::Normal,
      command_input: String::new(),
      selected_suggestion: 0,
      notification: None,
      status_error: None,
      refreshing: false,
      config,
      api,
      snapshot,
      event_tx: tx,
      should_quit: false,
    })
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    // Create event handler
    let mut events = EventHandler::new(Duration::from_millis(250));
    self.event_tx = events.sender();

    // Initial background refresh
    self.spawn_refresh(false);

    // Main loop
    while !self.should_quit {
      // Draw UI
      terminal.draw(|frame| ui::draw(frame, self))?;

      // Handle events
      if let Some(event) = events.next().await {
        self.handle_event(event);
      }
    }

    // Cleanup terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    Ok(())
  }

  fn handle_event(&mut self, event: Event) {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Tick => self.expire_notification(),
      Event::Sync(sync_event) => self.handle_sync_event(sync_event),
      Event::Error(msg) => {
        error!("{msg}");
        self.refreshing = false;
        self.status_error = Some(msg);
      }
    }
  }

  fn handle_sync_event(&mut self, event: SyncEvent) {
    match event {
      SyncEvent::Refreshed { entries, forced } => {
        self.refreshing = false;
        if forced || sync::lists_differ(&self.entries, &entries) {
          if let Err(e) = self.snapshot.save(&entries) {
            warn!("Failed to persist snapshot: {e}");
          }
          self.entries = entries;

          if let Pane::List { selected } = &mut self.pane {
            *selected = (*selected).min(self.entries.len().saturating_sub(1));
          }
        }
      }
      SyncEvent::Added { title } => {
        self.status_error = None;
        self.notification = Some((format!("{} added to the list!", title), Instant::now()));
        if let Pane::Add { form } = &mut self.pane {
          form.clear();
        }
        self.spawn_refresh(true);
      }
      SyncEvent::Removed { count } => {
        self.status_error = None;
        self.notification = Some((format!("Deleted {} entries", count), Instant::now()));
        // Collapse the checklist only once the remote delete succeeded
        self.pane = Pane::List { selected: 0 };
        self.spawn_refresh(true);
      }
    }
  }

  fn expire_notification(&mut self) {
    if let Some((_, shown_at)) = &self.notification {
      if shown_at.elapsed() >= NOTIFICATION_TTL {
        self.notification = None;
      }
    }
  }

  fn handle_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    match self.mode {
      Mode::Command => self.handle_command_mode_key(key),
      Mode::Normal => match &mut self.pane {
        Pane::List { .. } => self.handle_list_key(key),
        Pane::Add { .. } => self.handle_add_key(key),
        Pane::Delete { .. } => self.handle_delete_key(key),
      },
    }
  }

  fn handle_list_key(&mut self, key: KeyEvent) {
    let Pane::List { selected } = &mut self.pane else {
      return;
    };

    match key.code {
      KeyCode::Char('q') => self.should_quit = true,
      KeyCode::Up | KeyCode::Char('k') => {
        let len = self.entries.len();
        if len > 0 {
          *selected = (*selected as i32 - 1).rem_euclid(len as i32) as usize;
        }
      }
      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.entries.len();
        if len > 0 {
          *selected = (*selected as i32 + 1).rem_euclid(len as i32) as usize;
        }
      }
      KeyCode::Enter => self.open_selected(),
      KeyCode::Char('a') => self.pane = Pane::Add { form: AddForm::new() },
      KeyCode::Char('d') => self.open_delete_pane(),
      KeyCode::Char('r') => self.spawn_refresh(true),
      KeyCode::Char(':') => {
        self.mode = Mode::Command;
        self.command_input.clear();
        self.selected_suggestion = 0;
      }
      _ => {}
    }
  }

  fn handle_add_key(&mut self, key: KeyEvent) {
    let Pane::Add { form } = &mut self.pane else {
      return;
    };

    match form.handle_key(key) {
      FormResult::Submitted { series_id, title } => self.submit_add(series_id, title),
      FormResult::Cancelled => self.pane = Pane::List { selected: 0 },
      FormResult::Consumed => {}
    }
  }

  fn handle_delete_key(&mut self, key: KeyEvent) {
    let Pane::Delete {
      items,
      selected,
      confirming,
    } = &mut self.pane
    else {
      return;
    };

    if *confirming {
      match key.code {
        KeyCode::Char('y') | KeyCode::Enter => {
          *confirming = false;
          self.submit_delete();
        }
        KeyCode::Char('n') | KeyCode::Esc => *confirming = false,
        _ => {}
      }
      return;
    }

    match key.code {
      KeyCode::Esc | KeyCode::Char('q') => self.pane = Pane::List { selected: 0 },
      KeyCode::Up | KeyCode::Char('k') => {
        let len = items.len();
        if len > 0 {
          *selected = (*selected as i32 - 1).rem_euclid(len as i32) as usize;
        }
      }
      KeyCode::Down | KeyCode::Char('j') => {
        let len = items.len();
        if len > 0 {
          *selected = (*selected as i32 + 1).rem_euclid(len as i32) as usize;
        }
      }
      KeyCode::Char(' ') => {
        if let Some(item) = items.get_mut(*selected) {
          item.checked = !item.checked;
        }
      }
      KeyCode::Enter => {
        if items.iter().any(|i| i.checked) {
          *confirming = true;
        }
      }
      _ => {}
    }
  }

  fn handle_command_mode_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.mode = Mode::Normal;
        self.command_input.clear();
        self.selected_suggestion = 0;
      }
      KeyCode::Enter => {
        self.execute_command();
        self.mode = Mode::Normal;
        self.selected_suggestion = 0;
      }
      KeyCode::Tab | KeyCode::Down => {
        let suggestions = commands::get_suggestions(&self.command_input);
        if !suggestions.is_empty() {
          self.selected_suggestion = (self.selected_suggestion + 1) % suggestions.len();
        }
      }
      KeyCode::BackTab | KeyCode::Up => {
        let suggestions = commands::get_suggestions(&self.command_input);
        if !suggestions.is_empty() {
          self.selected_suggestion = if self.selected_suggestion == 0 {
            suggestions.len() - 1
          } else {
            self.selected_suggestion - 1
          };
        }
      }
      KeyCode::Backspace => {
        self.command_input.pop();
        self.selected_suggestion = 0;
      }
      KeyCode::Char(c) => {
        self.command_input.push(c);
        self.selected_suggestion = 0;
      }
      _ => {}
    }
  }

  fn execute_command(&mut self) {
    // Execute the selected suggestion if any, otherwise the raw input
    let suggestions = commands::get_suggestions(&self.command_input);
    let cmd = if let Some(suggestion) = suggestions.get(self.selected_suggestion) {
      suggestion.name.to_string()
    } else {
      self.command_input.trim().to_lowercase()
    };

    match cmd.as_str() {
      "entries" => self.pane = Pane::List { selected: 0 },
      "add" => self.pane = Pane::Add { form: AddForm::new() },
      "delete" => self.open_delete_pane(),
      "refresh" => self.spawn_refresh(true),
      "quit" => self.should_quit = true,
      _ => {}
    }
    self.command_input.clear();
  }

  /// Build the delete checklist from the current display order.
  fn open_delete_pane(&mut self) {
    let items = self
      .entries_for_display()
      .into_iter()
      .map(|entry| DeleteItem {
        entry,
        checked: false,
      })
      .collect();

    self.pane = Pane::Delete {
      items,
      selected: 0,
      confirming: false,
    };
  }

  fn spawn_refresh(&mut self, forced: bool) {
    self.refreshing = true;

    let api = self.api.clone();
    let tx = self.event_tx.clone();

    tokio::spawn(async move {
      match api.fetch_entries().await {
        Ok(entries) => {
          let _ = tx.send(Event::Sync(SyncEvent::Refreshed { entries, forced }));
        }
        Err(e) => {
          let _ = tx.send(Event::Error(format!("Refresh failed: {e}")));
        }
      }
    });
  }

  fn submit_add(&mut self, series_id: String, title: String) {
    let api = self.api.clone();
    let tx = self.event_tx.clone();

    tokio::spawn(async move {
      match api.add(&series_id, &title).await {
        Ok(()) => {
          let _ = tx.send(Event::Sync(SyncEvent::Added { title }));
        }
        Err(e) => {
          let _ = tx.send(Event::Error(format!("Failed to add entry: {e}")));
        }
      }
    });
  }

  /// Submit the checked record ids. The checklist stays open until the
  /// remote delete succeeds.
  fn submit_delete(&mut self) {
    let Pane::Delete { items, .. } = &self.pane else {
      return;
    };

    let record_ids: Vec<String> = items
      .iter()
      .filter(|i| i.checked)
      .map(|i| i.entry.record_id.clone())
      .collect();

    if record_ids.is_empty() {
      return;
    }

    let count = record_ids.len();
    let api = self.api.clone();
    let tx = self.event_tx.clone();

    tokio::spawn(async move {
      match api.remove(&record_ids).await {
        Ok(()) => {
          let _ = tx.send(Event::Sync(SyncEvent::Removed { count }));
        }
        Err(e) => {
          let _ = tx.send(Event::Error(format!("Failed to delete entries: {e}")));
        }
      }
    });
  }

  fn open_selected(&mut self) {
    let Pane::List { selected } = &self.pane else {
      return;
    };

    let display = self.entries_for_display();
    if let Some(entry) = display.get(*selected) {
      let url = entry.watch_url(&self.config.watch_url);
      if let Err(e) = open_in_browser(&url) {
        error!("Failed to open {url}: {e}");
        self.status_error = Some(format!("Failed to open browser: {e}"));
      }
    }
  }

  // Accessors for UI rendering
  pub fn pane(&self) -> &Pane {
    &self.pane
  }

  pub fn mode(&self) -> &Mode {
    &self.mode
  }

  pub fn command_input(&self) -> &str {
    &self.command_input
  }

  pub fn entries_for_display(&self) -> Vec<Entry> {
    sync::sorted_for_display(&self.entries)
  }

  pub fn refreshing(&self) -> bool {
    self.refreshing
  }

  pub fn notification(&self) -> Option<&str> {
    self.notification.as_ref().map(|(msg, _)| msg.as_str())
  }

  pub fn status_error(&self) -> Option<&str> {
    self.status_error.as_deref()
  }

  pub fn autocomplete_suggestions(&self) -> Vec<&'static Command> {
    commands::get_suggestions(&self.command_input)
  }

  pub fn selected_suggestion(&self) -> usize {
    self.selected_suggestion
  }
}

/// Open a URL in the default browser via the platform opener.
fn open_in_browser(url: &str) -> std::io::Result<()> {
  use std::process::{Command, Stdio};

  #[cfg(target_os = "macos")]
  let mut command = Command::new("open");
  #[cfg(target_os = "windows")]
  let mut command = {
    let mut c = Command::new("cmd");
    c.args(["/C", "start", ""]);
    c
  };
  #[cfg(not(any(target_os = "macos", target_os = "windows")))]
  let mut command = Command::new("xdg-open");

  command
    .arg(url)
    .stdout(Stdio::null())
    .stderr(Stdio::null())
    .spawn()
    .map(|_| ())
}
