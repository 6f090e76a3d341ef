use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{info, warn};

use crate::io::gateway::TaskStore;
use crate::model::Config;
use crate::model::task::Task;
use crate::ops::batch::resolve_targets;
use crate::ops::collection::{Selection, TaskCollection};
use crate::ops::sort::SortState;

use super::input;
use super::picker::SearchPicker;
use super::quick_menu::QuickMenu;
use super::render;
use super::session::{EditorSession, SessionWarning};
use super::table::TableViewState;
use super::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// Transient message in the status row, cleared on the next key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
}

/// A row in the dependency viewer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepPopupEntry {
    SectionHeader { label: &'static str },
    Task {
        /// `None` when the reference is not in the current snapshot
        uuid: Option<String>,
        id: String,
        description: String,
    },
    Nothing,
}

/// Dependency viewer popup state
#[derive(Debug, Clone)]
pub struct DepPopupState {
    pub title: String,
    pub entries: Vec<DepPopupEntry>,
    pub cursor: usize,
}

/// Single-line text prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptState {
    pub uuid: String,
    pub label: &'static str,
    pub buffer: String,
}

/// Main application state.
///
/// Components are kept apart: the table reads the snapshot, the editor and
/// quick menu only reach the store, and every write is followed by a
/// refresh from the same handler.
pub struct App {
    pub store: Box<dyn TaskStore>,
    pub collection: TaskCollection,
    pub selection: Selection,
    pub sort: SortState,
    pub table: TableViewState,
    pub editor: EditorSession,
    pub quick_menu: QuickMenu,
    /// Targets resolved when the quick menu opened
    pub quick_targets: Vec<String>,
    pub picker: Option<SearchPicker>,
    pub dep_popup: Option<DepPopupState>,
    pub prompt: Option<PromptState>,
    pub status: Option<StatusMessage>,
    pub theme: Theme,
    pub show_help: bool,
    pub show_key_hints: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(store: Box<dyn TaskStore>, config: &Config) -> Self {
        App {
            store,
            collection: TaskCollection::new(),
            selection: Selection::new(),
            sort: SortState::default(),
            table: TableViewState::new(),
            editor: EditorSession::new(),
            quick_menu: QuickMenu::Closed,
            quick_targets: Vec::new(),
            picker: None,
            dep_popup: None,
            prompt: None,
            status: None,
            theme: Theme::from_config(&config.ui),
            show_help: false,
            show_key_hints: config.ui.show_key_hints,
            should_quit: false,
        }
    }

    /// Re-query the store, then rebuild everything that derives from the
    /// snapshot. Returns false if the query failed (old snapshot kept).
    pub fn refresh(&mut self) -> bool {
        let ok = match self.collection.refresh(self.store.as_ref()) {
            Ok(_) => {
                let pruned = self.selection.retain_present(&self.collection);
                if pruned > 0 {
                    info!(pruned, "dropped stale selection entries");
                }
                true
            }
            Err(e) => {
                self.set_error(format!("refresh failed: {}", e));
                false
            }
        };
        self.rebuild_table();
        self.sync_editor();
        ok
    }

    /// Re-sort and re-decorate rows from the current snapshot
    pub fn rebuild_table(&mut self) {
        self.table
            .render(&self.collection, &self.sort, &self.selection);
    }

    /// Point a clean, viewing editor at the highlighted row
    pub fn sync_editor(&mut self) {
        if self.editor.is_modifying() {
            return;
        }
        let task = self
            .table
            .highlighted_uuid()
            .and_then(|uuid| self.collection.find(uuid));
        if let Err(w) = self.editor.highlight(task, &self.collection) {
            warn!(warning = %w, "editor refused highlight after refresh");
        }
    }

    pub fn highlighted_task(&self) -> Option<&Task> {
        self.table
            .highlighted_uuid()
            .and_then(|uuid| self.collection.find(uuid))
    }

    /// Move the table cursor, unless the editor has unsaved changes
    pub fn move_cursor_with<F>(&mut self, f: F)
    where
        F: FnOnce(&mut TableViewState),
    {
        let before = self.table.cursor();
        f(&mut self.table);
        if self.table.cursor() == before {
            return;
        }
        let task = self
            .table
            .highlighted_uuid()
            .and_then(|uuid| self.collection.find(uuid));
        if let Err(w) = self.editor.highlight(task, &self.collection) {
            self.table.set_cursor(before);
            self.set_warning(w);
        }
    }

    /// Selection if non-empty, else the bound task
    pub fn batch_targets(&self) -> Vec<String> {
        resolve_targets(&self.selection, self.editor.existing_uuid())
    }

    /// Whether a modal currently owns the keyboard
    pub fn modal_open(&self) -> bool {
        self.quick_menu.is_open()
            || self.picker.is_some()
            || self.dep_popup.is_some()
            || self.prompt.is_some()
            || self.show_help
    }

    pub fn set_info(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            level: StatusLevel::Info,
        });
    }

    pub fn set_warning(&mut self, warning: SessionWarning) {
        self.status = Some(StatusMessage {
            text: warning.to_string(),
            level: StatusLevel::Warning,
        });
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            level: StatusLevel::Error,
        });
    }
}

/// Run the TUI application
pub fn run(store: Box<dyn TaskStore>, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::new(store, config);
    app.refresh();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    info!(tasks = app.collection.len(), "starting event loop");
    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
