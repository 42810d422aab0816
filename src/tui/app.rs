use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;

use crate::io::config_io::load_config;
use crate::io::store::{self, KvStore, default_data_dir};
use crate::model::{Config, Filter, Task};
use crate::ops::task_ops::{self, TaskError};
use crate::util::unicode;

use super::input;
use super::render;
use super::theme::Theme;

/// How long a row marked for removal stays on screen before it is detached
pub const ROW_EXIT: Duration = Duration::from_millis(250);

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// First-run name capture; shown until a name is persisted
    Welcome,
    Navigate,
    AddTask,
}

/// A single-line edit buffer. The cursor is a byte offset, always kept on a
/// grapheme boundary.
#[derive(Debug, Clone, Default)]
pub struct LineEditor {
    pub text: String,
    pub cursor: usize,
}

impl LineEditor {
    pub fn insert(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if let Some(prev) = unicode::prev_grapheme_boundary(&self.text, self.cursor) {
            self.text.drain(prev..self.cursor);
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        if let Some(next) = unicode::next_grapheme_boundary(&self.text, self.cursor) {
            self.text.drain(self.cursor..next);
        }
    }

    pub fn left(&mut self) {
        if let Some(prev) = unicode::prev_grapheme_boundary(&self.text, self.cursor) {
            self.cursor = prev;
        }
    }

    pub fn right(&mut self) {
        if let Some(next) = unicode::next_grapheme_boundary(&self.text, self.cursor) {
            self.cursor = next;
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.text.len();
    }
}

/// Which field of the add form has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddField {
    #[default]
    Text,
    Date,
    Time,
}

/// The add-task form: text plus optional date and time fields
#[derive(Debug, Clone, Default)]
pub struct AddForm {
    pub focus: AddField,
    pub text: LineEditor,
    pub date: LineEditor,
    pub time: LineEditor,
}

impl AddForm {
    pub fn focused_mut(&mut self) -> &mut LineEditor {
        match self.focus {
            AddField::Text => &mut self.text,
            AddField::Date => &mut self.date,
            AddField::Time => &mut self.time,
        }
    }

    pub fn next_field(&mut self) {
        self.focus = match self.focus {
            AddField::Text => AddField::Date,
            AddField::Date => AddField::Time,
            AddField::Time => AddField::Text,
        };
    }

    pub fn prev_field(&mut self) {
        self.focus = match self.focus {
            AddField::Text => AddField::Time,
            AddField::Date => AddField::Text,
            AddField::Time => AddField::Date,
        };
    }
}

/// A completed row on its way out. The task stays in the list (rendered in a
/// fading style) until the deadline passes, then is detached with its own save.
#[derive(Debug, Clone)]
pub struct LeavingRow {
    pub index: usize,
    pub deadline: Instant,
}

/// Main application state
pub struct App {
    pub store: KvStore,
    /// The ordered task list; single source of truth, projected by the view
    pub tasks: Vec<Task>,
    pub name: Option<String>,
    pub filter: Filter,
    pub mode: Mode,
    pub should_quit: bool,
    pub theme: Theme,
    pub show_key_hints: bool,
    /// Cursor index into the visible (filtered) rows
    pub cursor: usize,
    /// Scroll offset (first visible row)
    pub scroll_offset: usize,
    /// Name editor for the welcome view
    pub name_editor: LineEditor,
    /// Add form, present only in AddTask mode
    pub add_form: Option<AddForm>,
    /// Rows marked by clear-completed, awaiting their exit deadline
    pub leaving: Vec<LeavingRow>,
    /// Screen area of the task list, written during render so mouse clicks
    /// can be mapped back to rows
    pub list_area: Option<Rect>,
    /// Transient diagnostic for the status row; cleared on the next keypress
    pub status_message: Option<String>,
}

impl App {
    pub fn new(store: KvStore, config: &Config) -> Self {
        let mut status_message = None;
        if !store.document_intact() {
            status_message = Some("saved data could not be read; starting with an empty list".into());
        }

        let loaded = store::load_tasks(&store);
        if !loaded.intact {
            status_message = Some("saved tasks could not be read; starting with an empty list".into());
        }

        let name = store::load_name(&store);
        let mode = if name.is_some() {
            Mode::Navigate
        } else {
            Mode::Welcome
        };

        App {
            store,
            tasks: loaded.tasks,
            name,
            filter: Filter::default(),
            mode,
            should_quit: false,
            theme: Theme::from_config(&config.ui),
            show_key_hints: config.ui.show_key_hints,
            cursor: 0,
            scroll_offset: 0,
            name_editor: LineEditor::default(),
            add_form: None,
            leaving: Vec::new(),
            list_area: None,
            status_message,
        }
    }

    /// Indices of tasks visible under the current filter, in list order.
    pub fn visible_rows(&self) -> Vec<usize> {
        task_ops::visible_indices(&self.tasks, self.filter)
    }

    pub fn is_leaving(&self, index: usize) -> bool {
        self.leaving.iter().any(|l| l.index == index)
    }

    pub fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.visible_rows().len().saturating_sub(1));
    }

    /// Move the cursor onto a task by list index, if it is visible.
    fn select_task(&mut self, index: usize) {
        if let Some(row) = self.visible_rows().iter().position(|&i| i == index) {
            self.cursor = row;
        } else {
            self.clamp_cursor();
        }
    }

    /// Persist the full task list. A failed write becomes a status-row
    /// diagnostic; the in-memory list is unaffected.
    pub fn save(&mut self) {
        if let Err(e) = store::save_tasks(&mut self.store, &self.tasks) {
            self.status_message = Some(format!("could not save tasks: {e}"));
        }
    }

    /// Submit the welcome form. Whitespace-only input is ignored without any
    /// error; a real name is persisted and the app view takes over.
    pub fn submit_name(&mut self) {
        let name = self.name_editor.text.trim().to_string();
        if name.is_empty() {
            return;
        }
        if let Err(e) = store::save_name(&mut self.store, &name) {
            self.status_message = Some(format!("could not save name: {e}"));
            return;
        }
        self.name = Some(name);
        self.name_editor = LineEditor::default();
        self.mode = Mode::Navigate;
    }

    pub fn begin_add(&mut self) {
        self.add_form = Some(AddForm::default());
        self.mode = Mode::AddTask;
    }

    pub fn cancel_add(&mut self) {
        self.add_form = None;
        self.mode = Mode::Navigate;
    }

    /// Submit the add form. Empty text keeps the form open without an error,
    /// matching the welcome form; a non-empty date or time that does not parse
    /// keeps the form open with a format hint.
    pub fn submit_add(&mut self) {
        let Some(form) = self.add_form.as_ref() else {
            return;
        };
        let text = form.text.text.clone();
        let date_text = form.date.text.trim().to_string();
        let time_text = form.time.text.trim().to_string();

        let date = if date_text.is_empty() {
            None
        } else {
            match crate::model::task::parse_date(&date_text) {
                Some(d) => Some(d),
                None => {
                    self.status_message = Some("date must be yyyy-mm-dd".into());
                    return;
                }
            }
        };
        let time = if time_text.is_empty() {
            None
        } else {
            match crate::model::task::parse_time(&time_text) {
                Some(t) => Some(t),
                None => {
                    self.status_message = Some("time must be HH:MM".into());
                    return;
                }
            }
        };

        match task_ops::add_task(&mut self.tasks, &text, date, time) {
            Ok(()) => {
                self.add_form = None;
                self.mode = Mode::Navigate;
                self.save();
                self.select_task(self.tasks.len() - 1);
            }
            Err(TaskError::EmptyText) => {}
            Err(_) => {}
        }
    }

    /// Flip the completed flag of the task behind visible row `row`, then
    /// persist a full snapshot. The count, empty-state, and filter visibility
    /// all recompute from the list on the next draw.
    pub fn toggle_visible_row(&mut self, row: usize) {
        let visible = self.visible_rows();
        let Some(&index) = visible.get(row) else {
            return;
        };
        // A row already on its way out no longer responds to clicks
        if self.is_leaving(index) {
            return;
        }
        if task_ops::toggle_task(&mut self.tasks, index).is_ok() {
            self.save();
        }
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
        self.clamp_cursor();
    }

    /// Mark every completed row as leaving. Each detaches on its own deadline
    /// (see [`App::on_tick`]); with nothing eligible this is a no-op and the
    /// derived UI simply recomputes on the next draw.
    pub fn clear_completed(&mut self, now: Instant) {
        for index in task_ops::completed_indices(&self.tasks) {
            if !self.is_leaving(index) {
                self.leaving.push(LeavingRow {
                    index,
                    deadline: now + ROW_EXIT,
                });
            }
        }
    }

    /// Detach leaving rows whose deadline has passed. One save per detached
    /// row: each row completes its exit independently.
    pub fn on_tick(&mut self, now: Instant) {
        loop {
            let Some(pos) = self.leaving.iter().position(|l| l.deadline <= now) else {
                break;
            };
            let row = self.leaving.remove(pos);
            if task_ops::remove_task(&mut self.tasks, row.index).is_ok() {
                for l in &mut self.leaving {
                    if l.index > row.index {
                        l.index -= 1;
                    }
                }
                self.save();
            }
            self.clamp_cursor();
        }
    }
}

/// Run the TUI application
pub fn run(data_dir: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let dir = match data_dir {
        Some(dir) => dir.to_path_buf(),
        None => default_data_dir()?,
    };
    let store = KvStore::open(&dir)?;
    let (config, config_warning) = load_config(&dir);

    let mut app = App::new(store, &config);
    if app.status_message.is_none() {
        app.status_message = config_warning;
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    input::handle_key(app, key);
                }
                Event::Mouse(mouse) => input::handle_mouse(app, mouse),
                _ => {}
            }
        }

        app.on_tick(Instant::now());

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
