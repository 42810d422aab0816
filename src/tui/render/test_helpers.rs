use ratatui::Terminal;
use ratatui::backend::TestBackend;
use tempfile::TempDir;

use crate::io::store::{KvStore, save_name, save_tasks};
use crate::model::{Config, Task};
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render one frame into an in-memory buffer and return plain text, trailing
/// whitespace and blank lines stripped (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(f).unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Full-frame render of the app as plain text.
pub fn draw_app(app: &mut App) -> String {
    render_to_string(TERM_W, TERM_H, |frame| super::render(frame, app))
}

/// An app over a fresh store, still on the welcome view. The TempDir must
/// outlive the app for store writes to land.
pub fn fresh_app() -> (App, TempDir) {
    let dir = TempDir::new().unwrap();
    let store = KvStore::open(dir.path()).unwrap();
    (App::new(store, &Config::default()), dir)
}

/// An onboarded app (name "Ada") seeded with `(text, completed)` tasks
/// through the persisted store.
pub fn app_with_tasks(specs: &[(&str, bool)]) -> (App, TempDir) {
    let dir = TempDir::new().unwrap();
    let mut store = KvStore::open(dir.path()).unwrap();
    save_name(&mut store, "Ada").unwrap();

    let tasks: Vec<Task> = specs
        .iter()
        .map(|&(text, completed)| Task {
            text: text.into(),
            completed,
            date: None,
            time: None,
        })
        .collect();
    save_tasks(&mut store, &tasks).unwrap();

    (App::new(store, &Config::default()), dir)
}
