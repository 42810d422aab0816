use std::time::Instant;

use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Position;

use crate::model::Filter;

use super::app::{App, Mode};

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    // Transient diagnostics clear on the next keypress
    app.status_message = None;

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.mode {
        Mode::Welcome => handle_welcome(app, key),
        Mode::Navigate => handle_navigate(app, key),
        Mode::AddTask => handle_add_task(app, key),
    }
}

fn handle_welcome(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_name(),
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Char(c) => app.name_editor.insert(c),
        KeyCode::Backspace => app.name_editor.backspace(),
        KeyCode::Delete => app.name_editor.delete(),
        KeyCode::Left => app.name_editor.left(),
        KeyCode::Right => app.name_editor.right(),
        KeyCode::Home => app.name_editor.home(),
        KeyCode::End => app.name_editor.end(),
        _ => {}
    }
}

fn handle_navigate(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('a') => app.begin_add(),
        KeyCode::Char('j') | KeyCode::Down => {
            let last = app.visible_rows().len().saturating_sub(1);
            app.cursor = (app.cursor + 1).min(last);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.cursor = app.cursor.saturating_sub(1);
        }
        KeyCode::Char('g') => app.cursor = 0,
        KeyCode::Char('G') => {
            app.cursor = app.visible_rows().len().saturating_sub(1);
        }
        KeyCode::Char(' ') | KeyCode::Enter => app.toggle_visible_row(app.cursor),
        KeyCode::Char('c') => app.clear_completed(Instant::now()),
        KeyCode::Char('1') => app.set_filter(Filter::All),
        KeyCode::Char('2') => app.set_filter(Filter::Active),
        KeyCode::Char('3') => app.set_filter(Filter::Completed),
        _ => {}
    }
}

fn handle_add_task(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_add(),
        KeyCode::Esc => app.cancel_add(),
        KeyCode::Tab => {
            if let Some(form) = app.add_form.as_mut() {
                form.next_field();
            }
        }
        KeyCode::BackTab => {
            if let Some(form) = app.add_form.as_mut() {
                form.prev_field();
            }
        }
        code => {
            let Some(form) = app.add_form.as_mut() else {
                return;
            };
            let editor = form.focused_mut();
            match code {
                KeyCode::Char(c) => editor.insert(c),
                KeyCode::Backspace => editor.backspace(),
                KeyCode::Delete => editor.delete(),
                KeyCode::Left => editor.left(),
                KeyCode::Right => editor.right(),
                KeyCode::Home => editor.home(),
                KeyCode::End => editor.end(),
                _ => {}
            }
        }
    }
}

/// Handle a mouse event. A left click on a task row toggles it, the terminal
/// counterpart of clicking a rendered row.
pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.mode != Mode::Navigate {
        return;
    }
    if !matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
        return;
    }
    let Some(area) = app.list_area else {
        return;
    };
    if !area.contains(Position::new(mouse.column, mouse.row)) {
        return;
    }

    let row = (mouse.row - area.y) as usize + app.scroll_offset;
    if row < app.visible_rows().len() {
        app.cursor = row;
        app.toggle_visible_row(row);
    }
}
