pub mod status_row;
pub mod tasks_view;
pub mod welcome_view;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::Block;

use super::app::{App, LineEditor, Mode};

/// Main render function — dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: content | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    match app.mode {
        Mode::Welcome => welcome_view::render_welcome(frame, app, chunks[0]),
        Mode::Navigate | Mode::AddTask => tasks_view::render_tasks_view(frame, app, chunks[0]),
    }

    status_row::render_status_row(frame, app, chunks[1]);
}

/// Spans for a single-line editor, with a block cursor at the edit position.
pub(super) fn editor_spans(
    editor: &LineEditor,
    text_style: Style,
    cursor_style: Style,
) -> Vec<Span<'static>> {
    let before = &editor.text[..editor.cursor];
    let after = &editor.text[editor.cursor..];
    vec![
        Span::styled(before.to_string(), text_style),
        Span::styled("\u{258C}".to_string(), cursor_style), // ▌ cursor
        Span::styled(after.to_string(), text_style),
    ]
}
