use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode};

/// Render the status row (bottom of screen). A transient diagnostic wins
/// over the key hints; with hints disabled the row stays blank.
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let line = if let Some(msg) = &app.status_message {
        Line::from(Span::styled(
            format!(" {}", msg),
            Style::default().fg(app.theme.highlight).bg(bg),
        ))
    } else if app.show_key_hints {
        let hint = match app.mode {
            Mode::Welcome => "Enter continue",
            Mode::Navigate => "a add  space toggle  c clear completed  1/2/3 filter  q quit",
            Mode::AddTask => "Tab next field  Enter add  Esc cancel",
        };
        Line::from(Span::styled(
            format!(" {}", hint),
            Style::default().fg(app.theme.dim).bg(bg),
        ))
    } else {
        Line::from(Span::styled(" ".repeat(width), Style::default().bg(bg)))
    };

    let paragraph = Paragraph::new(line).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
