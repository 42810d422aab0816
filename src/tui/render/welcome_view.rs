use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;

use super::editor_spans;

/// Render the one-time name capture view
pub fn render_welcome(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;

    let title_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::default(),
        Line::from(Span::styled("  [ ] tend", title_style)),
        Line::default(),
        Line::from(Span::styled(
            "  Welcome! What should we call you?",
            Style::default().fg(app.theme.text).bg(bg),
        )),
        Line::default(),
    ];

    let mut prompt = vec![Span::styled(
        "  > ",
        Style::default().fg(app.theme.dim).bg(bg),
    )];
    prompt.extend(editor_spans(
        &app.name_editor,
        Style::default().fg(app.theme.text_bright).bg(bg),
        Style::default().fg(app.theme.highlight).bg(bg),
    ));
    lines.push(Line::from(prompt));

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}
