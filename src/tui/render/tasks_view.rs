use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::Filter;
use crate::ops::task_ops;
use crate::tui::app::{AddField, App, LineEditor, Mode};
use crate::util::unicode::{display_width, truncate_to_width};

use super::editor_spans;

/// Render the main app view: header, then either the add form, the
/// empty-state placeholder, or the filter bar + task list + count row.
pub fn render_tasks_view(frame: &mut Frame, app: &mut App, area: Rect) {
    app.list_area = None;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // title + greeting + blank
            Constraint::Min(1),
        ])
        .split(area);

    render_header(frame, app, chunks[0]);

    if app.mode == Mode::AddTask {
        render_add_form(frame, app, chunks[1]);
    } else if task_ops::is_empty_state(&app.tasks) {
        // No tasks exist at all. A filter that merely matches nothing never
        // lands here; the list and controls stay up for that case.
        render_empty_state(frame, app, chunks[1]);
    } else {
        render_list(frame, app, chunks[1]);
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let name = app.name.as_deref().unwrap_or("");

    let lines = vec![
        Line::from(Span::styled(
            format!(" {}'s Tasks", name),
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(" Let's get organized, {}!", name),
            Style::default().fg(app.theme.dim).bg(bg),
        )),
    ];

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}

fn render_empty_state(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let lines = vec![
        Line::default(),
        Line::from(Span::styled(
            "  No tasks yet. Press a to add one.",
            Style::default().fg(app.theme.dim).bg(bg),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}

fn render_list(frame: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // filter bar
            Constraint::Min(1),    // task rows
            Constraint::Length(1), // remaining count
        ])
        .split(area);

    render_filter_bar(frame, app, chunks[0]);

    let list_area = chunks[1];
    let visible = app.visible_rows();
    app.clamp_cursor();

    let height = list_area.height as usize;
    if app.cursor < app.scroll_offset {
        app.scroll_offset = app.cursor;
    } else if height > 0 && app.cursor >= app.scroll_offset + height {
        app.scroll_offset = app.cursor + 1 - height;
    }

    let end = visible.len().min(app.scroll_offset + height);
    let mut lines: Vec<Line> = Vec::with_capacity(height);
    for (&index, row) in visible[app.scroll_offset..end].iter().zip(app.scroll_offset..end) {
        lines.push(task_line(app, index, row == app.cursor, list_area.width as usize));
    }

    let bg = app.theme.background;
    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), list_area);
    app.list_area = Some(list_area);

    render_count_row(frame, app, chunks[2]);
}

fn render_filter_bar(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let mut spans = vec![Span::styled(" ".to_string(), Style::default().bg(bg))];

    for (i, filter) in Filter::ALL.iter().enumerate() {
        let style = if *filter == app.filter {
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.dim).bg(bg)
        };
        spans.push(Span::styled(format!("{}:{}", i + 1, filter.label()), style));
        spans.push(Span::styled("   ".to_string(), Style::default().bg(bg)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn render_count_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let line = Line::from(Span::styled(
        format!(" {}", task_ops::count_label(&app.tasks)),
        Style::default().fg(app.theme.text).bg(bg),
    ));
    frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);
}

/// One task row: checkbox, text, then the schedule label dimmed at the end.
fn task_line(app: &App, index: usize, is_cursor: bool, width: usize) -> Line<'static> {
    let task = &app.tasks[index];
    let leaving = app.is_leaving(index);
    let bg = if is_cursor {
        app.theme.selection_bg
    } else {
        app.theme.background
    };

    let checkbox = if task.completed { "[x]" } else { "[ ]" };
    let checkbox_style = if task.completed {
        Style::default().fg(app.theme.green).bg(bg)
    } else {
        Style::default().fg(app.theme.dim).bg(bg)
    };

    let mut text_style = if task.completed {
        Style::default()
            .fg(app.theme.dim)
            .bg(bg)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(app.theme.text).bg(bg)
    };
    if leaving {
        // Fading out until the exit timer detaches the row
        text_style = text_style.add_modifier(Modifier::DIM | Modifier::ITALIC);
    }

    let mut spans = vec![
        Span::styled(" ".to_string(), Style::default().bg(bg)),
        Span::styled(checkbox.to_string(), checkbox_style),
        Span::styled(" ".to_string(), Style::default().bg(bg)),
    ];
    let mut used = 5;

    let text = truncate_to_width(&task.text, width.saturating_sub(used));
    used += display_width(&text);
    spans.push(Span::styled(text, text_style));

    if let Some(label) = task.schedule_label() {
        let avail = width.saturating_sub(used);
        if avail > 3 {
            let label = truncate_to_width(&label, avail - 2);
            used += 2 + display_width(&label);
            spans.push(Span::styled("  ".to_string(), Style::default().bg(bg)));
            spans.push(Span::styled(
                label,
                Style::default().fg(app.theme.dim).bg(bg),
            ));
        }
    }

    if used < width {
        spans.push(Span::styled(" ".repeat(width - used), Style::default().bg(bg)));
    }

    Line::from(spans)
}

fn render_add_form(frame: &mut Frame, app: &App, area: Rect) {
    let Some(form) = app.add_form.as_ref() else {
        return;
    };
    let bg = app.theme.background;

    let mut lines = vec![
        Line::from(Span::styled(
            " new task",
            Style::default().fg(app.theme.text_bright).bg(bg),
        )),
        Line::default(),
    ];

    let fields: [(AddField, &str, &LineEditor, &str); 3] = [
        (AddField::Text, "text", &form.text, ""),
        (AddField::Date, "date", &form.date, "yyyy-mm-dd, optional"),
        (AddField::Time, "time", &form.time, "HH:MM, optional"),
    ];

    for (field, label, editor, placeholder) in fields {
        let focused = form.focus == field;
        let label_style = if focused {
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.dim).bg(bg)
        };

        let mut spans = vec![Span::styled(format!("  {:>4}  ", label), label_style)];
        if focused {
            spans.extend(editor_spans(
                editor,
                Style::default().fg(app.theme.text_bright).bg(bg),
                Style::default().fg(app.theme.highlight).bg(bg),
            ));
        } else if editor.text.is_empty() && !placeholder.is_empty() {
            spans.push(Span::styled(
                placeholder.to_string(),
                Style::default().fg(app.theme.dim).bg(bg),
            ));
        } else {
            spans.push(Span::styled(
                editor.text.clone(),
                Style::default().fg(app.theme.text).bg(bg),
            ));
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}
