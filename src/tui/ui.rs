//! UI rendering for the TUI.

use chrono::{Local, NaiveDateTime};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::core::DateResolver;
use crate::output::{humanize_deadline, is_overdue};
use crate::tasks::{Status, Task};
use crate::tui::app::{App, Mode};

const DEFAULT_STATUS: &str = "j/k:nav | Enter:status | n:new | d:delete | /:filter | ?:help | q:quit";

/// Render the application UI.
pub fn render<R: DateResolver>(frame: &mut Frame<'_>, app: &App<'_, R>) {
    // Create layout: header, table, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Table
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_table(frame, app, chunks[1], Local::now().naive_local());
    render_status_bar(frame, app, chunks[2]);
}

/// Render the header.
fn render_header<R: DateResolver>(frame: &mut Frame<'_>, app: &App<'_, R>, area: Rect) {
    let title = match &app.filter.query {
        Some(query) => format!(" Tasks matching \"{query}\" ({}) ", app.tasks.len()),
        None => format!(" Tasks ({}) ", app.tasks.len()),
    };

    let header = Paragraph::new(title)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );

    frame.render_widget(header, area);
}

fn status_color(status: Status) -> Color {
    match status {
        Status::Todo => Color::White,
        Status::Doing => Color::Yellow,
        Status::Done => Color::Green,
    }
}

fn task_row(task: &Task, now: NaiveDateTime) -> Row<'_> {
    let deadline = match task.deadline {
        Some(deadline) if is_overdue(task, now) => Cell::from(format!(
            "⚠ {}",
            humanize_deadline(deadline, now)
        ))
        .style(Style::default().fg(Color::Red)),
        Some(deadline) => Cell::from(humanize_deadline(deadline, now))
            .style(Style::default().fg(Color::Yellow)),
        None => Cell::from(""),
    };

    let tags = task
        .tags
        .iter()
        .map(|t| format!("#{t}"))
        .collect::<Vec<_>>()
        .join(" ");

    let title_style = if task.status == Status::Done {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };

    Row::new(vec![
        Cell::from(task.title.as_str()).style(title_style),
        Cell::from(task.description.as_deref().unwrap_or(""))
            .style(Style::default().fg(Color::DarkGray)),
        deadline,
        Cell::from(tags).style(Style::default().fg(Color::Blue)),
        Cell::from(task.status.to_string()).style(Style::default().fg(status_color(task.status))),
    ])
}

/// Render the task table.
fn render_table<R: DateResolver>(
    frame: &mut Frame<'_>,
    app: &App<'_, R>,
    area: Rect,
    now: NaiveDateTime,
) {
    let header = Row::new(["Title", "Description", "Deadline", "Tags", "Status"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row<'_>> = app.tasks.iter().map(|task| task_row(task, now)).collect();

    let widths = [
        Constraint::Percentage(30),
        Constraint::Percentage(25),
        Constraint::Percentage(17),
        Constraint::Percentage(18),
        Constraint::Length(6),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );

    // Create table state for scrolling
    let mut state = TableState::default();
    if !app.tasks.is_empty() {
        state.select(Some(app.selected));
    }

    frame.render_stateful_widget(table, area, &mut state);
}

/// Render the status bar, or the input line while typing.
fn render_status_bar<R: DateResolver>(frame: &mut Frame<'_>, app: &App<'_, R>, area: Rect) {
    let line = match app.mode {
        Mode::Adding => Line::from(vec![
            Span::styled("New task: ", Style::default().fg(Color::Cyan)),
            Span::raw(format!("{}_", app.input)),
        ]),
        Mode::Filtering => Line::from(vec![
            Span::styled("Filter: ", Style::default().fg(Color::Cyan)),
            Span::raw(format!("{}_", app.input)),
        ]),
        Mode::Normal => Line::from(Span::styled(
            app.status.as_deref().unwrap_or(DEFAULT_STATUS),
            Style::default().fg(Color::DarkGray),
        )),
    };

    frame.render_widget(Paragraph::new(line), area);
}
