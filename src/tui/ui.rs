use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};

use crate::crud::form::{Field, FieldKind};
use crate::crud::list::{self, COLUMNS, EMPTY_PLACEHOLDER, TableRow};
use crate::models::Priority;
use crate::tui::app::{App, FocusedPanel, InputMode};
use crate::tui::theme;

pub fn draw(frame: &mut Frame, app: &App) {
    // Fill the entire background
    let bg_block = Block::default().style(Style::default().bg(theme::BG));
    frame.render_widget(bg_block, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            format!("  {} ", theme::HEADER_ART),
            Style::default()
                .fg(theme::NEON_CYAN)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("│ ", Style::default().fg(theme::BORDER_DIM)),
        Span::styled(app.base_url.as_str(), Style::default().fg(theme::NEON_MAGENTA)),
    ]))
    .block(plain_block());
    frame.render_widget(header, chunks[0]);

    // Body: form (left) and table (right)
    let body_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);

    draw_form(frame, app, body_chunks[0]);
    draw_table(frame, app, body_chunks[1]);

    // Status line
    let status = match app.container.notice() {
        Some(notice) => Line::from(Span::styled(
            format!("  {}", notice.text),
            theme::notice_style(notice),
        )),
        None => Line::from(""),
    };
    frame.render_widget(Paragraph::new(status).block(plain_block()), chunks[2]);

    // Footer
    let hint = match app.focused_panel {
        FocusedPanel::List => {
            "  j/k: Move  e: Edit  d: Delete  n: New  r: Reload  ?: Help  q: Quit"
        }
        FocusedPanel::Form => {
            "  Tab/↑↓: Field  Space: Toggle  ←/→: Priority  Enter: Submit  Esc: Back"
        }
    };
    let footer = Paragraph::new(Line::from(Span::styled(
        hint,
        Style::default().fg(theme::TEXT_DIM),
    )))
    .block(
        plain_block().title(Span::styled(" Help ", Style::default().fg(theme::TEXT_DIM))),
    );
    frame.render_widget(footer, chunks[3]);

    if app.mode == InputMode::HelpOverlay {
        draw_help(frame);
    }
}

fn plain_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(false))
        .style(Style::default().bg(theme::BG))
}

fn panel_block(title: String, focused: bool) -> Block<'static> {
    let title_fg = if focused {
        theme::NEON_CYAN
    } else {
        theme::BORDER_DIM
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(focused))
        .title(Span::styled(
            title,
            Style::default().fg(title_fg).add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(theme::BG))
}

fn draw_form(frame: &mut Frame, app: &App, area: Rect) {
    let form = app.container.form();
    let draft = form.draft();
    let focused = app.focused_panel == FocusedPanel::Form;
    let editing = app.container.edit_state().is_editing();

    let mut lines: Vec<Line> = Field::ALL
        .iter()
        .map(|&field| {
            let is_current = focused && form.focus() == field;
            let marker = if is_current { "▸ " } else { "  " };
            let required = if field.required() {
                theme::REQUIRED_MARKER
            } else {
                ""
            };
            let label_fg = if is_current {
                theme::TEXT_BRIGHT
            } else {
                theme::TEXT_DIM
            };

            let value = match field.kind() {
                FieldKind::Text => {
                    let mut text = draft.text(field).unwrap_or_default().to_string();
                    if is_current {
                        text.push_str(theme::CURSOR);
                    }
                    Span::styled(text, Style::default().fg(theme::TEXT_BRIGHT))
                }
                FieldKind::Flag => Span::styled(
                    theme::checkbox(draft.flag(field).unwrap_or(false)),
                    Style::default().fg(theme::NEON_CYAN),
                ),
                FieldKind::Choice => {
                    let priority = draft.priority();
                    Span::styled(
                        format!("< {} >", priority.label()),
                        theme::priority_style(&priority),
                    )
                }
            };

            Line::from(vec![
                Span::styled(marker, Style::default().fg(theme::NEON_CYAN)),
                Span::styled(
                    format!("{}{required}: ", field.label()),
                    Style::default().fg(label_fg),
                ),
                value,
            ])
        })
        .collect();

    lines.push(Line::from(""));
    let action = if editing {
        "  Enter: Save changes   Esc: Cancel"
    } else {
        "  Enter: Create project"
    };
    lines.push(Line::from(Span::styled(
        action,
        Style::default().fg(theme::NEON_MAGENTA),
    )));

    if let Some(notice) = form.notice() {
        lines.push(Line::from(Span::styled(
            format!("  {}", notice.text),
            theme::notice_style(notice),
        )));
    }

    let title = if editing {
        " Edit Project "
    } else {
        " New Project "
    };
    let paragraph = Paragraph::new(lines)
        .block(panel_block(title.to_string(), focused))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn draw_table(frame: &mut Frame, app: &App, area: Rect) {
    let projects = app.container.projects();
    let focused = app.focused_panel == FocusedPanel::List;

    let header = Row::new(COLUMNS.iter().map(|c| Cell::from(*c))).style(
        Style::default()
            .fg(theme::NEON_CYAN)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = list::rows(projects)
        .into_iter()
        .map(|row| match row {
            TableRow::Project(row) => {
                let priority_style = row
                    .priority
                    .parse::<Priority>()
                    .map(|p| theme::priority_style(&p))
                    .unwrap_or_default();
                let cells: Vec<Cell> = row
                    .cells()
                    .iter()
                    .enumerate()
                    .map(|(i, text)| {
                        let cell = Cell::from(text.to_string());
                        if i == 4 { cell.style(priority_style) } else { cell }
                    })
                    .collect();
                Row::new(cells).style(Style::default().fg(theme::TEXT_DIM))
            }
            TableRow::Placeholder => Row::new(vec![Cell::from(EMPTY_PLACEHOLDER)])
                .style(Style::default().fg(theme::TEXT_DIM)),
        })
        .collect();

    // The placeholder spans the whole panel instead of the title column.
    let widths: Vec<Constraint> = if projects.is_empty() {
        vec![Constraint::Fill(1)]
    } else {
        vec![
            Constraint::Percentage(22),
            Constraint::Percentage(28),
            Constraint::Length(10),
            Constraint::Length(17),
            Constraint::Length(9),
            Constraint::Length(5),
        ]
    };

    let mut table = Table::new(rows, widths);
    if !projects.is_empty() {
        table = table.header(header);
    }
    let table = table
        .block(panel_block(format!(" Projects ({}) ", projects.len()), focused))
        .highlight_style(
            Style::default()
                .fg(theme::TEXT_BRIGHT)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");

    let mut state = TableState::default();
    if !projects.is_empty() {
        state.select(Some(app.list.selected()));
    }
    frame.render_stateful_widget(table, area, &mut state);
}

fn draw_help(frame: &mut Frame) {
    let area = centered_rect(60, 60, frame.area());
    let keys = [
        ("List", ""),
        ("j / k", "Move selection"),
        ("e / Enter", "Edit selected project"),
        ("d / Del", "Delete selected project"),
        ("n / Tab", "Focus the form"),
        ("r", "Reload all projects"),
        ("w", "Save API URL to .projdesk/settings.json"),
        ("Esc", "Cancel the current edit"),
        ("Form", ""),
        ("Tab / ↑ ↓", "Move between fields"),
        ("Space", "Toggle checkbox"),
        ("← / →", "Change priority"),
        ("Enter", "Create or save"),
        ("Esc", "Cancel edit, back to list"),
    ];

    let lines: Vec<Line> = keys
        .iter()
        .map(|(key, desc)| {
            if desc.is_empty() {
                Line::from(Span::styled(
                    format!(" {key}"),
                    Style::default()
                        .fg(theme::NEON_MAGENTA)
                        .add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(vec![
                    Span::styled(format!("   {key:<12}"), Style::default().fg(theme::NEON_CYAN)),
                    Span::styled(*desc, Style::default().fg(theme::TEXT_DIM)),
                ])
            }
        })
        .collect();

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines).block(panel_block(" Keys ".to_string(), true)),
        area,
    );
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
