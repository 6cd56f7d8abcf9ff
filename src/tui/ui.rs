use crate::checklist::storage::Storage;
use crate::tui::app::{App, Focus};
use crate::tui::changelog::{RELEASES, VERSION};
use crate::tui::state::{Mode, Overlay};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, Wrap,
        block::{Position, Title},
    },
};

pub fn draw<S: Storage>(frame: &mut Frame, app: &App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(4), // Header
            Constraint::Length(3), // Input
            Constraint::Min(0),    // Items
            Constraint::Length(1), // Actions
            Constraint::Length(1), // Last updated
            Constraint::Length(3), // Footer
        ])
        .split(frame.size());

    draw_header(frame, chunks[0]);
    draw_input(frame, chunks[1], app);
    draw_items(frame, chunks[2], app);
    draw_actions(frame, chunks[3], app);
    draw_last_updated(frame, chunks[4], app);
    draw_footer(frame, chunks[5], app);

    match app.state.overlay {
        Some(Overlay::Updates) => draw_updates_popup(frame, app.state.updates_offset),
        Some(Overlay::ConfirmDeleteAll) => draw_confirm_dialog(frame),
        None => {}
    }
}

fn draw_header(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            "Packlist",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Lighten your mind before you leave.",
            Style::default().fg(Color::Gray),
        )),
    ];

    let header = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(Title::from(VERSION).alignment(Alignment::Right)),
    );

    frame.render_widget(header, area);
}

fn draw_input<S: Storage>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let focused = app.focus == Focus::Input && app.state.overlay.is_none();
    let input = &app.state.input;

    let line = if input.is_empty() {
        Line::from(Span::styled(
            "What will you pack?",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(input.text())
    };

    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let offset = Span::raw(input.before_cursor()).width() as u16;
    let scroll_x = input_scroll(offset, area.width.saturating_sub(2));

    let paragraph = Paragraph::new(line)
        .scroll((0, scroll_x))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(" Add item "),
        );
    frame.render_widget(paragraph, area);

    if focused {
        frame.set_cursor(area.x + 1 + offset - scroll_x, area.y + 1);
    }
}

/// Columns to skip so the cursor at `offset` stays inside a box `inner_width` wide.
fn input_scroll(offset: u16, inner_width: u16) -> u16 {
    offset.saturating_sub(inner_width.saturating_sub(1))
}

fn draw_items<S: Storage>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let state = &app.state;
    let delete_mode = state.mode == Mode::DeleteSelecting;

    let block = Block::default().borders(Borders::ALL).title(if delete_mode {
        " Items (select to delete) "
    } else {
        " Items "
    });

    if state.checklist.is_empty() {
        let empty = Paragraph::new(Span::styled(
            "Nothing packed yet.",
            Style::default().fg(Color::DarkGray),
        ))
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = state
        .checklist
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let is_selected = state.is_selected(i);
            let checkbox = if delete_mode {
                if is_selected { "☒" } else { "☐" }
            } else if item.checked {
                "☑"
            } else {
                "☐"
            };

            let box_style = if delete_mode {
                Style::default().fg(Color::Red)
            } else {
                Style::default().fg(Color::Blue)
            };

            let mut label_style = if item.checked {
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default().fg(Color::White)
            };
            if is_selected {
                label_style = label_style.fg(Color::Red).add_modifier(Modifier::BOLD);
            }
            if state.newly_added == Some(item.id) {
                label_style = label_style.add_modifier(Modifier::DIM);
            }

            ListItem::new(Line::from(vec![
                Span::styled(checkbox, box_style),
                Span::raw(" "),
                Span::styled(item.name.as_str(), label_style),
            ]))
        })
        .collect();

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .bg(Color::Yellow)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD),
    );

    let mut list_state = ListState::default();
    if app.focus == Focus::List {
        list_state.select(Some(app.cursor));
    }

    frame.render_stateful_widget(list, area, &mut list_state);
}

fn draw_actions<S: Storage>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let state = &app.state;
    if state.checklist.is_empty() {
        return;
    }

    let key_style = Style::default().fg(Color::Black).add_modifier(Modifier::BOLD);
    let spans = match state.mode {
        Mode::Normal => vec![
            Span::styled(" d ", key_style.bg(Color::LightRed)),
            Span::raw(" delete mode   "),
            Span::styled(" D ", key_style.bg(Color::Red)),
            Span::raw(" delete all"),
        ],
        Mode::DeleteSelecting => vec![
            Span::styled(" x ", key_style.bg(Color::Blue)),
            Span::raw(format!(" delete selected ({})   ", state.selected_items.len())),
            Span::styled(" Esc ", key_style.bg(Color::Gray)),
            Span::raw(" cancel"),
        ],
    };

    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        area,
    );
}

fn draw_last_updated<S: Storage>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let text = format!(
        "Last updated: {}",
        app.state.last_updated.format("%Y. %m. %d.")
    );
    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

fn draw_footer<S: Storage>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let hints = match (app.focus, app.state.mode) {
        (Focus::Input, _) => "Enter: add | Tab: list | ←→: cursor | Ctrl+C: quit",
        (Focus::List, Mode::Normal) => {
            "↑↓/j/k: move | Space: check | a: type | d/D: delete | ?: updates | q: quit"
        }
        (Focus::List, Mode::DeleteSelecting) => {
            "↑↓/j/k: move | Space: select | x: delete selected | Esc: cancel"
        }
    };

    let footer_text = format!(
        "Items: {} | Checked: {} | {}",
        app.total_items(),
        app.checked_items(),
        hints
    );

    let footer = Paragraph::new(footer_text)
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(Color::Yellow));

    frame.render_widget(footer, area);
}

fn draw_updates_popup(frame: &mut Frame, offset: usize) {
    let header = Row::new(vec![Cell::from("Version"), Cell::from("Changes")])
        .style(Style::default().add_modifier(Modifier::BOLD))
        .bottom_margin(1);

    let rows = RELEASES.iter().skip(offset).map(|release| {
        let changes: Vec<Line> = release
            .changes
            .iter()
            .map(|change| Line::from(format!("• {change}")))
            .collect();
        let height = changes.len() as u16;
        Row::new(vec![Cell::from(release.version), Cell::from(changes)])
            .height(height)
            .bottom_margin(1)
    });

    let table = Table::new(rows, [Constraint::Length(8), Constraint::Min(10)])
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Update history ")
                .title(
                    Title::from(" j/k: scroll | Esc: close ")
                        .alignment(Alignment::Center)
                        .position(Position::Bottom),
                )
                .style(Style::default().fg(Color::Yellow)),
        )
        .style(Style::default().fg(Color::White));

    let area = centered_rect(80, 70, frame.size());
    frame.render_widget(Clear, area);
    frame.render_widget(table, area);
}

fn draw_confirm_dialog(frame: &mut Frame) {
    let text = vec![
        Line::from("Really delete every item?"),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(": yes   "),
            Span::styled("n", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(": no"),
        ]),
    ];

    let dialog = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Delete all ")
                .border_style(Style::default().fg(Color::Red)),
        );

    let area = centered_rect(50, 30, frame.size());
    frame.render_widget(Clear, area);
    frame.render_widget(dialog, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
