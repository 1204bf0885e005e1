//! Staff view: personnel registered during this session

use super::widgets::render_scrollable_list;
use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let registrations = &app.state.registrations;
    let block = Block::default()
        .title(format!(" Personnel ({}) ", registrations.len()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    if registrations.is_empty() {
        let empty = Paragraph::new(
            "No personnel registered yet.\nPress 'n' to register new personnel.",
        )
        .style(Style::default().fg(Color::DarkGray))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(4)])
        .split(area);

    let items: Vec<ListItem> = registrations
        .iter()
        .map(|entry| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("#{:<8}", entry.id),
                    Style::default().fg(Color::Yellow),
                ),
                Span::raw(entry.full_name.as_str()),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");

    render_scrollable_list(frame, chunks[0], list, Some(app.state.selected_index));

    if let Some(entry) = app.state.selected_registration() {
        let detail = Paragraph::new(vec![
            Line::from(vec![
                Span::styled("ID: ", Style::default().fg(Color::DarkGray)),
                Span::raw(entry.id.as_str()),
            ]),
            Line::from(vec![
                Span::styled("Registered: ", Style::default().fg(Color::DarkGray)),
                Span::raw(
                    entry
                        .registered_at
                        .with_timezone(&chrono::Local)
                        .format("%Y-%m-%d %H:%M:%S")
                        .to_string(),
                ),
            ]),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(detail, chunks[1]);
    }
}
