//! Dashboard view: connection and session summary

use crate::app::App;
use crate::state::DialogPhase;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let state = &app.state;
    let label = Style::default().fg(Color::DarkGray);

    let dialog_state = match state.intake.phase() {
        DialogPhase::Closed => "closed",
        DialogPhase::Editing => "editing",
        DialogPhase::Submitting => "saving",
    };
    let last = state
        .registrations
        .last()
        .map(|entry| {
            format!(
                "{} at {}",
                entry.full_name,
                entry.registered_at.with_timezone(&chrono::Local).format("%H:%M")
            )
        })
        .unwrap_or_else(|| "none".to_string());

    let count = |n: Option<usize>| n.map_or_else(|| "not loaded".to_string(), |n| n.to_string());

    let lines = vec![
        Line::from(Span::styled(
            "Session",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("API:            ", label),
            Span::raw(state.api_base_url.as_str()),
        ]),
        Line::from(vec![
            Span::styled("Registered:     ", label),
            Span::styled(
                state.registrations.len().to_string(),
                Style::default().fg(Color::Green),
            ),
        ]),
        Line::from(vec![
            Span::styled("Provinces:      ", label),
            Span::raw(count(state.known_provinces)),
        ]),
        Line::from(vec![
            Span::styled("Hire statuses:  ", label),
            Span::raw(count(state.known_hire_statuses)),
        ]),
        Line::from(vec![
            Span::styled("Last:           ", label),
            Span::raw(last),
        ]),
        Line::from(vec![
            Span::styled("Intake dialog:  ", label),
            Span::raw(dialog_state),
        ]),
    ];

    let widget = Paragraph::new(lines).block(
        Block::default()
            .title(" Dashboard ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(widget, area);
}
