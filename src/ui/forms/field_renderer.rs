//! Field rendering utilities for forms

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// What a field box shows as its content
pub enum FieldContent<'a> {
    /// A value typed or selected by the user
    Value(&'a str),
    /// Greyed-out text standing in for a missing value
    Placeholder(&'a str),
}

/// Draw one boxed form field; an error turns the border red and is shown on the bottom edge
pub fn draw_field(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    content: FieldContent,
    is_active: bool,
    error: Option<&str>,
) {
    let border_style = match (error, is_active) {
        (Some(_), _) => Style::default().fg(Color::Red),
        (None, true) => Style::default().fg(Color::Cyan),
        (None, false) => Style::default().fg(Color::DarkGray),
    };

    let cursor = if is_active { "▌" } else { "" };

    let value_span = match content {
        FieldContent::Value(value) if !value.is_empty() => Span::styled(
            value.to_string(),
            if is_active {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::Gray)
            },
        ),
        FieldContent::Value(_) => Span::raw(""),
        FieldContent::Placeholder(text) => Span::styled(
            text.to_string(),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ),
    };

    let mut block = Block::default()
        .title(format!(" {label} "))
        .borders(Borders::ALL)
        .border_style(border_style);
    if let Some(message) = error {
        block = block.title_bottom(Line::styled(
            format!(" {message} "),
            Style::default().fg(Color::Red),
        ));
    }

    let line = Line::from(vec![
        value_span,
        Span::styled(cursor, Style::default().fg(Color::Cyan)),
    ]);
    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// Draw a single line of key hints
pub fn draw_help_text(frame: &mut Frame, area: Rect, text: &str) {
    let help = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, area);
}
