//! Modal for the queued error messages

use super::base::{render_dialog, DialogConfig};
use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
    Frame,
};

/// Show the oldest queued error; `pending` counts the errors waiting behind it
pub fn render_error_dialog(frame: &mut Frame, message: &str, pending: usize) {
    let title = match pending {
        0 => "Error".to_string(),
        n => format!("Error ({n} more)"),
    };
    let action = if pending > 0 { " for the next one" } else { " to close" };
    let key = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);

    render_dialog(
        frame,
        DialogConfig {
            title: &title,
            title_color: Color::Red,
            border_color: Color::Red,
            message,
            hint: Some(vec![
                Span::styled("Enter", key),
                Span::raw("/"),
                Span::styled("Esc", key),
                Span::raw(action),
            ]),
            max_width: 64,
        },
    );
}
