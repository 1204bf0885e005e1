//! Modal dialog for registering new personnel

use super::field_renderer::{draw_field, draw_help_text, FieldContent};
use crate::platform::{RETRY_SHORTCUT, SAVE_SHORTCUT};
use crate::state::{FieldId, FieldKind, FormFocus, LoadStatus, PersonnelIntakeForm};
use crate::ui::components::{centered_rect, render_action_button, BUTTON_HEIGHT};
use crate::ui::widgets::render_scrollable_list;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

const DIALOG_WIDTH: u16 = 100;
const FIELD_HEIGHT: u16 = 3;
const OPTIONS_PANEL_WIDTH: u16 = 30;

/// Draw the intake dialog over the current view
pub fn draw_intake_dialog(frame: &mut Frame, form: &PersonnelIntakeForm) {
    let rows = FieldId::ALL.len().div_ceil(2) as u16;
    // fields + help line + borders
    let height = rows * FIELD_HEIGHT + 1 + 2;
    let area = centered_rect(frame.area(), DIALOG_WIDTH, height);
    frame.render_widget(Clear, area);

    let title = if form.is_submitting() {
        " New Personnel (saving) "
    } else {
        " New Personnel "
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .style(Style::default().bg(Color::Black));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let body = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(OPTIONS_PANEL_WIDTH)])
        .split(body[0]);

    draw_field_grid(frame, columns[0], form);
    draw_side_panel(frame, columns[1], form);
    draw_help_text(frame, body[1], &help_line(form));
}

fn draw_field_grid(frame: &mut Frame, area: Rect, form: &PersonnelIntakeForm) {
    let row_count = FieldId::ALL.len().div_ceil(2);
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(FIELD_HEIGHT); row_count])
        .split(area);

    for (pair, row_area) in FieldId::ALL.chunks(2).zip(row_areas.iter()) {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(*row_area);
        for (field, cell) in pair.iter().zip(cells.iter()) {
            draw_form_field(frame, *cell, form, *field);
        }
    }
}

fn draw_form_field(frame: &mut Frame, area: Rect, form: &PersonnelIntakeForm, field: FieldId) {
    let is_active = form.focus() == FormFocus::Field(field);
    let error = form.error(field);
    let summary;

    let content = match field.kind() {
        FieldKind::Text => {
            let value = form.record().value(field);
            if value.is_empty() && !is_active {
                FieldContent::Placeholder("(empty)")
            } else {
                FieldContent::Value(value)
            }
        }
        FieldKind::Select => select_content(form, field),
        FieldKind::Document => match &form.record().cv_document {
            Some(document) => {
                summary = document.summary();
                FieldContent::Value(&summary)
            }
            None if !form.document_path().is_empty() => FieldContent::Value(form.document_path()),
            None => FieldContent::Placeholder("type a file path, Enter to load"),
        },
    };

    draw_field(frame, area, field.label(), content, is_active, error);
}

fn select_content(form: &PersonnelIntakeForm, field: FieldId) -> FieldContent<'_> {
    if field == FieldId::Municipality && form.record().province_id.is_none() {
        return FieldContent::Placeholder("select a province first");
    }
    let Some(list) = form.option_list(field) else {
        return FieldContent::Placeholder("");
    };
    match list.status() {
        LoadStatus::Loading => FieldContent::Placeholder("loading…"),
        LoadStatus::Failed => FieldContent::Placeholder("unavailable, retry to load"),
        LoadStatus::Ready if list.is_empty() => FieldContent::Placeholder("no options"),
        _ => match form.selected_label(field) {
            Some(label) => FieldContent::Value(label),
            None => FieldContent::Placeholder("↑/↓ to choose"),
        },
    }
}

/// Options of the focused select field plus the action buttons
fn draw_side_panel(frame: &mut Frame, area: Rect, form: &PersonnelIntakeForm) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(BUTTON_HEIGHT)])
        .split(area);

    draw_option_list(frame, chunks[0], form);

    let buttons = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    let focus = form.focus();
    let save_label = if form.is_submitting() { "Saving…" } else { "Save" };
    render_action_button(
        frame,
        buttons[0],
        "Cancel",
        focus == FormFocus::Cancel,
        !form.is_submitting(),
        None,
    );
    render_action_button(
        frame,
        buttons[1],
        save_label,
        focus == FormFocus::Save,
        form.can_submit(),
        Some(Color::Green),
    );
}

fn draw_option_list(frame: &mut Frame, area: Rect, form: &PersonnelIntakeForm) {
    let block = Block::default()
        .title(" Options ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let focused_select = match form.focus() {
        FormFocus::Field(field) if field.kind() == FieldKind::Select => Some(field),
        _ => None,
    };
    let Some(field) = focused_select else {
        let hint = Paragraph::new("Focus a list field to see its options")
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(hint, area);
        return;
    };
    let Some(list) = form.option_list(field) else {
        return;
    };

    if !list.is_ready() {
        let text = match list.status() {
            LoadStatus::Loading => "Loading…".to_string(),
            LoadStatus::Failed => format!("Could not load. {RETRY_SHORTCUT} to retry"),
            _ => "Nothing to choose yet".to_string(),
        };
        let message = Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(message, area);
        return;
    }

    let items: Vec<ListItem> = list
        .options()
        .iter()
        .map(|option| ListItem::new(Line::from(option.display_label.as_str())))
        .collect();
    let widget = List::new(items)
        .block(block.title(format!(" {} ", field.label())))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");

    let selected = list.position(form.record().value(field));
    render_scrollable_list(frame, area, widget, selected);
}

fn help_line(form: &PersonnelIntakeForm) -> String {
    if form.is_submitting() {
        return "Saving…".to_string();
    }
    let mut hint = format!("Tab:next  ↑/↓:choose  {SAVE_SHORTCUT}:save  Esc:cancel");
    let has_failed_list = [FieldId::Province, FieldId::Municipality, FieldId::HireStatus]
        .into_iter()
        .filter_map(|field| form.option_list(field))
        .any(|list| list.status() == LoadStatus::Failed);
    if has_failed_list {
        hint.push_str(&format!("  {RETRY_SHORTCUT}:retry"));
    }
    if form.focus() == FormFocus::Field(FieldId::CvDocument) {
        hint.push_str("  Enter:load  Del:remove");
    }
    hint
}
