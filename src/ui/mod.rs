//! UI module for rendering the TUI

mod components;
mod dashboard;
mod forms;
mod layout;
mod staff;
mod widgets;

use crate::app::App;
use crate::state::View;
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let regions = layout::create_layout(frame.area());

    layout::draw_header(frame, regions.header, app);
    layout::draw_sidebar(frame, regions.sidebar, app);

    match app.state.current_view {
        View::Staff => staff::draw(frame, regions.main, app),
        View::Dashboard => dashboard::draw(frame, regions.main, app),
    }

    layout::draw_status_bar(frame, regions.status, app);

    // Overlays: the intake dialog, then any queued error on top of it
    if app.state.intake.is_open() {
        forms::draw_intake_dialog(frame, &app.state.intake);
    }
    if let Some(error) = app.state.current_error() {
        components::render_error_dialog(frame, error, app.state.pending_errors());
    }
}
