//! Application state and core logic

use crate::intake::IntakeDriver;
use crate::platform::is_shortcut;
use crate::state::{
    AppState, FieldId, FieldKind, FormFocus, NotificationLevel, StatusMessage, SubmitOutcome,
    View,
};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::{Duration, Instant};

/// Window for the second Ctrl+C of a double-tap quit
const QUIT_WINDOW: Duration = Duration::from_millis(1500);

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    /// Runs the intake dialog's backend requests
    driver: IntakeDriver,
    /// Whether the app should quit
    quit: bool,
    /// Timestamp of last Ctrl+C press for double-tap quit
    pub last_ctrl_c: Option<Instant>,
}

impl App {
    /// Create a new App instance
    pub fn new(driver: IntakeDriver, api_base_url: impl Into<String>) -> Self {
        Self {
            state: AppState::new(api_base_url),
            driver,
            quit: false,
            last_ctrl_c: None,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Push an error message to the error queue for display
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.state.push_error(message.into());
    }

    fn set_status(&mut self, level: NotificationLevel, text: impl Into<String>) {
        self.state.status_message = Some(StatusMessage {
            level,
            text: text.into(),
        });
    }

    /// Apply finished background work; called once per event-loop tick
    pub fn tick(&mut self) {
        let outcomes = self.driver.poll(&mut self.state.intake);
        self.absorb(outcomes);
    }

    fn absorb(&mut self, outcomes: Vec<SubmitOutcome>) {
        self.state.note_reference_counts();
        for outcome in outcomes {
            if let SubmitOutcome::Created { id, full_name } = outcome {
                self.state.record_registration(id, full_name);
            }
        }
        let notifications = self.state.intake.drain_notifications();
        self.state.route_notifications(notifications);
    }

    /// Handle Ctrl+C: the second press within the window quits
    pub fn handle_ctrl_c(&mut self) {
        let now = Instant::now();
        match self.last_ctrl_c {
            Some(prev) if now.duration_since(prev) <= QUIT_WINDOW => self.quit = true,
            _ => {
                self.last_ctrl_c = Some(now);
                self.set_status(NotificationLevel::Warning, "Press Ctrl+C again to quit");
            }
        }
    }

    /// Handle a key event
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Handle error dialog dismissal first (modal)
        if self.state.has_errors() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.dismiss_error();
            }
            return Ok(());
        }

        if self.state.intake.is_open() {
            self.handle_intake_key(key);
        } else {
            self.handle_view_key(key);
        }

        let notifications = self.state.intake.drain_notifications();
        self.state.route_notifications(notifications);
        Ok(())
    }

    /// Navigate to a view
    pub fn navigate(&mut self, view: View) {
        self.state.current_view = view;
    }

    fn cycle_view(&mut self, forward: bool) {
        let views = View::ALL;
        let idx = views
            .iter()
            .position(|v| *v == self.state.current_view)
            .unwrap_or(0);
        let next = if forward {
            (idx + 1) % views.len()
        } else {
            (idx + views.len() - 1) % views.len()
        };
        self.navigate(views[next]);
    }

    /// Open the intake dialog
    pub fn open_intake(&mut self) {
        self.state.status_message = None;
        self.driver.open(&mut self.state.intake);
    }

    /// Handle keys while no dialog is open
    fn handle_view_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Char('n') => self.open_intake(),
            KeyCode::Tab => self.cycle_view(true),
            KeyCode::BackTab => self.cycle_view(false),
            KeyCode::Char('1') => self.navigate(View::Staff),
            KeyCode::Char('2') => self.navigate(View::Dashboard),
            KeyCode::Char('j') | KeyCode::Down if self.state.current_view == View::Staff => {
                self.state.move_selection_down();
            }
            KeyCode::Char('k') | KeyCode::Up if self.state.current_view == View::Staff => {
                self.state.move_selection_up();
            }
            _ => {}
        }
    }

    /// Handle keys for the intake dialog
    fn handle_intake_key(&mut self, key: KeyEvent) {
        let form = &mut self.state.intake;

        if is_shortcut(&key, 's') {
            self.submit_intake();
            return;
        }
        if is_shortcut(&key, 'r') {
            if !self.driver.retry(form) {
                self.set_status(NotificationLevel::Warning, "Nothing to retry");
            }
            return;
        }

        let focus = form.focus();
        let select_focused =
            matches!(focus, FormFocus::Field(field) if field.kind() == FieldKind::Select);

        match key.code {
            KeyCode::Esc => {
                form.cancel();
            }
            KeyCode::Tab => form.next_focus(),
            KeyCode::BackTab => form.prev_focus(),
            KeyCode::Up => self.driver.cycle_option(form, -1),
            KeyCode::Down => self.driver.cycle_option(form, 1),
            KeyCode::Char('k') if select_focused => self.driver.cycle_option(form, -1),
            KeyCode::Char('j') if select_focused => self.driver.cycle_option(form, 1),
            KeyCode::Backspace => self.driver.backspace(form),
            KeyCode::Delete if focus == FormFocus::Field(FieldId::CvDocument) => {
                form.detach_document();
            }
            KeyCode::Enter => match focus {
                FormFocus::Save => self.submit_intake(),
                FormFocus::Cancel => {
                    form.cancel();
                }
                FormFocus::Field(field) if field.kind() == FieldKind::Document => {
                    if !self.driver.load_document(form) {
                        form.next_focus();
                    }
                }
                FormFocus::Field(_) => form.next_focus(),
            },
            KeyCode::Char(c)
                if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                form.input_char(c);
            }
            _ => {}
        }
    }

    fn submit_intake(&mut self) {
        if self.state.intake.is_submitting() {
            return;
        }
        if !self.driver.submit(&mut self.state.intake) && !self.state.intake.errors().is_empty() {
            self.set_status(NotificationLevel::Warning, "Fix the highlighted fields");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{
        ApiError, MockPersonnelSubmissionService, MockReferenceDataProvider,
        PersonnelSubmissionService,
    };
    use crate::intake::apply_event;
    use crate::state::ReferenceOption;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn reference() -> MockReferenceDataProvider {
        let mut mock = MockReferenceDataProvider::new();
        mock.expect_list_provinces()
            .returning(|| Ok(vec![ReferenceOption::new("p1", "La Habana")]));
        mock.expect_list_hire_statuses()
            .returning(|| Ok(vec![ReferenceOption::new("h1", "Pending")]));
        mock.expect_list_municipalities()
            .returning(|_| Ok(vec![ReferenceOption::new("m1", "Playa")]));
        mock
    }

    fn app_with(submissions: impl PersonnelSubmissionService + 'static) -> App {
        let driver = IntakeDriver::new(Arc::new(reference()), Arc::new(submissions));
        App::new(driver, "http://127.0.0.1:3000")
    }

    /// Wait for `n` background events and apply them the way `tick` does
    async fn settle(app: &mut App, n: usize) {
        for _ in 0..n {
            let event = app.driver.next_event().await.unwrap();
            let outcome = apply_event(&mut app.state.intake, event);
            app.absorb(outcome.into_iter().collect());
        }
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c))).unwrap();
        }
    }

    /// Fill the dialog using only key presses
    async fn fill_dialog(app: &mut App) {
        app.handle_key(key(KeyCode::Char('n'))).unwrap();
        settle(app, 2).await;

        type_text(app, "Pedro Duarte"); // full name
        app.handle_key(key(KeyCode::Tab)).unwrap(); // national id
        app.handle_key(key(KeyCode::Tab)).unwrap(); // phone
        type_text(app, "555-1234");
        app.handle_key(key(KeyCode::Tab)).unwrap(); // email
        app.handle_key(key(KeyCode::Tab)).unwrap(); // address
        type_text(app, "Calle 23");
        app.handle_key(key(KeyCode::Tab)).unwrap(); // province
        app.handle_key(key(KeyCode::Down)).unwrap();
        settle(app, 1).await;
        app.handle_key(key(KeyCode::Tab)).unwrap(); // municipality
        app.handle_key(key(KeyCode::Char('j'))).unwrap();
        app.handle_key(key(KeyCode::Tab)).unwrap(); // specialty
        type_text(app, "Driver");
        app.handle_key(key(KeyCode::Tab)).unwrap(); // hire status
        app.handle_key(key(KeyCode::Down)).unwrap();
    }

    mod views {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_tab_cycles_views() {
            let mut app = app_with(MockPersonnelSubmissionService::new());
            assert_eq!(app.state.current_view, View::Staff);
            app.handle_key(key(KeyCode::Tab)).unwrap();
            assert_eq!(app.state.current_view, View::Dashboard);
            app.handle_key(key(KeyCode::Tab)).unwrap();
            assert_eq!(app.state.current_view, View::Staff);
            app.handle_key(key(KeyCode::BackTab)).unwrap();
            assert_eq!(app.state.current_view, View::Dashboard);
        }

        #[tokio::test]
        async fn test_q_quits() {
            let mut app = app_with(MockPersonnelSubmissionService::new());
            app.handle_key(key(KeyCode::Char('q'))).unwrap();
            assert!(app.should_quit());
        }

        #[tokio::test]
        async fn test_double_ctrl_c_quits() {
            let mut app = app_with(MockPersonnelSubmissionService::new());
            app.handle_ctrl_c();
            assert!(!app.should_quit());
            app.handle_ctrl_c();
            assert!(app.should_quit());
        }

        #[tokio::test]
        async fn test_error_dialog_is_modal() {
            let mut app = app_with(MockPersonnelSubmissionService::new());
            app.push_error("boom");
            app.handle_key(key(KeyCode::Char('n'))).unwrap();
            assert!(!app.state.intake.is_open());
            app.handle_key(key(KeyCode::Enter)).unwrap();
            assert!(!app.state.has_errors());
        }
    }

    mod intake {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_typing_goes_to_dialog_not_views() {
            let mut app = app_with(MockPersonnelSubmissionService::new());
            app.handle_key(key(KeyCode::Char('n'))).unwrap();
            settle(&mut app, 2).await;

            type_text(&mut app, "qn2");
            assert!(!app.should_quit());
            assert_eq!(app.state.current_view, View::Staff);
            assert_eq!(app.state.intake.record().full_name, "qn2");
        }

        #[tokio::test]
        async fn test_escape_cancels() {
            let mut app = app_with(MockPersonnelSubmissionService::new());
            app.handle_key(key(KeyCode::Char('n'))).unwrap();
            app.handle_key(key(KeyCode::Esc)).unwrap();
            assert!(!app.state.intake.is_open());
        }

        #[tokio::test]
        async fn test_invalid_submit_shows_field_errors() {
            let mut app = app_with(MockPersonnelSubmissionService::new());
            app.handle_key(key(KeyCode::Char('n'))).unwrap();
            settle(&mut app, 2).await;

            app.handle_key(ctrl('s')).unwrap();
            assert!(app.state.intake.is_open());
            assert!(app.state.intake.error(FieldId::FullName).is_some());
            assert_eq!(
                app.state.status_message.as_ref().map(|m| m.text.as_str()),
                Some("Fix the highlighted fields")
            );
        }

        #[tokio::test]
        async fn test_successful_submit_records_registration() {
            let mut submissions = MockPersonnelSubmissionService::new();
            submissions
                .expect_submit_personnel()
                .times(1)
                .returning(|_| Ok("42".to_string()));
            let mut app = app_with(submissions);
            fill_dialog(&mut app).await;

            app.handle_key(ctrl('s')).unwrap();
            app.handle_key(ctrl('s')).unwrap();
            settle(&mut app, 1).await;

            assert!(!app.state.intake.is_open());
            assert_eq!(app.state.registrations.len(), 1);
            assert_eq!(app.state.registrations[0].id, "42");
            assert_eq!(app.state.registrations[0].full_name, "Pedro Duarte");
            assert_eq!(
                app.state.status_message.as_ref().map(|m| m.level),
                Some(NotificationLevel::Success)
            );
        }

        #[tokio::test]
        async fn test_transport_failure_goes_to_error_queue() {
            let mut submissions = MockPersonnelSubmissionService::new();
            submissions.expect_submit_personnel().returning(|_| {
                Err(ApiError::Status {
                    status: 502,
                    body: String::new(),
                }
                .into())
            });
            let mut app = app_with(submissions);
            fill_dialog(&mut app).await;

            app.handle_key(ctrl('s')).unwrap();
            settle(&mut app, 1).await;

            assert!(app.state.intake.is_open());
            assert!(app.state.has_errors());
            assert_eq!(app.state.intake.record().full_name, "Pedro Duarte");
        }

        #[tokio::test]
        async fn test_retry_with_nothing_failed() {
            let mut app = app_with(MockPersonnelSubmissionService::new());
            app.handle_key(key(KeyCode::Char('n'))).unwrap();
            settle(&mut app, 2).await;
            app.handle_key(ctrl('r')).unwrap();
            assert_eq!(
                app.state.status_message.as_ref().map(|m| m.text.as_str()),
                Some("Nothing to retry")
            );
        }
    }
}
