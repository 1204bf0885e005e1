//! Application state definitions

use super::forms::{Notification, NotificationLevel, PersonnelIntakeForm};
use chrono::{DateTime, Utc};
use std::collections::VecDeque;

/// Current view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Staff,
    Dashboard,
}

impl View {
    pub const ALL: [View; 2] = [View::Staff, View::Dashboard];

    /// Label shown in the sidebar
    pub fn sidebar_label(self) -> &'static str {
        match self {
            View::Staff => "Staff",
            View::Dashboard => "Dashboard",
        }
    }

    /// Title shown in the header
    pub fn title(self) -> &'static str {
        match self {
            View::Staff => "Personnel",
            View::Dashboard => "Dashboard",
        }
    }
}

/// A personnel record created during this session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub id: String,
    pub full_name: String,
    pub registered_at: DateTime<Utc>,
}

/// Status bar message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub level: NotificationLevel,
    pub text: String,
}

#[derive(Debug, Default)]
pub struct AppState {
    // Navigation
    pub current_view: View,

    // Staff list
    pub registrations: Vec<Registration>,
    pub selected_index: usize,

    // Intake dialog
    pub intake: PersonnelIntakeForm,
    /// Size of the last successfully loaded reference lists
    pub known_provinces: Option<usize>,
    pub known_hire_statuses: Option<usize>,

    // Messages
    pub status_message: Option<StatusMessage>,
    error_queue: VecDeque<String>,

    pub api_base_url: String,
}

impl AppState {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            ..Self::default()
        }
    }

    /// Move selection down
    pub fn move_selection_down(&mut self) {
        let max = self.registrations.len();
        if max > 0 && self.selected_index < max - 1 {
            self.selected_index += 1;
        }
    }

    /// Move selection up
    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// Record a created personnel entry and select it
    pub fn record_registration(&mut self, id: String, full_name: String) {
        self.registrations.push(Registration {
            id,
            full_name,
            registered_at: Utc::now(),
        });
        self.selected_index = self.registrations.len() - 1;
    }

    pub fn selected_registration(&self) -> Option<&Registration> {
        self.registrations.get(self.selected_index)
    }

    /// Remember how many provinces and hire statuses the open dialog loaded
    pub fn note_reference_counts(&mut self) {
        if self.intake.provinces().is_ready() {
            self.known_provinces = Some(self.intake.provinces().len());
        }
        if self.intake.hire_statuses().is_ready() {
            self.known_hire_statuses = Some(self.intake.hire_statuses().len());
        }
    }

    /// Queue an error for the modal error dialog
    pub fn push_error(&mut self, message: String) {
        self.error_queue.push_back(message);
    }

    pub fn has_errors(&self) -> bool {
        !self.error_queue.is_empty()
    }

    pub fn current_error(&self) -> Option<&str> {
        self.error_queue.front().map(String::as_str)
    }

    /// Errors queued behind the one on screen
    pub fn pending_errors(&self) -> usize {
        self.error_queue.len().saturating_sub(1)
    }

    pub fn dismiss_error(&mut self) {
        self.error_queue.pop_front();
    }

    /// Route form notifications: errors to the modal queue, the rest to the status bar
    pub fn route_notifications(&mut self, notifications: Vec<Notification>) {
        for notification in notifications {
            match notification.level {
                NotificationLevel::Error => self.push_error(notification.message),
                level => {
                    self.status_message = Some(StatusMessage {
                        level,
                        text: notification.message,
                    })
                }
            }
        }
    }
}
