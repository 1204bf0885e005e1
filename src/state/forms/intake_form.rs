//! Personnel intake form state machine
//!
//! Owns the record being edited, per-field errors, the three option lists and
//! the dialog lifecycle:
//!
//! ```text
//! Closed -> Editing -> Submitting -> Closed    (created)
//!              ^            |
//!              +------------+                 (rejected / failed)
//! Editing -> Closed                           (cancel)
//! ```
//!
//! The form never performs IO itself. Operations that need the backend return
//! a request (`MunicipalityRequest`, `SubmitTicket`) and the matching `apply_*`
//! / `finish_*` method takes the result. Every result is tagged with the
//! session it was issued for, and municipality results also with the
//! generation of the province change that asked for them; anything that does
//! not match the current values is dropped.

use super::attachment::{AttachmentError, DocumentAttachment};
use super::field::{FieldId, FieldKind, PersonnelRecord};
use super::options::{LoadStatus, OptionList, ReferenceList, ReferenceOption};
use super::payload::SubmissionPayload;
use super::validation::{
    validate_field, validate_record, FieldErrors, ValidationContext, ValidationResult,
};
use crate::api::{ApiError, SubmitError};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SESSION: AtomicU64 = AtomicU64::new(1);

/// Lifecycle of the containing dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogPhase {
    #[default]
    Closed,
    Editing,
    Submitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Warning,
    Error,
}

/// User-facing message produced by the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

/// Focusable elements of the dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFocus {
    Field(FieldId),
    Cancel,
    Save,
}

impl Default for FormFocus {
    fn default() -> Self {
        FormFocus::Field(FieldId::FullName)
    }
}

/// Municipality fetch to run for a province change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MunicipalityRequest {
    pub session: u64,
    pub generation: u64,
    pub province_id: String,
}

/// A validated payload to hand to the submission service
#[derive(Debug)]
pub struct SubmitTicket {
    pub session: u64,
    pub payload: SubmissionPayload,
}

/// Result of applying a finished submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created { id: String, full_name: String },
    /// Probably created, but the id is unknown
    Unconfirmed { full_name: String },
    Rejected,
    Failed,
}

/// Fetches to re-issue after failures
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RetryPlan {
    pub lists: Vec<ReferenceList>,
    pub municipalities: Option<MunicipalityRequest>,
}

impl RetryPlan {
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty() && self.municipalities.is_none()
    }
}

#[derive(Debug, Default)]
pub struct PersonnelIntakeForm {
    record: PersonnelRecord,
    errors: FieldErrors,
    touched: BTreeSet<FieldId>,
    provinces: OptionList,
    municipalities: OptionList,
    hire_statuses: OptionList,
    /// Province the current municipality list belongs to
    municipality_scope: Option<String>,
    generation: u64,
    phase: DialogPhase,
    session: u64,
    focus: FormFocus,
    /// Path typed into the document field, loaded on demand
    document_path: String,
    notifications: Vec<Notification>,
}

impl PersonnelIntakeForm {
    // ----- lifecycle -------------------------------------------------------

    /// Open the dialog with a fresh, empty record and a new session token.
    /// Opening an already open dialog keeps its state.
    pub fn open(&mut self) -> u64 {
        if self.is_open() {
            return self.session;
        }
        *self = Self {
            session: NEXT_SESSION.fetch_add(1, Ordering::Relaxed),
            phase: DialogPhase::Editing,
            ..Self::default()
        };
        tracing::debug!("Intake dialog opened (session {})", self.session);
        self.session
    }

    /// Close without submitting, discarding everything entered.
    /// Ignored while a submission is in flight.
    pub fn cancel(&mut self) -> bool {
        match self.phase {
            DialogPhase::Editing => {
                tracing::debug!("Intake dialog cancelled (session {})", self.session);
                *self = Self::default();
                true
            }
            DialogPhase::Submitting | DialogPhase::Closed => false,
        }
    }

    pub fn phase(&self) -> DialogPhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase != DialogPhase::Closed
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == DialogPhase::Submitting
    }

    fn is_editing(&self) -> bool {
        self.phase == DialogPhase::Editing
    }

    pub fn session(&self) -> u64 {
        self.session
    }

    #[cfg(test)]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    // ----- accessors -------------------------------------------------------

    pub fn record(&self) -> &PersonnelRecord {
        &self.record
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, field: FieldId) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn provinces(&self) -> &OptionList {
        &self.provinces
    }

    #[cfg(test)]
    pub fn municipalities(&self) -> &OptionList {
        &self.municipalities
    }

    pub fn hire_statuses(&self) -> &OptionList {
        &self.hire_statuses
    }

    /// Whether a municipality fetch for the current province is pending
    #[cfg(test)]
    pub fn is_loading_municipalities(&self) -> bool {
        self.municipalities.is_loading()
    }

    pub fn option_list(&self, field: FieldId) -> Option<&OptionList> {
        match field {
            FieldId::Province => Some(&self.provinces),
            FieldId::Municipality => Some(&self.municipalities),
            FieldId::HireStatus => Some(&self.hire_statuses),
            _ => None,
        }
    }

    /// Display label of the option currently selected in a select field
    pub fn selected_label(&self, field: FieldId) -> Option<&str> {
        let list = self.option_list(field)?;
        let id = self.record.value(field);
        if id.is_empty() {
            None
        } else {
            list.label_of(id)
        }
    }

    pub fn document_path(&self) -> &str {
        &self.document_path
    }

    fn list_mut(&mut self, list: ReferenceList) -> &mut OptionList {
        match list {
            ReferenceList::Provinces => &mut self.provinces,
            ReferenceList::HireStatuses => &mut self.hire_statuses,
        }
    }

    fn list(&self, list: ReferenceList) -> &OptionList {
        match list {
            ReferenceList::Provinces => &self.provinces,
            ReferenceList::HireStatuses => &self.hire_statuses,
        }
    }

    // ----- notifications ---------------------------------------------------

    fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.notifications.push(Notification {
            level,
            message: message.into(),
        });
    }

    /// Take all notifications produced since the last call
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    // ----- reference data --------------------------------------------------

    /// Mark a reference list as loading
    pub fn begin_reference_load(&mut self, list: ReferenceList) {
        self.list_mut(list).begin_loading();
    }

    /// Apply a finished province or hire-status fetch
    pub fn apply_reference_data(
        &mut self,
        session: u64,
        list: ReferenceList,
        result: Result<Vec<ReferenceOption>, ApiError>,
    ) -> bool {
        if session != self.session || !self.is_open() {
            tracing::debug!("Dropping {} from closed session {}", list.label(), session);
            return false;
        }

        match result {
            Ok(options) => {
                tracing::debug!("Loaded {} {}", options.len(), list.label());
                self.list_mut(list).fill(options);
            }
            Err(e) => {
                tracing::warn!("Failed to load {}: {}", list.label(), e);
                self.list_mut(list).fail();
                self.notify(
                    NotificationLevel::Warning,
                    format!("Could not load reference data ({})", list.label()),
                );
            }
        }

        match list {
            ReferenceList::Provinces => self.refresh_error(FieldId::Province),
            ReferenceList::HireStatuses => self.refresh_error(FieldId::HireStatus),
        }
        true
    }

    /// Select a province (or clear it with `None`).
    ///
    /// The selected municipality and the municipality list are cleared right
    /// away. Returns the fetch to run for the new province, if any.
    pub fn select_province(&mut self, province_id: Option<String>) -> Option<MunicipalityRequest> {
        if !self.is_editing() {
            return None;
        }
        let province_id = province_id.filter(|id| !id.trim().is_empty());
        if province_id == self.record.province_id {
            return None;
        }

        self.record.province_id = province_id.clone();
        self.record.municipality_id = None;
        self.municipalities.clear();
        self.municipality_scope = None;
        self.generation += 1;

        self.touch(FieldId::Province);
        self.refresh_error(FieldId::Municipality);

        let province_id = province_id?;
        self.municipalities.begin_loading();
        Some(MunicipalityRequest {
            session: self.session,
            generation: self.generation,
            province_id,
        })
    }

    /// Apply a finished municipality fetch; stale generations are discarded
    pub fn apply_municipalities(
        &mut self,
        session: u64,
        generation: u64,
        result: Result<Vec<ReferenceOption>, ApiError>,
    ) -> bool {
        if session != self.session || generation != self.generation {
            tracing::debug!(
                "Discarding stale municipalities (session {}, generation {}; current {}/{})",
                session,
                generation,
                self.session,
                self.generation
            );
            return false;
        }
        let Some(province_id) = self.record.province_id.clone() else {
            return false;
        };

        match result {
            Ok(options) => {
                tracing::debug!(
                    "Loaded {} municipalities for province {}",
                    options.len(),
                    province_id
                );
                self.municipalities.fill(options);
                self.municipality_scope = Some(province_id);
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to load municipalities for province {}: {}",
                    province_id,
                    e
                );
                self.municipalities.fail();
                self.notify(
                    NotificationLevel::Warning,
                    "Could not load reference data (municipalities)",
                );
            }
        }

        self.refresh_error(FieldId::Municipality);
        true
    }

    pub fn select_municipality(&mut self, municipality_id: Option<String>) {
        if !self.is_editing() {
            return;
        }
        self.record.municipality_id = municipality_id.filter(|id| !id.trim().is_empty());
        self.touch(FieldId::Municipality);
    }

    pub fn select_hire_status(&mut self, hire_status_id: Option<String>) {
        if !self.is_editing() {
            return;
        }
        self.record.hire_status_id = hire_status_id.filter(|id| !id.trim().is_empty());
        self.touch(FieldId::HireStatus);
    }

    /// Failed lists to fetch again, marked as loading
    pub fn retry_requests(&mut self) -> RetryPlan {
        let mut plan = RetryPlan::default();
        if !self.is_open() {
            return plan;
        }

        for list in ReferenceList::ALL {
            if self.list(list).status() == LoadStatus::Failed {
                self.list_mut(list).begin_loading();
                plan.lists.push(list);
            }
        }

        if self.municipalities.status() == LoadStatus::Failed {
            if let Some(province_id) = self.record.province_id.clone() {
                self.generation += 1;
                self.municipalities.begin_loading();
                plan.municipalities = Some(MunicipalityRequest {
                    session: self.session,
                    generation: self.generation,
                    province_id,
                });
            }
        }

        plan
    }

    // ----- editing ---------------------------------------------------------

    /// Replace the value of a free-text field
    #[cfg(test)]
    pub fn set_text(&mut self, field: FieldId, value: impl Into<String>) {
        if !self.is_editing() {
            return;
        }
        if let Some(slot) = self.record.text_mut(field) {
            *slot = value.into();
            self.touch(field);
        }
    }

    /// Type a character into the focused field
    pub fn input_char(&mut self, c: char) {
        if !self.is_editing() {
            return;
        }
        let FormFocus::Field(field) = self.focus else {
            return;
        };
        match field.kind() {
            FieldKind::Text => {
                if let Some(slot) = self.record.text_mut(field) {
                    slot.push(c);
                    self.touch(field);
                }
            }
            FieldKind::Document => self.document_path.push(c),
            FieldKind::Select => {}
        }
    }

    /// Delete backwards in the focused field; clears a select or the document
    pub fn backspace(&mut self) -> Option<MunicipalityRequest> {
        if !self.is_editing() {
            return None;
        }
        let FormFocus::Field(field) = self.focus else {
            return None;
        };
        match field {
            FieldId::Province => return self.select_province(None),
            FieldId::Municipality => self.select_municipality(None),
            FieldId::HireStatus => self.select_hire_status(None),
            FieldId::CvDocument => {
                if self.document_path.pop().is_none() {
                    self.detach_document();
                }
            }
            text => {
                if let Some(slot) = self.record.text_mut(text) {
                    slot.pop();
                    self.touch(text);
                }
            }
        }
        None
    }

    /// Move the focused select `delta` options away from its current value
    pub fn cycle_option(&mut self, delta: isize) -> Option<MunicipalityRequest> {
        if !self.is_editing() {
            return None;
        }
        let FormFocus::Field(field) = self.focus else {
            return None;
        };
        let current = self.record.value(field);
        let current = (!current.is_empty()).then_some(current);
        let next = self
            .option_list(field)?
            .step(current, delta)
            .map(|o| o.id.clone());

        match field {
            FieldId::Province => self.select_province(next),
            FieldId::Municipality => {
                self.select_municipality(next);
                None
            }
            FieldId::HireStatus => {
                self.select_hire_status(next);
                None
            }
            _ => None,
        }
    }

    /// Take over a document; it stays with the form until submission
    pub fn attach_document(&mut self, document: DocumentAttachment) {
        if !self.is_editing() {
            return;
        }
        tracing::debug!("Attached {:?}", document);
        self.record.cv_document = Some(document);
        self.document_path.clear();
        self.touch(FieldId::CvDocument);
    }

    pub fn detach_document(&mut self) {
        if !self.is_editing() {
            return;
        }
        self.record.cv_document = None;
        self.touch(FieldId::CvDocument);
    }

    /// Apply the result of loading the document typed into the path field
    pub fn apply_document(
        &mut self,
        session: u64,
        result: Result<DocumentAttachment, AttachmentError>,
    ) -> bool {
        if session != self.session || !self.is_editing() {
            return false;
        }
        match result {
            Ok(document) => self.attach_document(document),
            Err(e) => {
                tracing::warn!("Failed to attach document: {}", e);
                self.errors.insert(FieldId::CvDocument, e.to_string());
                self.notify(NotificationLevel::Warning, e.to_string());
            }
        }
        true
    }

    // ----- validation ------------------------------------------------------

    fn context(&self) -> ValidationContext<'_> {
        ValidationContext {
            provinces: &self.provinces,
            municipalities: &self.municipalities,
            hire_statuses: &self.hire_statuses,
            municipality_scope: self.municipality_scope.as_deref(),
        }
    }

    /// Validate the whole record against the loaded reference data
    pub fn validate(&self) -> ValidationResult {
        validate_record(&self.record, &self.context())
    }

    /// Whether the save action should be enabled
    pub fn can_submit(&self) -> bool {
        self.is_editing() && self.validate().is_valid()
    }

    fn touch(&mut self, field: FieldId) {
        self.touched.insert(field);
        self.refresh_error(field);
    }

    /// Re-run a field's rules if the user has interacted with it
    fn refresh_error(&mut self, field: FieldId) {
        if !self.touched.contains(&field) {
            return;
        }
        match validate_field(field, &self.record, &self.context()) {
            Some(message) => {
                self.errors.insert(field, message);
            }
            None => {
                self.errors.remove(&field);
            }
        }
    }

    // ----- submission ------------------------------------------------------

    /// Validate and package the record.
    ///
    /// Returns `None` without side effects while a submission is in flight or
    /// the dialog is closed. When validation fails, every error is shown, the
    /// first invalid field is focused and `None` is returned.
    pub fn begin_submit(&mut self) -> Option<SubmitTicket> {
        if !self.is_editing() {
            tracing::debug!("Submit ignored in phase {:?}", self.phase);
            return None;
        }

        match self.validate() {
            ValidationResult::Invalid(errors) => {
                tracing::debug!("Submit blocked by {} invalid field(s)", errors.len());
                self.touched.extend(FieldId::ALL);
                self.errors = errors;
                self.focus_first_error();
                None
            }
            ValidationResult::Valid => {
                self.errors.clear();
                self.phase = DialogPhase::Submitting;
                let payload = SubmissionPayload::from_record(&mut self.record);
                tracing::info!("Submitting personnel record (session {})", self.session);
                Some(SubmitTicket {
                    session: self.session,
                    payload,
                })
            }
        }
    }

    /// Apply the submission service's answer
    pub fn finish_submit(
        &mut self,
        session: u64,
        mut payload: SubmissionPayload,
        result: Result<String, SubmitError>,
    ) -> Option<SubmitOutcome> {
        if session != self.session || !self.is_submitting() {
            tracing::debug!("Dropping submission result for session {}", session);
            return None;
        }

        match result {
            Ok(id) => {
                let full_name = payload.text(FieldId::FullName).unwrap_or("").to_string();
                tracing::info!("Personnel record {} created", id);
                *self = Self::default();
                self.notify(NotificationLevel::Success, "Personnel created successfully");
                Some(SubmitOutcome::Created { id, full_name })
            }
            Err(SubmitError::Rejected(rejection)) => {
                tracing::warn!(
                    "Submission rejected with status {} ({} field error(s))",
                    rejection.status,
                    rejection.field_errors.len()
                );
                self.record.cv_document = payload.take_document();
                self.phase = DialogPhase::Editing;

                let mut message = if rejection.has_field_errors() {
                    "Could not save. Review the highlighted fields.".to_string()
                } else {
                    rejection
                        .message
                        .clone()
                        .unwrap_or_else(|| format!("Could not save (status {})", rejection.status))
                };
                for (name, reason) in &rejection.unknown_fields {
                    message.push_str(&format!("\n{name}: {reason}"));
                }

                self.errors.extend(rejection.field_errors);
                self.focus_first_error();
                self.notify(NotificationLevel::Error, message);
                Some(SubmitOutcome::Rejected)
            }
            Err(SubmitError::Unconfirmed(e)) => {
                // Resubmitting would likely duplicate the record, so the dialog closes
                let full_name = payload.text(FieldId::FullName).unwrap_or("").to_string();
                tracing::warn!("Submission accepted but reply unreadable: {}", e);
                *self = Self::default();
                self.notify(
                    NotificationLevel::Warning,
                    format!(
                        "Saved, but the server reply could not be read. \
                         Check that {full_name} is registered before trying again."
                    ),
                );
                Some(SubmitOutcome::Unconfirmed { full_name })
            }
            Err(SubmitError::Transport(e)) => {
                tracing::error!("Submission failed: {}", e);
                self.record.cv_document = payload.take_document();
                self.phase = DialogPhase::Editing;
                self.notify(
                    NotificationLevel::Error,
                    format!("Unexpected error while saving, please try again ({e})"),
                );
                Some(SubmitOutcome::Failed)
            }
        }
    }

    // ----- focus -----------------------------------------------------------

    fn focus_order() -> impl Iterator<Item = FormFocus> {
        FieldId::ALL
            .into_iter()
            .map(FormFocus::Field)
            .chain([FormFocus::Cancel, FormFocus::Save])
    }

    pub fn focus(&self) -> FormFocus {
        self.focus
    }

    #[cfg(test)]
    pub fn set_focus(&mut self, focus: FormFocus) {
        self.focus = focus;
    }

    pub fn next_focus(&mut self) {
        let order: Vec<FormFocus> = Self::focus_order().collect();
        let idx = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = order[(idx + 1) % order.len()];
    }

    pub fn prev_focus(&mut self) {
        let order: Vec<FormFocus> = Self::focus_order().collect();
        let idx = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = order[(idx + order.len() - 1) % order.len()];
    }

    fn focus_first_error(&mut self) {
        if let Some(field) = FieldId::ALL.into_iter().find(|f| self.errors.contains_key(f)) {
            self.focus = FormFocus::Field(field);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Rejection;
    use pretty_assertions::assert_eq;

    fn status_error(status: u16) -> ApiError {
        ApiError::Status {
            status,
            body: String::new(),
        }
    }

    fn opened() -> PersonnelIntakeForm {
        let mut form = PersonnelIntakeForm::default();
        let session = form.open();
        form.begin_reference_load(ReferenceList::Provinces);
        form.begin_reference_load(ReferenceList::HireStatuses);
        form.apply_reference_data(
            session,
            ReferenceList::Provinces,
            Ok(vec![
                ReferenceOption::new("p1", "La Habana"),
                ReferenceOption::new("p2", "Matanzas"),
            ]),
        );
        form.apply_reference_data(
            session,
            ReferenceList::HireStatuses,
            Ok(vec![ReferenceOption::new("h1", "Pending")]),
        );
        form
    }

    /// Open form with every required field filled and municipalities loaded for p1
    fn filled() -> PersonnelIntakeForm {
        let mut form = opened();
        form.set_text(FieldId::FullName, "Pedro Duarte");
        form.set_text(FieldId::NationalId, "90010112345");
        form.set_text(FieldId::Address, "Calle 23 #456");
        form.set_text(FieldId::Phone, "+53 5 123 4567");
        form.set_text(FieldId::Specialty, "Driver");
        let request = form.select_province(Some("p1".into())).unwrap();
        form.apply_municipalities(
            request.session,
            request.generation,
            Ok(vec![ReferenceOption::new("m1", "Playa")]),
        );
        form.select_municipality(Some("m1".into()));
        form.select_hire_status(Some("h1".into()));
        form
    }

    mod lifecycle {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_new_form_is_closed() {
            let form = PersonnelIntakeForm::default();
            assert_eq!(form.phase(), DialogPhase::Closed);
            assert!(!form.is_open());
        }

        #[test]
        fn test_open_gives_fresh_sessions() {
            let mut form = PersonnelIntakeForm::default();
            let first = form.open();
            assert!(form.is_open());
            form.cancel();
            let second = form.open();
            assert_ne!(first, second);
        }

        #[test]
        fn test_open_twice_keeps_state() {
            let mut form = opened();
            form.set_text(FieldId::FullName, "Ana");
            let session = form.session();
            assert_eq!(form.open(), session);
            assert_eq!(form.record().full_name, "Ana");
        }

        #[test]
        fn test_cancel_discards_everything() {
            let mut form = filled();
            assert!(form.cancel());
            assert!(!form.is_open());
            assert_eq!(*form.record(), PersonnelRecord::default());
            assert!(form.errors().is_empty());
        }

        #[test]
        fn test_cancel_ignored_while_submitting() {
            let mut form = filled();
            form.begin_submit().unwrap();
            assert!(!form.cancel());
            assert!(form.is_submitting());
        }

        #[test]
        fn test_edits_ignored_when_closed() {
            let mut form = PersonnelIntakeForm::default();
            form.set_text(FieldId::FullName, "Ana");
            assert_eq!(form.record().full_name, "");
        }
    }

    mod reference_data {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_lists_become_ready_independently() {
            let mut form = PersonnelIntakeForm::default();
            let session = form.open();
            form.begin_reference_load(ReferenceList::Provinces);
            form.begin_reference_load(ReferenceList::HireStatuses);

            form.apply_reference_data(
                session,
                ReferenceList::HireStatuses,
                Ok(vec![ReferenceOption::new("h1", "Pending")]),
            );
            assert!(form.hire_statuses().is_ready());
            assert!(form.provinces().is_loading());
        }

        #[test]
        fn test_failure_warns_and_leaves_list_empty() {
            let mut form = PersonnelIntakeForm::default();
            let session = form.open();
            form.begin_reference_load(ReferenceList::Provinces);
            form.apply_reference_data(session, ReferenceList::Provinces, Err(status_error(500)));

            assert_eq!(form.provinces().status(), LoadStatus::Failed);
            assert!(form.provinces().is_empty());
            assert!(form.is_open());
            let notes = form.drain_notifications();
            assert_eq!(notes.len(), 1);
            assert_eq!(notes[0].level, NotificationLevel::Warning);
            assert!(notes[0].message.contains("Could not load reference data"));
        }

        #[test]
        fn test_result_from_previous_session_is_dropped() {
            let mut form = PersonnelIntakeForm::default();
            let old = form.open();
            form.cancel();
            form.open();
            let applied = form.apply_reference_data(
                old,
                ReferenceList::Provinces,
                Ok(vec![ReferenceOption::new("p1", "La Habana")]),
            );
            assert!(!applied);
            assert!(form.provinces().is_empty());
        }

        #[test]
        fn test_retry_only_reissues_failed_lists() {
            let mut form = PersonnelIntakeForm::default();
            let session = form.open();
            form.apply_reference_data(session, ReferenceList::Provinces, Err(status_error(503)));
            form.apply_reference_data(
                session,
                ReferenceList::HireStatuses,
                Ok(vec![ReferenceOption::new("h1", "Pending")]),
            );

            let plan = form.retry_requests();
            assert_eq!(plan.lists, vec![ReferenceList::Provinces]);
            assert!(plan.municipalities.is_none());
            assert!(form.provinces().is_loading());
            assert!(form.retry_requests().is_empty());
        }
    }

    mod province_cascade {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_province_change_clears_municipality() {
            let mut form = filled();
            let before = form.generation();
            let request = form.select_province(Some("p2".into())).unwrap();

            assert_eq!(request.province_id, "p2");
            assert_eq!(request.generation, before + 1);
            assert!(form.record().municipality_id.is_none());
            assert!(form.municipalities().is_empty());
            assert!(form.is_loading_municipalities());
        }

        #[test]
        fn test_clearing_province_issues_no_fetch() {
            let mut form = filled();
            assert!(form.select_province(None).is_none());
            assert!(form.record().province_id.is_none());
            assert!(form.municipalities().is_empty());
            assert!(!form.is_loading_municipalities());
        }

        #[test]
        fn test_same_province_is_not_a_change() {
            let mut form = filled();
            let generation = form.generation();
            assert!(form.select_province(Some("p1".into())).is_none());
            assert_eq!(form.generation(), generation);
            assert_eq!(form.record().municipality_id.as_deref(), Some("m1"));
        }

        #[test]
        fn test_stale_response_is_discarded() {
            let mut form = opened();
            let first = form.select_province(Some("p1".into())).unwrap();
            let second = form.select_province(Some("p2".into())).unwrap();

            assert!(form.apply_municipalities(
                second.session,
                second.generation,
                Ok(vec![ReferenceOption::new("m2", "Cárdenas")]),
            ));
            assert!(!form.apply_municipalities(
                first.session,
                first.generation,
                Ok(vec![ReferenceOption::new("m1", "Playa")]),
            ));

            let ids: Vec<&str> = form
                .municipalities()
                .options()
                .iter()
                .map(|o| o.id.as_str())
                .collect();
            assert_eq!(ids, vec!["m2"]);
        }

        #[test]
        fn test_stale_response_after_clearing_province() {
            let mut form = opened();
            let first = form.select_province(Some("p1".into())).unwrap();
            form.select_province(None);

            assert!(!form.apply_municipalities(
                first.session,
                first.generation,
                Ok(vec![ReferenceOption::new("m1", "Playa")]),
            ));
            assert!(form.municipalities().is_empty());
        }

        #[test]
        fn test_municipality_failure_warns() {
            let mut form = opened();
            let request = form.select_province(Some("p1".into())).unwrap();
            form.apply_municipalities(request.session, request.generation, Err(status_error(500)));

            assert_eq!(form.municipalities().status(), LoadStatus::Failed);
            assert_eq!(form.drain_notifications().len(), 1);

            let plan = form.retry_requests();
            let retry = plan.municipalities.unwrap();
            assert_eq!(retry.province_id, "p1");
            assert_eq!(retry.generation, request.generation + 1);
        }

        #[test]
        fn test_cycle_province_selects_and_requests() {
            let mut form = opened();
            form.set_focus(FormFocus::Field(FieldId::Province));
            let request = form.cycle_option(1).unwrap();
            assert_eq!(request.province_id, "p1");
            assert_eq!(form.selected_label(FieldId::Province), Some("La Habana"));

            let request = form.cycle_option(1).unwrap();
            assert_eq!(request.province_id, "p2");
        }
    }

    mod editing {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_typing_updates_focused_field() {
            let mut form = opened();
            for c in "Ana".chars() {
                form.input_char(c);
            }
            assert_eq!(form.record().full_name, "Ana");
            form.backspace();
            assert_eq!(form.record().full_name, "An");
        }

        #[test]
        fn test_incremental_validation_only_for_touched_fields() {
            let mut form = opened();
            form.set_text(FieldId::FullName, "A");
            assert_eq!(
                form.error(FieldId::FullName),
                Some("Full name must be at least 2 characters")
            );
            assert!(form.error(FieldId::Phone).is_none());

            form.set_text(FieldId::FullName, "Ana");
            assert!(form.error(FieldId::FullName).is_none());
        }

        #[test]
        fn test_can_submit_tracks_validity() {
            let mut form = filled();
            assert!(form.can_submit());
            form.set_text(FieldId::Phone, "");
            assert!(!form.can_submit());
        }

        #[test]
        fn test_document_path_typing() {
            let mut form = opened();
            form.set_focus(FormFocus::Field(FieldId::CvDocument));
            for c in "cv.pdf".chars() {
                form.input_char(c);
            }
            assert_eq!(form.document_path(), "cv.pdf");
            assert_eq!(form.record().full_name, "");
        }

        #[test]
        fn test_failed_document_load_sets_error() {
            let mut form = opened();
            let session = form.session();
            form.apply_document(
                session,
                Err(AttachmentError::Unsupported("notes.txt".to_string())),
            );
            assert_eq!(
                form.error(FieldId::CvDocument),
                Some("notes.txt is not a PDF, DOC or DOCX document")
            );
        }

        #[test]
        fn test_focus_wraps() {
            let mut form = opened();
            form.prev_focus();
            assert_eq!(form.focus(), FormFocus::Save);
            form.next_focus();
            assert_eq!(form.focus(), FormFocus::Field(FieldId::FullName));
        }
    }

    mod submission {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_invalid_submit_shows_errors_and_focuses_first() {
            let mut form = opened();
            form.set_focus(FormFocus::Save);
            assert!(form.begin_submit().is_none());
            assert_eq!(form.errors().len(), 7);
            assert_eq!(form.focus(), FormFocus::Field(FieldId::FullName));
            assert_eq!(form.phase(), DialogPhase::Editing);
        }

        #[test]
        fn test_second_submit_while_in_flight_is_noop() {
            let mut form = filled();
            assert!(form.begin_submit().is_some());
            assert!(form.begin_submit().is_none());
            assert!(form.is_submitting());
        }

        #[test]
        fn test_edits_ignored_while_submitting() {
            let mut form = filled();
            form.begin_submit().unwrap();
            form.set_text(FieldId::FullName, "Changed");
            assert_eq!(form.record().full_name, "Pedro Duarte");
        }

        #[test]
        fn test_success_resets_and_closes() {
            let mut form = filled();
            form.attach_document(DocumentAttachment::new("cv.pdf", None, vec![1]));
            let ticket = form.begin_submit().unwrap();
            assert!(form.record().cv_document.is_none());

            let outcome = form.finish_submit(ticket.session, ticket.payload, Ok("42".to_string()));
            assert_eq!(
                outcome,
                Some(SubmitOutcome::Created {
                    id: "42".to_string(),
                    full_name: "Pedro Duarte".to_string(),
                })
            );
            assert!(!form.is_open());
            assert_eq!(*form.record(), PersonnelRecord::default());
            assert!(form.errors().is_empty());

            let notes = form.drain_notifications();
            assert_eq!(notes[0].level, NotificationLevel::Success);
        }

        #[test]
        fn test_rejection_maps_field_errors_and_keeps_values() {
            let mut form = filled();
            form.attach_document(DocumentAttachment::new("cv.pdf", None, vec![1]));
            let ticket = form.begin_submit().unwrap();

            let rejection = Rejection::from_response(
                409,
                r#"{"errors": {"national_id": "Already registered"}}"#,
            );
            let outcome = form.finish_submit(
                ticket.session,
                ticket.payload,
                Err(SubmitError::Rejected(rejection)),
            );

            assert_eq!(outcome, Some(SubmitOutcome::Rejected));
            assert!(form.is_open());
            assert_eq!(form.phase(), DialogPhase::Editing);
            assert_eq!(form.error(FieldId::NationalId), Some("Already registered"));
            assert_eq!(form.focus(), FormFocus::Field(FieldId::NationalId));
            assert_eq!(form.record().full_name, "Pedro Duarte");
            assert_eq!(form.record().national_id, "90010112345");
            assert_eq!(form.record().municipality_id.as_deref(), Some("m1"));
            assert!(form.record().cv_document.is_some());

            let notes = form.drain_notifications();
            assert_eq!(notes[0].level, NotificationLevel::Error);
        }

        #[test]
        fn test_server_error_cleared_by_edit() {
            let mut form = filled();
            let ticket = form.begin_submit().unwrap();
            let rejection = Rejection::from_response(
                409,
                r#"{"errors": {"national_id": "Already registered"}}"#,
            );
            form.finish_submit(
                ticket.session,
                ticket.payload,
                Err(SubmitError::Rejected(rejection)),
            );
            form.set_text(FieldId::NationalId, "90010112346");
            assert!(form.error(FieldId::NationalId).is_none());
        }

        #[test]
        fn test_rejection_lists_unknown_fields() {
            let mut form = filled();
            let ticket = form.begin_submit().unwrap();
            let rejection =
                Rejection::from_response(400, r#"{"errors": {"salary": "Must be positive"}}"#);
            form.finish_submit(
                ticket.session,
                ticket.payload,
                Err(SubmitError::Rejected(rejection)),
            );
            let notes = form.drain_notifications();
            assert!(notes[0].message.contains("salary: Must be positive"));
        }

        #[test]
        fn test_transport_failure_keeps_state_for_retry() {
            let mut form = filled();
            let ticket = form.begin_submit().unwrap();
            let outcome = form.finish_submit(
                ticket.session,
                ticket.payload,
                Err(SubmitError::Transport(status_error(502))),
            );
            assert_eq!(outcome, Some(SubmitOutcome::Failed));
            assert!(form.can_submit());
            assert!(form.begin_submit().is_some());
        }

        #[test]
        fn test_unreadable_reply_closes_without_retry() {
            let mut form = filled();
            let ticket = form.begin_submit().unwrap();
            let decode = serde_json::from_str::<serde_json::Value>("created").unwrap_err();
            let outcome = form.finish_submit(
                ticket.session,
                ticket.payload,
                Err(SubmitError::Unconfirmed(ApiError::Decode(decode))),
            );

            assert_eq!(
                outcome,
                Some(SubmitOutcome::Unconfirmed {
                    full_name: "Pedro Duarte".to_string(),
                })
            );
            assert!(!form.is_open());
            let notes = form.drain_notifications();
            assert_eq!(notes.len(), 1);
            assert_eq!(notes[0].level, NotificationLevel::Warning);
            assert!(notes[0].message.starts_with("Saved, but the server reply could not be read"));
            assert!(!notes[0].message.contains("try again ("));
        }

        #[test]
        fn test_result_for_other_session_is_dropped() {
            let mut form = filled();
            let ticket = form.begin_submit().unwrap();
            let outcome = form.finish_submit(ticket.session + 1000, ticket.payload, Ok("1".into()));
            assert!(outcome.is_none());
            assert!(form.is_submitting());
        }
    }
}
