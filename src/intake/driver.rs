//! Runs the form's backend requests on the tokio runtime
//!
//! Each request is spawned as its own task and reports back over an unbounded
//! channel; the event loop drains it with [`IntakeDriver::poll`] every tick so
//! nothing ever blocks the interface.

use crate::api::{ApiError, PersonnelSubmissionService, ReferenceDataProvider, SubmitError};
use crate::state::{
    AttachmentError, DocumentAttachment, MunicipalityRequest, PersonnelIntakeForm, ReferenceList,
    ReferenceOption, SubmissionPayload, SubmitOutcome,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Completed background work, tagged with the session that asked for it
#[derive(Debug)]
pub enum FormEvent {
    ReferenceLoaded {
        session: u64,
        list: ReferenceList,
        result: Result<Vec<ReferenceOption>, ApiError>,
    },
    MunicipalitiesLoaded {
        session: u64,
        generation: u64,
        result: Result<Vec<ReferenceOption>, ApiError>,
    },
    SubmissionFinished {
        session: u64,
        payload: SubmissionPayload,
        result: Result<String, SubmitError>,
    },
    DocumentLoaded {
        session: u64,
        result: Result<DocumentAttachment, AttachmentError>,
    },
}

pub struct IntakeDriver {
    reference: Arc<dyn ReferenceDataProvider>,
    submissions: Arc<dyn PersonnelSubmissionService>,
    tx: UnboundedSender<FormEvent>,
    rx: UnboundedReceiver<FormEvent>,
}

impl IntakeDriver {
    pub fn new(
        reference: Arc<dyn ReferenceDataProvider>,
        submissions: Arc<dyn PersonnelSubmissionService>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            reference,
            submissions,
            tx,
            rx,
        }
    }

    /// Open the dialog and start fetching provinces and hire statuses
    pub fn open(&self, form: &mut PersonnelIntakeForm) {
        if form.is_open() {
            return;
        }
        form.open();
        for list in ReferenceList::ALL {
            self.fetch_list(form, list);
        }
    }

    fn fetch_list(&self, form: &mut PersonnelIntakeForm, list: ReferenceList) {
        form.begin_reference_load(list);
        self.spawn_list_fetch(form.session(), list);
    }

    fn spawn_list_fetch(&self, session: u64, list: ReferenceList) {
        let reference = Arc::clone(&self.reference);
        let tx = self.tx.clone();
        tracing::debug!("Fetching {} (session {})", list.label(), session);

        tokio::spawn(async move {
            let result = match list {
                ReferenceList::Provinces => reference.list_provinces().await,
                ReferenceList::HireStatuses => reference.list_hire_statuses().await,
            };
            let _ = tx.send(FormEvent::ReferenceLoaded {
                session,
                list,
                result,
            });
        });
    }

    fn fetch_municipalities(&self, request: MunicipalityRequest) {
        let reference = Arc::clone(&self.reference);
        let tx = self.tx.clone();
        tracing::debug!(
            "Fetching municipalities for province {} (generation {})",
            request.province_id,
            request.generation
        );

        tokio::spawn(async move {
            let result = reference.list_municipalities(&request.province_id).await;
            let _ = tx.send(FormEvent::MunicipalitiesLoaded {
                session: request.session,
                generation: request.generation,
                result,
            });
        });
    }

    /// Select a province and fetch its municipalities
    #[cfg(test)]
    pub fn select_province(&self, form: &mut PersonnelIntakeForm, province_id: Option<String>) {
        if let Some(request) = form.select_province(province_id) {
            self.fetch_municipalities(request);
        }
    }

    /// Step the focused select; a province change triggers a fetch
    pub fn cycle_option(&self, form: &mut PersonnelIntakeForm, delta: isize) {
        if let Some(request) = form.cycle_option(delta) {
            self.fetch_municipalities(request);
        }
    }

    /// Backspace in the focused field; clearing the province empties municipalities
    pub fn backspace(&self, form: &mut PersonnelIntakeForm) {
        if let Some(request) = form.backspace() {
            self.fetch_municipalities(request);
        }
    }

    /// Re-issue fetches for lists that failed. Returns whether anything was retried.
    pub fn retry(&self, form: &mut PersonnelIntakeForm) -> bool {
        let plan = form.retry_requests();
        if plan.is_empty() {
            return false;
        }
        for list in plan.lists {
            tracing::info!("Retrying {}", list.label());
            self.spawn_list_fetch(form.session(), list);
        }
        if let Some(request) = plan.municipalities {
            self.fetch_municipalities(request);
        }
        true
    }

    /// Load the document whose path was typed into the CV field
    pub fn load_document(&self, form: &PersonnelIntakeForm) -> bool {
        let path = form.document_path().trim();
        if path.is_empty() || !form.is_open() || form.is_submitting() {
            return false;
        }
        let path = PathBuf::from(path);
        let session = form.session();
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let result = DocumentAttachment::load(&path).await;
            let _ = tx.send(FormEvent::DocumentLoaded { session, result });
        });
        true
    }

    /// Validate and, when valid, send the record. Returns whether a request went out.
    pub fn submit(&self, form: &mut PersonnelIntakeForm) -> bool {
        let Some(ticket) = form.begin_submit() else {
            return false;
        };
        let submissions = Arc::clone(&self.submissions);
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let result = submissions.submit_personnel(&ticket.payload).await;
            let _ = tx.send(FormEvent::SubmissionFinished {
                session: ticket.session,
                payload: ticket.payload,
                result,
            });
        });
        true
    }

    /// Apply every event that has arrived since the last call
    pub fn poll(&mut self, form: &mut PersonnelIntakeForm) -> Vec<SubmitOutcome> {
        let mut outcomes = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            if let Some(outcome) = apply_event(form, event) {
                outcomes.push(outcome);
            }
        }
        outcomes
    }

    /// Wait for the next event
    #[cfg(test)]
    pub async fn next_event(&mut self) -> Option<FormEvent> {
        self.rx.recv().await
    }
}

/// Route an event to the form. Only finished submissions produce an outcome.
pub fn apply_event(form: &mut PersonnelIntakeForm, event: FormEvent) -> Option<SubmitOutcome> {
    match event {
        FormEvent::ReferenceLoaded {
            session,
            list,
            result,
        } => {
            form.apply_reference_data(session, list, result);
            None
        }
        FormEvent::MunicipalitiesLoaded {
            session,
            generation,
            result,
        } => {
            form.apply_municipalities(session, generation, result);
            None
        }
        FormEvent::SubmissionFinished {
            session,
            payload,
            result,
        } => form.finish_submit(session, payload, result),
        FormEvent::DocumentLoaded { session, result } => {
            form.apply_document(session, result);
            None
        }
    }
}
