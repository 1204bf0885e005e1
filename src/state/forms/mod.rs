//! Form domain layer
//!
//! The personnel intake form: record, reference option lists, validation
//! rules and the dialog state machine that ties them together.

mod attachment;
mod field;
mod intake_form;
mod options;
mod payload;
mod validation;

pub use attachment::{AttachmentError, DocumentAttachment};
pub use field::{FieldId, FieldKind};
pub use intake_form::{
    DialogPhase, FormFocus, MunicipalityRequest, Notification, NotificationLevel,
    PersonnelIntakeForm, SubmitOutcome,
};
pub use options::{LoadStatus, ReferenceList, ReferenceOption};
pub use payload::SubmissionPayload;
pub use validation::FieldErrors;

#[cfg(test)]
pub use field::PersonnelRecord;
