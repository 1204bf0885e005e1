//! Submission payload built from a validated record

use super::attachment::DocumentAttachment;
use super::field::{FieldId, PersonnelRecord};

/// Scalar parts and the optional document, ready to be sent as multipart
#[derive(Debug, PartialEq)]
pub struct SubmissionPayload {
    fields: Vec<(FieldId, String)>,
    document: Option<DocumentAttachment>,
}

impl SubmissionPayload {
    /// Build the payload, taking ownership of the record's document.
    ///
    /// Values are sent trimmed; empty optional fields are left out.
    pub fn from_record(record: &mut PersonnelRecord) -> Self {
        let fields = FieldId::ALL
            .iter()
            .filter(|f| **f != FieldId::CvDocument)
            .filter_map(|&field| {
                let value = record.value(field).trim();
                if value.is_empty() {
                    None
                } else {
                    Some((field, value.to_string()))
                }
            })
            .collect();

        Self {
            fields,
            document: record.cv_document.take(),
        }
    }

    /// Text parts as (part name, value)
    pub fn text_parts(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().map(|(f, v)| (f.name(), v.as_str()))
    }

    pub fn text(&self, field: FieldId) -> Option<&str> {
        self.fields
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v.as_str())
    }

    pub fn document(&self) -> Option<&DocumentAttachment> {
        self.document.as_ref()
    }

    /// Hand the document back (used when a submission fails)
    pub fn take_document(&mut self) -> Option<DocumentAttachment> {
        self.document.take()
    }
}
