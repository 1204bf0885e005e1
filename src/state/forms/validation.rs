//! Field validation rules for the personnel record
//!
//! Each field has an ordered list of rules; the first violated rule decides
//! the message, so every invalid field carries exactly one error.

use super::field::{FieldId, PersonnelRecord};
use super::options::OptionList;
use std::collections::BTreeMap;
use validator::ValidateEmail;

pub const FULL_NAME_MIN: usize = 2;
pub const FULL_NAME_MAX: usize = 100;

/// Field → human readable message
pub type FieldErrors = BTreeMap<FieldId, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(FieldErrors),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    #[cfg(test)]
    pub fn into_errors(self) -> FieldErrors {
        match self {
            Self::Valid => FieldErrors::new(),
            Self::Invalid(errors) => errors,
        }
    }
}

/// Reference data a record is checked against
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    pub provinces: &'a OptionList,
    pub municipalities: &'a OptionList,
    pub hire_statuses: &'a OptionList,
    /// Province the municipality list was fetched for
    pub municipality_scope: Option<&'a str>,
}

/// Validate every field of the record
pub fn validate_record(record: &PersonnelRecord, ctx: &ValidationContext) -> ValidationResult {
    let errors: FieldErrors = FieldId::ALL
        .iter()
        .filter_map(|&field| validate_field(field, record, ctx).map(|msg| (field, msg)))
        .collect();

    if errors.is_empty() {
        ValidationResult::Valid
    } else {
        ValidationResult::Invalid(errors)
    }
}

/// Validate a single field, returning the first violated rule's message
pub fn validate_field(
    field: FieldId,
    record: &PersonnelRecord,
    ctx: &ValidationContext,
) -> Option<String> {
    match field {
        FieldId::FullName => {
            let name = record.full_name.trim();
            let len = name.chars().count();
            if name.is_empty() {
                Some("Full name is required".to_string())
            } else if len < FULL_NAME_MIN {
                Some(format!(
                    "Full name must be at least {FULL_NAME_MIN} characters"
                ))
            } else if len > FULL_NAME_MAX {
                Some(format!(
                    "Full name must be at most {FULL_NAME_MAX} characters"
                ))
            } else {
                None
            }
        }
        FieldId::NationalId => None,
        FieldId::Address => required(&record.address, "Address is required"),
        FieldId::Phone => required(&record.phone, "Phone is required"),
        FieldId::Specialty => required(&record.specialty, "Specialty is required"),
        FieldId::Email => {
            let email = record.email.trim();
            if email.is_empty() || email.validate_email() {
                None
            } else {
                Some("Email is not valid".to_string())
            }
        }
        FieldId::Province => match present_id(&record.province_id) {
            None => Some("Select a province".to_string()),
            Some(id) if !ctx.provinces.contains(id) => Some("Unknown province".to_string()),
            Some(_) => None,
        },
        FieldId::Municipality => match present_id(&record.municipality_id) {
            None => Some("Select a municipality".to_string()),
            Some(id) => {
                let in_scope = ctx.municipality_scope.is_some()
                    && ctx.municipality_scope == present_id(&record.province_id);
                if in_scope && ctx.municipalities.contains(id) {
                    None
                } else {
                    Some("Municipality does not belong to the selected province".to_string())
                }
            }
        },
        FieldId::HireStatus => match present_id(&record.hire_status_id) {
            None => Some("Select a hire status".to_string()),
            Some(id) if !ctx.hire_statuses.contains(id) => {
                Some("Unknown hire status".to_string())
            }
            Some(_) => None,
        },
        FieldId::CvDocument => match &record.cv_document {
            Some(doc) if !doc.is_accepted() => {
                Some("Attach a PDF, DOC or DOCX document".to_string())
            }
            _ => None,
        },
    }
}

fn required(value: &str, message: &str) -> Option<String> {
    if value.trim().is_empty() {
        Some(message.to_string())
    } else {
        None
    }
}

fn present_id(id: &Option<String>) -> Option<&str> {
    id.as_deref().filter(|s| !s.trim().is_empty())
}
