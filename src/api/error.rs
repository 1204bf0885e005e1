//! Error types for the intake API collaborators

use crate::state::{FieldErrors, FieldId};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Longest non-JSON rejection body shown to the user
const MAX_PLAIN_MESSAGE: usize = 200;

/// Failure talking to the intake API
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Failure submitting a personnel record
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The backend understood the request and refused it
    #[error("Submission rejected with status {}", .0.status)]
    Rejected(Rejection),

    /// Network failure, a server-side error or a response that could not be understood
    #[error(transparent)]
    Transport(#[from] ApiError),

    /// The backend accepted the record but its reply could not be read
    #[error("Saved, but the reply could not be read: {0}")]
    Unconfirmed(ApiError),
}

/// Details of a backend rejection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rejection {
    pub status: u16,
    pub message: Option<String>,
    /// Errors for fields the form knows about
    pub field_errors: FieldErrors,
    /// Errors reported under names the form does not recognise
    pub unknown_fields: Vec<(String, String)>,
}

/// Body shape of a rejected submission:
/// `{"message": "...", "errors": {"national_id": "already registered"}}`
/// where each error may also be an array of messages.
#[derive(Debug, Deserialize)]
struct RejectionBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default, alias = "field_errors")]
    errors: Option<BTreeMap<String, Value>>,
}

impl Rejection {
    /// Build a rejection from a non-success status and its (possibly empty) body
    pub fn from_response(status: u16, body: &str) -> Self {
        let mut rejection = Rejection {
            status,
            ..Default::default()
        };

        let parsed: RejectionBody = match serde_json::from_str(body) {
            Ok(parsed) => parsed,
            Err(_) => {
                rejection.message = plain_text_message(body);
                return rejection;
            }
        };

        rejection.message = parsed.message.filter(|m| !m.trim().is_empty());

        for (name, value) in parsed.errors.unwrap_or_default() {
            let Some(message) = first_message(&value) else {
                continue;
            };
            match FieldId::from_wire_name(&name) {
                Some(field) => {
                    rejection.field_errors.entry(field).or_insert(message);
                }
                None => rejection.unknown_fields.push((name, message)),
            }
        }

        rejection
    }

    pub fn has_field_errors(&self) -> bool {
        !self.field_errors.is_empty()
    }
}

/// Short plain-text bodies are shown as-is; markup pages from proxies are not
fn plain_text_message(body: &str) -> Option<String> {
    let text = body.trim();
    let looks_like_markup = text.starts_with('<');
    if text.is_empty() || looks_like_markup || text.chars().count() > MAX_PLAIN_MESSAGE {
        None
    } else {
        Some(text.to_string())
    }
}

fn first_message(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(first_message),
        _ => None,
    }
}
