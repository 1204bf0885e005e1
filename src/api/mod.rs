//! Intake API collaborators
//!
//! Reference data and personnel submission over HTTP, plus a process-wide
//! cache for the reference lists.

mod cache;
mod client;
mod error;
mod traits;

pub use cache::CachedReferenceData;
pub use client::{ApiClient, DEFAULT_BASE_URL};
pub use error::{ApiError, SubmitError};
pub use traits::{PersonnelSubmissionService, ReferenceDataProvider};

#[cfg(test)]
pub use error::Rejection;
#[cfg(test)]
pub use traits::{MockPersonnelSubmissionService, MockReferenceDataProvider};
