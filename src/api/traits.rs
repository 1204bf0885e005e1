//! Trait abstraction for the intake API to enable mocking in tests

use super::error::{ApiError, SubmitError};
use crate::state::{ReferenceOption, SubmissionPayload};
use async_trait::async_trait;

/// Source of the option lists behind the select fields
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReferenceDataProvider: Send + Sync {
    /// List all provinces
    async fn list_provinces(&self) -> Result<Vec<ReferenceOption>, ApiError>;

    /// List the municipalities of a province
    async fn list_municipalities(
        &self,
        province_id: &str,
    ) -> Result<Vec<ReferenceOption>, ApiError>;

    /// List hire statuses
    async fn list_hire_statuses(&self) -> Result<Vec<ReferenceOption>, ApiError>;
}

/// Persists personnel records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PersonnelSubmissionService: Send + Sync {
    /// Create a personnel record, returning its id
    async fn submit_personnel(&self, payload: &SubmissionPayload) -> Result<String, SubmitError>;
}
