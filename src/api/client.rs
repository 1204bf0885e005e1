//! HTTP client for the personnel intake API
//!
//! Translates the backend's `{id, name}` / `{id, label}` payloads into
//! `ReferenceOption`s and sends personnel records as multipart forms.

use super::error::{ApiError, Rejection, SubmitError};
use super::traits::{PersonnelSubmissionService, ReferenceDataProvider};
use crate::state::{ReferenceOption, SubmissionPayload};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

/// Default API address
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";

/// Identifier as sent by the backend; some deployments use numeric keys
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireId {
    Text(String),
    Number(serde_json::Number),
}

impl WireId {
    fn into_string(self) -> String {
        match self {
            WireId::Text(s) => s,
            WireId::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct NamedDto {
    id: WireId,
    name: String,
}

#[derive(Debug, Deserialize)]
struct LabeledDto {
    id: WireId,
    label: String,
}

/// Body of a successful submission: `{"id": ..}` or a bare id
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CreatedDto {
    Object { id: WireId },
    Bare(WireId),
}

/// Client for the intake API
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for `base_url` with a per-request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("staff-intake-tui/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        tracing::debug!("GET {} {:?}", url, query);

        let response = self.http.get(&url).query(query).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(serde_json::from_str(&body)?)
    }

    fn build_form(payload: &SubmissionPayload) -> Result<Form, ApiError> {
        let mut form = Form::new();
        for (name, value) in payload.text_parts() {
            form = form.text(name, value.to_string());
        }
        if let Some(doc) = payload.document() {
            let part = Part::bytes(doc.bytes.clone())
                .file_name(doc.file_name.clone())
                .mime_str(doc.effective_media_type())?;
            form = form.part("cv_document", part);
        }
        Ok(form)
    }
}

#[async_trait]
impl ReferenceDataProvider for ApiClient {
    async fn list_provinces(&self) -> Result<Vec<ReferenceOption>, ApiError> {
        let items: Vec<NamedDto> = self.get_json("/api/provinces", &[]).await?;
        Ok(items
            .into_iter()
            .map(|p| ReferenceOption::new(p.id.into_string(), p.name))
            .collect())
    }

    async fn list_municipalities(
        &self,
        province_id: &str,
    ) -> Result<Vec<ReferenceOption>, ApiError> {
        let items: Vec<NamedDto> = self
            .get_json("/api/municipalities", &[("province", province_id)])
            .await?;
        Ok(items
            .into_iter()
            .map(|m| ReferenceOption::new(m.id.into_string(), m.name))
            .collect())
    }

    async fn list_hire_statuses(&self) -> Result<Vec<ReferenceOption>, ApiError> {
        let items: Vec<LabeledDto> = self.get_json("/api/hire-statuses", &[]).await?;
        Ok(items
            .into_iter()
            .map(|h| ReferenceOption::new(h.id.into_string(), h.label))
            .collect())
    }
}

#[async_trait]
impl PersonnelSubmissionService for ApiClient {
    async fn submit_personnel(&self, payload: &SubmissionPayload) -> Result<String, SubmitError> {
        let url = self.url("/api/personal");
        let form = Self::build_form(payload)?;
        tracing::debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(ApiError::from)?;
        let status = response.status();
        let body = response.text().await.map_err(ApiError::from)?;

        // Only the backend's own 4xx answers are rejections of the record;
        // 5xx pages (often from a proxy) are transport failures
        if status.is_client_error() {
            return Err(SubmitError::Rejected(Rejection::from_response(
                status.as_u16(),
                &body,
            )));
        }
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let created: CreatedDto = serde_json::from_str(&body)
            .map_err(|e| SubmitError::Unconfirmed(ApiError::from(e)))?;
        let id = match created {
            CreatedDto::Object { id } | CreatedDto::Bare(id) => id.into_string(),
        };
        Ok(id)
    }
}
