//! Process-wide reference data cache
//!
//! Wraps a provider and keeps the first successful answer for each list for
//! the rest of the process. Failures are not cached, so a later dialog (or a
//! manual retry) asks the backend again.

use super::error::ApiError;
use super::traits::ReferenceDataProvider;
use crate::state::ReferenceOption;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::{OnceCell, RwLock};

pub struct CachedReferenceData<P> {
    inner: P,
    provinces: OnceCell<Vec<ReferenceOption>>,
    hire_statuses: OnceCell<Vec<ReferenceOption>>,
    municipalities: RwLock<HashMap<String, Vec<ReferenceOption>>>,
}

impl<P: ReferenceDataProvider> CachedReferenceData<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            provinces: OnceCell::new(),
            hire_statuses: OnceCell::new(),
            municipalities: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl<P: ReferenceDataProvider> ReferenceDataProvider for CachedReferenceData<P> {
    async fn list_provinces(&self) -> Result<Vec<ReferenceOption>, ApiError> {
        self.provinces
            .get_or_try_init(|| self.inner.list_provinces())
            .await
            .cloned()
    }

    async fn list_municipalities(
        &self,
        province_id: &str,
    ) -> Result<Vec<ReferenceOption>, ApiError> {
        if let Some(cached) = self.municipalities.read().await.get(province_id) {
            tracing::debug!("Municipalities for province {} served from cache", province_id);
            return Ok(cached.clone());
        }

        let fetched = self.inner.list_municipalities(province_id).await?;
        self.municipalities
            .write()
            .await
            .insert(province_id.to_string(), fetched.clone());
        Ok(fetched)
    }

    async fn list_hire_statuses(&self) -> Result<Vec<ReferenceOption>, ApiError> {
        self.hire_statuses
            .get_or_try_init(|| self.inner.list_hire_statuses())
            .await
            .cloned()
    }
}
