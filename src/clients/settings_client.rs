//! # Settings Client
//!
//! Key/value access to a tenant's company settings. The settings row is
//! created on first write; reads of a tenant without a row see no values.
use crate::framework::{ActorClient, PageRequest, ResourceClient};
use crate::model::{Settings, SettingsCreate, SettingsId, SettingsQuery, UserId};
use crate::settings_actor::{SettingsAction, SettingsError};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Client for interacting with the Settings actor.
#[derive(Clone)]
pub struct SettingsClient {
    inner: ResourceClient<Settings>,
}

impl SettingsClient {
    pub fn new(inner: ResourceClient<Settings>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<Settings> for SettingsClient {
    type Error = SettingsError;

    fn inner(&self) -> &ResourceClient<Settings> {
        &self.inner
    }
}

impl SettingsClient {
    async fn row(&self, tenant: UserId) -> Result<Option<Settings>, SettingsError> {
        let page = self
            .inner
            .list(
                SettingsQuery {
                    tenant: Some(tenant),
                },
                PageRequest::all(),
            )
            .await
            .map_err(SettingsError::from)?;
        Ok(page.items.into_iter().next())
    }

    /// The tenant's settings row, created if missing.
    async fn ensure_row(&self, tenant: UserId) -> Result<SettingsId, SettingsError> {
        if let Some(row) = self.row(tenant).await? {
            return Ok(row.id);
        }
        match self.inner.create(SettingsCreate { tenant }).await {
            Ok(id) => Ok(id),
            // Lost a race with another writer; use its row.
            Err(e) => match SettingsError::from(e) {
                SettingsError::AlreadyExists(_) => self
                    .row(tenant)
                    .await?
                    .map(|row| row.id)
                    .ok_or_else(|| SettingsError::NotFound(tenant.to_string())),
                other => Err(other),
            },
        }
    }

    #[instrument(skip(self))]
    pub async fn get(&self, tenant: UserId, key: &str) -> Result<Option<String>, SettingsError> {
        Ok(self
            .row(tenant)
            .await?
            .and_then(|row| row.values.get(key).cloned()))
    }

    /// Stores `value` under `key` and returns the previous value.
    #[instrument(skip(self))]
    pub async fn set(
        &self,
        tenant: UserId,
        key: &str,
        value: &str,
    ) -> Result<Option<String>, SettingsError> {
        debug!("Sending request");
        let id = self.ensure_row(tenant).await?;
        self.inner
            .perform_action(
                id,
                SettingsAction::Set {
                    key: key.to_string(),
                    value: value.to_string(),
                },
            )
            .await
            .map_err(SettingsError::from)
    }

    /// Removes `key` and returns the value it had.
    #[instrument(skip(self))]
    pub async fn remove(&self, tenant: UserId, key: &str) -> Result<Option<String>, SettingsError> {
        let Some(row) = self.row(tenant).await? else {
            return Ok(None);
        };
        self.inner
            .perform_action(row.id, SettingsAction::Remove(key.to_string()))
            .await
            .map_err(SettingsError::from)
    }

    #[instrument(skip(self))]
    pub async fn all(&self, tenant: UserId) -> Result<BTreeMap<String, String>, SettingsError> {
        Ok(self.row(tenant).await?.map(|row| row.values).unwrap_or_default())
    }
}
