//! Entity trait implementation for the Settings domain type.

use super::actions::SettingsAction;
use super::error::SettingsError;
use crate::framework::ActorEntity;
use crate::model::{Settings, SettingsCreate, SettingsId, SettingsQuery, SettingsUpdate};
use async_trait::async_trait;
use std::collections::BTreeMap;

fn check_key(key: &str) -> Result<(), SettingsError> {
    if key.trim().is_empty() {
        return Err(SettingsError::Validation("key must not be empty".into()));
    }
    Ok(())
}

#[async_trait]
impl ActorEntity for Settings {
    type Id = SettingsId;
    type Create = SettingsCreate;
    type Update = SettingsUpdate;
    type Action = SettingsAction;
    type ActionResult = Option<String>;
    type Query = SettingsQuery;
    type Context = ();
    type Error = SettingsError;

    fn from_create_params(id: SettingsId, params: SettingsCreate) -> Result<Self, SettingsError> {
        Ok(Settings {
            id,
            tenant: params.tenant,
            values: BTreeMap::new(),
        })
    }

    async fn on_update(&mut self, update: SettingsUpdate, _ctx: &()) -> Result<(), SettingsError> {
        for key in update.values.keys() {
            check_key(key)?;
        }
        self.values.extend(update.values);
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: SettingsAction,
        _ctx: &(),
    ) -> Result<Option<String>, SettingsError> {
        match action {
            SettingsAction::Set { key, value } => {
                check_key(&key)?;
                Ok(self.values.insert(key, value))
            }
            SettingsAction::Remove(key) => Ok(self.values.remove(&key)),
        }
    }

    fn matches(&self, query: &SettingsQuery) -> bool {
        query.tenant.is_none_or(|tenant| self.tenant == tenant)
    }

    /// One settings row per tenant.
    fn unique_key(&self) -> Option<String> {
        Some(self.tenant.to_string())
    }
}
