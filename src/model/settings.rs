//! Per-tenant company settings.

use super::UserId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

super::resource_id!(SettingsId, "settings");

/// The key/value settings of one tenant. There is at most one per tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub id: SettingsId,
    pub tenant: UserId,
    pub values: BTreeMap<String, String>,
}

impl Settings {
    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

#[derive(Debug, Clone)]
pub struct SettingsCreate {
    pub tenant: UserId,
}

/// Merged into the stored values. Existing keys are overwritten.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub values: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct SettingsQuery {
    pub tenant: Option<UserId>,
}
