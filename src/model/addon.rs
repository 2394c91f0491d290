//! Module registry rows. One [`AddOn`] exists per discovered package.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

super::resource_id!(
    /// Type-safe identifier for AddOns.
    AddOnId,
    "addon"
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddOn {
    pub id: AddOnId,
    /// Unique module name, e.g. `Hrm`.
    pub module: String,
    pub alias: String,
    pub description: String,
    pub priority: i32,
    pub parent_module: Option<String>,
    pub version: String,
    pub monthly_price: u64,
    pub yearly_price: u64,
    pub permissions: BTreeSet<String>,
    pub enabled: bool,
    pub display: bool,
}

impl AddOn {
    pub fn price(&self, cycle: super::BillingCycle) -> u64 {
        match cycle {
            super::BillingCycle::Month => self.monthly_price,
            super::BillingCycle::Year => self.yearly_price,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AddOnCreate {
    pub module: String,
    pub alias: String,
    pub description: String,
    pub priority: i32,
    pub parent_module: Option<String>,
    pub version: String,
    pub monthly_price: u64,
    pub yearly_price: u64,
    pub permissions: BTreeSet<String>,
    pub enabled: bool,
    pub display: bool,
}

/// Metadata refresh. Enablement is changed only through actions.
#[derive(Debug, Clone, Default)]
pub struct AddOnUpdate {
    pub alias: Option<String>,
    pub description: Option<String>,
    pub priority: Option<i32>,
    pub parent_module: Option<Option<String>>,
    pub version: Option<String>,
    pub monthly_price: Option<u64>,
    pub yearly_price: Option<u64>,
    pub permissions: Option<BTreeSet<String>>,
    pub display: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct AddOnQuery {
    pub module: Option<String>,
    pub enabled: Option<bool>,
    pub parent_module: Option<String>,
}

impl AddOnQuery {
    pub fn module(name: impl Into<String>) -> Self {
        Self {
            module: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn enabled() -> Self {
        Self {
            enabled: Some(true),
            ..Self::default()
        }
    }

    pub fn children_of(parent: impl Into<String>) -> Self {
        Self {
            parent_module: Some(parent.into()),
            ..Self::default()
        }
    }
}
