//! # Module Registry
//!
//! Keeps the AddOn table in step with the packages on disk and controls which
//! modules are enabled platform-wide.
//!
//! - [`discover`] reads the manifests.
//! - [`ModuleRegistry::sync`] turns them into AddOn rows.
//! - [`ModuleRegistry::enable`] / [`ModuleRegistry::disable`] respect the
//!   parent/child relation between modules.

pub mod error;
pub mod manifest;

pub use error::*;
pub use manifest::{discover, ModuleManifest, MANIFEST_FILE};

use crate::clients::AddOnClient;
use crate::model::{normalize_key, AddOn};
use std::collections::{BTreeSet, VecDeque};
use tracing::{info, instrument, warn};

/// What a [`ModuleRegistry::sync`] changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub added: Vec<String>,
    pub refreshed: Vec<String>,
}

#[derive(Clone)]
pub struct ModuleRegistry {
    addons: AddOnClient,
    auto_enable: BTreeSet<String>,
}

impl ModuleRegistry {
    /// `auto_enable` names the modules that start enabled when first registered.
    pub fn new(addons: AddOnClient, auto_enable: impl IntoIterator<Item = String>) -> Self {
        Self {
            addons,
            auto_enable: auto_enable.into_iter().map(|m| normalize_key(&m)).collect(),
        }
    }

    async fn require(&self, module: &str) -> Result<AddOn, RegistryError> {
        self.addons
            .find(module)
            .await?
            .ok_or_else(|| RegistryError::UnknownModule(module.to_string()))
    }

    async fn parent_enabled(&self, parent: Option<&str>) -> Result<bool, RegistryError> {
        match parent {
            None => Ok(true),
            Some(parent) => Ok(self.addons.find(parent).await?.is_some_and(|p| p.enabled)),
        }
    }

    /// Registers new modules and refreshes the metadata of known ones.
    ///
    /// Enablement of known modules is preserved. Rows whose package is gone
    /// from disk are left alone. Manifests should be in discovery order so
    /// parents are registered before their children.
    #[instrument(skip(self, manifests), fields(count = manifests.len()))]
    pub async fn sync(&self, manifests: &[ModuleManifest]) -> Result<SyncReport, RegistryError> {
        let mut report = SyncReport::default();
        for manifest in manifests {
            let name = manifest.name.trim().to_string();
            match self.addons.find(&name).await? {
                Some(existing) => {
                    self.addons.refresh(existing.id, manifest.to_update()).await?;
                    report.refreshed.push(name);
                }
                None => {
                    let mut enabled = self.auto_enable.contains(&normalize_key(&name));
                    if enabled && !self.parent_enabled(manifest.parent().as_deref()).await? {
                        warn!(module = %name, "Parent not enabled, registering disabled");
                        enabled = false;
                    }
                    self.addons.register(manifest.to_create(enabled)).await?;
                    info!(module = %name, enabled, "Module registered");
                    report.added.push(name);
                }
            }
        }
        Ok(report)
    }

    /// Enables a module. Its parent, if any, must already be enabled.
    ///
    /// Returns `true` if the module was disabled before.
    #[instrument(skip(self))]
    pub async fn enable(&self, module: &str) -> Result<bool, RegistryError> {
        let addon = self.require(module).await?;
        if let Some(parent) = addon.parent_module.as_deref() {
            if !self.parent_enabled(Some(parent)).await? {
                return Err(RegistryError::ParentDisabled {
                    module: addon.module,
                    parent: parent.to_string(),
                });
            }
        }
        let changed = self.addons.enable(addon.id).await?;
        if changed {
            info!(module = %addon.module, "Module enabled");
        }
        Ok(changed)
    }

    /// Disables a module and every module below it.
    ///
    /// Returns the modules that were switched off, the requested one first.
    #[instrument(skip(self))]
    pub async fn disable(&self, module: &str) -> Result<Vec<String>, RegistryError> {
        let root = self.require(module).await?;
        let mut disabled = Vec::new();
        let mut visited = BTreeSet::new();
        let mut queue = VecDeque::from([root]);

        while let Some(addon) = queue.pop_front() {
            if !visited.insert(normalize_key(&addon.module)) {
                continue;
            }
            if self.addons.disable(addon.id).await? {
                info!(module = %addon.module, "Module disabled");
                disabled.push(addon.module.clone());
            }
            queue.extend(self.addons.children_of(&addon.module).await?);
        }
        Ok(disabled)
    }

    /// Names of the enabled modules, in registration order.
    pub async fn enabled_modules(&self) -> Result<Vec<String>, RegistryError> {
        Ok(self
            .addons
            .enabled()
            .await?
            .into_iter()
            .map(|addon| addon.module)
            .collect())
    }

    /// The permissions a module declares.
    pub async fn permissions_for(&self, module: &str) -> Result<BTreeSet<String>, RegistryError> {
        Ok(self.require(module).await?.permissions)
    }

    pub async fn modules(&self) -> Result<Vec<AddOn>, RegistryError> {
        Ok(self.addons.all().await?)
    }
}
