//! `module.json` manifests and package discovery.
//!
//! Packages live at `<root>/<vendor>/<package>/module.json`.

use super::error::RegistryError;
use crate::model::{normalize_key, AddOnCreate, AddOnUpdate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const MANIFEST_FILE: &str = "module.json";

fn default_display() -> bool {
    true
}

fn default_version() -> String {
    "1.0".to_string()
}

/// The contents of a package's `module.json`. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleManifest {
    pub name: String,
    #[serde(default)]
    pub alias: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "default_display")]
    pub display: bool,
    #[serde(default)]
    pub parent_module: Option<String>,
    #[serde(default = "default_version")]
    pub version: String,
    /// Minor currency units.
    #[serde(default)]
    pub monthly_price: u64,
    #[serde(default)]
    pub yearly_price: u64,
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl ModuleManifest {
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// The parent module, with blank values treated as none.
    pub fn parent(&self) -> Option<String> {
        self.parent_module
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
    }

    fn permission_set(&self) -> BTreeSet<String> {
        self.permissions
            .iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect()
    }

    pub(crate) fn to_create(&self, enabled: bool) -> AddOnCreate {
        AddOnCreate {
            module: self.name.trim().to_string(),
            alias: self.alias.clone(),
            description: self.description.clone(),
            priority: self.priority,
            parent_module: self.parent(),
            version: self.version.clone(),
            monthly_price: self.monthly_price,
            yearly_price: self.yearly_price,
            permissions: self.permission_set(),
            enabled,
            display: self.display,
        }
    }

    pub(crate) fn to_update(&self) -> AddOnUpdate {
        AddOnUpdate {
            alias: Some(self.alias.clone()).filter(|a| !a.trim().is_empty()),
            description: Some(self.description.clone()),
            priority: Some(self.priority),
            parent_module: Some(self.parent()),
            version: Some(self.version.clone()),
            monthly_price: Some(self.monthly_price),
            yearly_price: Some(self.yearly_price),
            permissions: Some(self.permission_set()),
            display: Some(self.display),
        }
    }
}

fn subdirectories(dir: &Path) -> Result<Vec<PathBuf>, std::io::Error> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

fn load_manifest(path: &Path) -> Option<ModuleManifest> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Cannot read manifest, skipping");
            return None;
        }
    };
    match ModuleManifest::from_json(&content) {
        Ok(manifest) if manifest.name.trim().is_empty() => {
            warn!(path = %path.display(), "Manifest has no name, skipping");
            None
        }
        Ok(manifest) => Some(manifest),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Invalid manifest, skipping");
            None
        }
    }
}

/// Scans `root/<vendor>/<package>/module.json`.
///
/// Unreadable or malformed manifests are logged and skipped. A missing root
/// yields no modules. The result is sorted by `(priority, name)`, and when two
/// packages declare the same module name the first one in that order wins.
pub fn discover(root: &Path) -> Result<Vec<ModuleManifest>, RegistryError> {
    if !root.exists() {
        warn!(root = %root.display(), "Packages directory does not exist");
        return Ok(Vec::new());
    }

    let vendors = subdirectories(root).map_err(|e| RegistryError::Io {
        path: root.display().to_string(),
        message: e.to_string(),
    })?;

    let mut manifests = Vec::new();
    for vendor in vendors {
        let packages = match subdirectories(&vendor) {
            Ok(packages) => packages,
            Err(e) => {
                warn!(vendor = %vendor.display(), error = %e, "Cannot read vendor directory, skipping");
                continue;
            }
        };
        for package in packages {
            let path = package.join(MANIFEST_FILE);
            if !path.is_file() {
                debug!(package = %package.display(), "No manifest");
                continue;
            }
            if let Some(manifest) = load_manifest(&path) {
                manifests.push(manifest);
            }
        }
    }

    manifests.sort_by(|a, b| {
        (a.priority, normalize_key(&a.name)).cmp(&(b.priority, normalize_key(&b.name)))
    });

    let mut seen = HashSet::new();
    manifests.retain(|m| {
        let fresh = seen.insert(normalize_key(&m.name));
        if !fresh {
            warn!(module = %m.name, "Duplicate module name, keeping the first");
        }
        fresh
    });

    info!(root = %root.display(), count = manifests.len(), "Discovered modules");
    Ok(manifests)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_fields_default_and_unknown_fields_are_ignored() {
        let manifest = ModuleManifest::from_json(
            r#"{ "name": "Hrm", "priority": 10, "package_name": "hrm", "child_module": [] }"#,
        )
        .unwrap();
        assert_eq!(manifest.name, "Hrm");
        assert_eq!(manifest.priority, 10);
        assert_eq!(manifest.version, "1.0");
        assert!(manifest.display);
        assert!(manifest.permissions.is_empty());
        assert_eq!(manifest.parent(), None);
    }

    #[test]
    fn blank_parent_is_no_parent() {
        let manifest =
            ModuleManifest::from_json(r#"{ "name": "Payroll", "parent_module": "  " }"#).unwrap();
        assert_eq!(manifest.parent(), None);
        assert_eq!(manifest.to_create(false).parent_module, None);
    }

    #[test]
    fn name_is_required() {
        assert!(ModuleManifest::from_json(r#"{ "alias": "Nameless" }"#).is_err());
    }
}
