//! Custom actions for the Settings actor.

/// Both actions return the value previously stored under the key.
#[derive(Debug, Clone)]
pub enum SettingsAction {
    Set { key: String, value: String },
    Remove(String),
}
