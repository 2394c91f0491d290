//! Error types for the module registry.

use crate::addon_actor::AddOnError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum RegistryError {
    /// The packages directory could not be read.
    #[error("Cannot read {path}: {message}")]
    Io { path: String, message: String },

    #[error("Unknown module: {0}")]
    UnknownModule(String),

    /// A child module cannot be enabled while its parent is disabled or missing.
    #[error("Module {module} requires {parent} to be enabled first")]
    ParentDisabled { module: String, parent: String },

    #[error(transparent)]
    AddOn(#[from] AddOnError),
}
