//! Error types for the Settings actor.

use crate::framework::FrameworkError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SettingsError {
    #[error("Settings not found: {0}")]
    NotFound(String),

    /// The tenant already has a settings row.
    #[error("Settings already exist for {0}")]
    AlreadyExists(String),

    #[error("Settings validation error: {0}")]
    Validation(String),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for SettingsError {
    fn from(e: FrameworkError) -> Self {
        match e.downcast_entity::<SettingsError>() {
            Ok(err) => err,
            Err(FrameworkError::NotFound(id)) => SettingsError::NotFound(id),
            Err(FrameworkError::Duplicate(key)) => SettingsError::AlreadyExists(key),
            Err(other) => SettingsError::ActorCommunicationError(other.to_string()),
        }
    }
}
