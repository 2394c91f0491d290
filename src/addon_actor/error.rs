//! Error types for the AddOn actor.

use crate::framework::FrameworkError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AddOnError {
    #[error("Module not found: {0}")]
    NotFound(String),

    #[error("Module already registered: {0}")]
    AlreadyExists(String),

    #[error("Module validation error: {0}")]
    Validation(String),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for AddOnError {
    fn from(e: FrameworkError) -> Self {
        match e.downcast_entity::<AddOnError>() {
            Ok(err) => err,
            Err(FrameworkError::NotFound(id)) => AddOnError::NotFound(id),
            Err(FrameworkError::Duplicate(key)) => AddOnError::AlreadyExists(key),
            Err(other) => AddOnError::ActorCommunicationError(other.to_string()),
        }
    }
}
