//! Error types for the Plan actor.

use crate::framework::FrameworkError;
use thiserror::Error;

/// Errors that can occur during plan operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PlanError {
    /// The requested plan was not found.
    #[error("Plan not found: {0}")]
    NotFound(String),

    /// Another plan already uses this name.
    #[error("Plan already exists: {0}")]
    AlreadyExists(String),

    /// The plan data provided is invalid.
    #[error("Plan validation error: {0}")]
    Validation(String),

    /// The plan was deleted and can no longer change status.
    #[error("Plan is deleted.")]
    Deleted,

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for PlanError {
    fn from(e: FrameworkError) -> Self {
        match e.downcast_entity::<PlanError>() {
            Ok(err) => err,
            Err(FrameworkError::NotFound(id)) => PlanError::NotFound(id),
            Err(FrameworkError::Duplicate(key)) => PlanError::AlreadyExists(key),
            Err(other) => PlanError::ActorCommunicationError(other.to_string()),
        }
    }
}
