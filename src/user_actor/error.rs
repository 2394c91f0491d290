//! Error types for the User actor.

use crate::framework::FrameworkError;
use thiserror::Error;

/// Errors that can occur during user operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum UserError {
    /// The requested user was not found.
    #[error("User not found: {0}")]
    NotFound(String),

    /// The email is already taken.
    #[error("Email already registered: {0}")]
    AlreadyExists(String),

    /// The user data provided is invalid.
    #[error("User validation error: {0}")]
    Validation(String),

    /// The upload would exceed the plan's storage limit.
    #[error("Storage limit exceeded: {used} MB used, {requested} MB requested, {limit} MB allowed")]
    StorageLimitExceeded { used: u64, requested: u64, limit: u64 },

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for UserError {
    fn from(e: FrameworkError) -> Self {
        match e.downcast_entity::<UserError>() {
            Ok(err) => err,
            Err(FrameworkError::NotFound(id)) => UserError::NotFound(id),
            Err(FrameworkError::Duplicate(key)) => UserError::AlreadyExists(key),
            Err(other) => UserError::ActorCommunicationError(other.to_string()),
        }
    }
}
