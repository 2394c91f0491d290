//! Error types for the Order actor.

use crate::framework::FrameworkError;
use crate::plan_actor::PlanError;
use crate::user_actor::UserError;
use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// The requested order was not found.
    #[error("Order not found: {0}")]
    NotFound(String),

    /// The order data provided is invalid.
    #[error("Order validation error: {0}")]
    Validation(String),

    /// The buyer is not a company.
    #[error("Invalid tenant: {0}")]
    InvalidTenant(String),

    /// The plan is missing, disabled or deleted.
    #[error("Plan is deleted.")]
    PlanUnavailable,

    /// Only pending orders can be approved or rejected.
    #[error("Order {0} is no longer pending")]
    NotPending(String),

    #[error(transparent)]
    User(#[from] UserError),

    #[error(transparent)]
    Plan(#[from] PlanError),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for OrderError {
    fn from(e: FrameworkError) -> Self {
        match e.downcast_entity::<OrderError>() {
            Ok(err) => err,
            Err(FrameworkError::NotFound(id)) => OrderError::NotFound(id),
            Err(other) => OrderError::ActorCommunicationError(other.to_string()),
        }
    }
}
