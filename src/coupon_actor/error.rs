//! Error types for the Coupon actor.
//!
//! The messages are shown to the buyer as-is.

use crate::framework::FrameworkError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CouponError {
    #[error("This coupon code is invalid: {0}")]
    NotFound(String),

    #[error("Coupon code already exists: {0}")]
    AlreadyExists(String),

    #[error("Coupon validation error: {0}")]
    Validation(String),

    #[error("This coupon code is disabled.")]
    Disabled,

    #[error("This coupon code has expired.")]
    Expired,

    #[error("This coupon code has reached its usage limit.")]
    UsageLimitReached,

    #[error("You have already used this coupon code the maximum number of times.")]
    PerUserLimitReached,

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for CouponError {
    fn from(e: FrameworkError) -> Self {
        match e.downcast_entity::<CouponError>() {
            Ok(err) => err,
            Err(FrameworkError::NotFound(id)) => CouponError::NotFound(id),
            Err(FrameworkError::Duplicate(key)) => CouponError::AlreadyExists(key),
            Err(other) => CouponError::ActorCommunicationError(other.to_string()),
        }
    }
}
