//! Error types for the entitlement engine.

use crate::addon_actor::AddOnError;
use crate::plan_actor::PlanError;
use crate::user_actor::UserError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum EntitlementError {
    #[error("Your user limit is over, please upgrade plan.")]
    UserLimitReached,

    /// The plan is missing, disabled or deleted.
    #[error("Plan is deleted.")]
    PlanUnavailable,

    #[error("{0} is not a company")]
    NotACompany(String),

    #[error("{0} is not a staff user")]
    NotStaff(String),

    #[error("User {0} is disabled")]
    UserDisabled(String),

    #[error("Module {0} is not active")]
    ModuleInactive(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Storage limit exceeded: {used} MB used, {requested} MB requested, {limit} MB allowed")]
    StorageLimitExceeded { used: u64, requested: u64, limit: u64 },

    #[error(transparent)]
    User(#[from] UserError),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error(transparent)]
    AddOn(#[from] AddOnError),
}
