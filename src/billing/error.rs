//! Error types for billing.

use crate::addon_actor::AddOnError;
use crate::coupon_actor::CouponError;
use crate::entitlement::EntitlementError;
use crate::order_actor::OrderError;
use crate::plan_actor::PlanError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum BillingError {
    #[error("Plan is deleted.")]
    PlanUnavailable,

    #[error("Module {0} cannot be purchased")]
    ModuleUnavailable(String),

    #[error("Plan {0} is not sold for a lifetime")]
    LifetimeNotSold(String),

    #[error("Plan {0} has no trial")]
    TrialUnavailable(String),

    /// The order was approved but the tenant did not receive the plan.
    #[error("Order {order} approved but the plan was not assigned: {source}")]
    PlanNotAssigned {
        order: String,
        #[source]
        source: EntitlementError,
    },

    #[error(transparent)]
    Coupon(#[from] CouponError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Entitlement(#[from] EntitlementError),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error(transparent)]
    AddOn(#[from] AddOnError),
}
