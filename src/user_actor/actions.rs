//! Custom actions for the User actor.
//!
//! Every action returns the updated [`User`](crate::model::User).

use crate::model::{PlanId, UserLimit};
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Everything a plan assignment writes onto the tenant row.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanGrant {
    pub plan: PlanId,
    pub expires_on: Option<NaiveDate>,
    pub total_users: UserLimit,
    pub storage_limit_mb: Option<u64>,
    /// Replaces the tenant's active modules.
    pub modules: BTreeSet<String>,
}

#[derive(Debug, Clone)]
pub enum UserAction {
    /// Companies only.
    ApplyPlan(PlanGrant),
    SetDisabled(bool),
    GrantPermissions(BTreeSet<String>),
    RevokePermissions(BTreeSet<String>),
    /// Fails when the total would pass the storage limit.
    AddStorage(u64),
}
