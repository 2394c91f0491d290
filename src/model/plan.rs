//! Represents a subscription plan a tenant can be assigned.
//!
//! # Actor Framework
//! [`Plan`] implements the [`ActorEntity`](crate::framework::ActorEntity) trait,
//! allowing it to be managed by a [`ResourceActor`](crate::framework::ResourceActor).
//!
//! See [`Plan`](Plan#impl-ActorEntity-for-Plan) for details on:
//! - Creation parameters ([`PlanCreate`])
//! - Update parameters ([`PlanUpdate`])
//! - Custom actions ([`PlanAction`](crate::plan_actor::PlanAction))

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

super::resource_id!(
    /// Type-safe identifier for Plans.
    PlanId,
    "plan"
);

/// Ceiling on the number of staff users a tenant may have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserLimit {
    Unlimited,
    Limited(u32),
}

impl UserLimit {
    /// Reads the `-1 = unlimited` counter convention used by plan forms.
    pub fn from_counter(raw: i64) -> Option<Self> {
        match raw {
            -1 => Some(UserLimit::Unlimited),
            n if n > 0 => u32::try_from(n).ok().map(UserLimit::Limited),
            _ => None,
        }
    }

    /// Whether one more user fits when `current` users already count.
    pub fn allows(&self, current: usize) -> bool {
        match self {
            UserLimit::Unlimited => true,
            UserLimit::Limited(max) => current < *max as usize,
        }
    }
}

impl std::fmt::Display for UserLimit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserLimit::Unlimited => write!(f, "unlimited"),
            UserLimit::Limited(n) => write!(f, "{}", n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    Active,
    Disabled,
    /// Terminal. Deleted plans stay in the store so existing orders still resolve.
    Deleted,
}

/// How long a plan assignment lasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanDuration {
    Month,
    Year,
    Trial,
    Lifetime,
}

impl PlanDuration {
    /// Expiry date for an assignment starting `today`. `None` means it never expires.
    pub fn expiry(&self, today: NaiveDate, trial_days: u32) -> Option<NaiveDate> {
        match self {
            PlanDuration::Month => today.checked_add_months(Months::new(1)),
            PlanDuration::Year => today.checked_add_months(Months::new(12)),
            PlanDuration::Trial => today.checked_add_days(Days::new(u64::from(trial_days))),
            PlanDuration::Lifetime => None,
        }
    }
}

/// Billing period for paid checkouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingCycle {
    Month,
    Year,
}

impl BillingCycle {
    pub fn duration(&self) -> PlanDuration {
        match self {
            BillingCycle::Month => PlanDuration::Month,
            BillingCycle::Year => PlanDuration::Year,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: PlanId,
    pub name: String,
    pub price_monthly: u64,
    pub price_yearly: u64,
    pub price_per_user_monthly: u64,
    pub price_per_user_yearly: u64,
    pub max_users: UserLimit,
    /// `None` means unlimited storage.
    pub storage_limit_mb: Option<u64>,
    pub trial_days: u32,
    /// Modules a tenant gets when assigned this plan.
    pub modules: BTreeSet<String>,
    pub is_free: bool,
    pub status: PlanStatus,
}

impl Plan {
    /// Deleted and disabled plans cannot be assigned or bought.
    pub fn is_available(&self) -> bool {
        self.status == PlanStatus::Active
    }

    pub fn base_price(&self, cycle: BillingCycle) -> u64 {
        if self.is_free {
            return 0;
        }
        match cycle {
            BillingCycle::Month => self.price_monthly,
            BillingCycle::Year => self.price_yearly,
        }
    }

    pub fn per_user_price(&self, cycle: BillingCycle) -> u64 {
        if self.is_free {
            return 0;
        }
        match cycle {
            BillingCycle::Month => self.price_per_user_monthly,
            BillingCycle::Year => self.price_per_user_yearly,
        }
    }
}

/// Payload for creating a new plan.
#[derive(Debug, Clone)]
pub struct PlanCreate {
    pub name: String,
    pub price_monthly: u64,
    pub price_yearly: u64,
    pub price_per_user_monthly: u64,
    pub price_per_user_yearly: u64,
    pub max_users: UserLimit,
    pub storage_limit_mb: Option<u64>,
    pub trial_days: u32,
    pub modules: BTreeSet<String>,
    pub is_free: bool,
}

impl PlanCreate {
    /// A free plan with the given user ceiling and no modules.
    pub fn free(name: impl Into<String>, max_users: UserLimit) -> Self {
        Self {
            name: name.into(),
            price_monthly: 0,
            price_yearly: 0,
            price_per_user_monthly: 0,
            price_per_user_yearly: 0,
            max_users,
            storage_limit_mb: None,
            trial_days: 0,
            modules: BTreeSet::new(),
            is_free: true,
        }
    }
}

/// Payload for updating a plan. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanUpdate {
    pub name: Option<String>,
    pub price_monthly: Option<u64>,
    pub price_yearly: Option<u64>,
    pub price_per_user_monthly: Option<u64>,
    pub price_per_user_yearly: Option<u64>,
    pub max_users: Option<UserLimit>,
    pub storage_limit_mb: Option<Option<u64>>,
    pub trial_days: Option<u32>,
    pub modules: Option<BTreeSet<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct PlanQuery {
    pub status: Option<PlanStatus>,
    pub name: Option<String>,
}

impl PlanQuery {
    pub fn active() -> Self {
        Self {
            status: Some(PlanStatus::Active),
            name: None,
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            status: None,
            name: Some(name.into()),
        }
    }
}
