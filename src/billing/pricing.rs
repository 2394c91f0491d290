//! List prices for a plan purchase.

use super::error::BillingError;
use crate::model::{AddOn, Plan, PlanDuration};

/// Itemized list price before discounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub base: u64,
    pub per_user: u64,
    pub users: u32,
    /// `(module, price)` for every charged AddOn.
    pub modules: Vec<(String, u64)>,
    pub total: u64,
}

impl Quote {
    fn free() -> Self {
        Self {
            base: 0,
            per_user: 0,
            users: 0,
            modules: Vec::new(),
            total: 0,
        }
    }
}

/// Prices `plan` for `duration` with the given AddOns and `users` purchased
/// seats.
///
/// `users` is the total seat count, not seats on top of the plan's ceiling.
/// Each seat is charged at the plan's per-user price and the count becomes
/// the tenant's staff ceiling once the order is approved.
///
/// AddOns already included in the plan are not charged. A trial costs
/// nothing. Only free plans can be had for a lifetime.
pub fn quote(
    plan: &Plan,
    duration: PlanDuration,
    addons: &[AddOn],
    users: u32,
) -> Result<Quote, BillingError> {
    let cycle = match duration {
        PlanDuration::Month => crate::model::BillingCycle::Month,
        PlanDuration::Year => crate::model::BillingCycle::Year,
        PlanDuration::Trial => return Ok(Quote::free()),
        PlanDuration::Lifetime if plan.is_free => return Ok(Quote::free()),
        PlanDuration::Lifetime => return Err(BillingError::LifetimeNotSold(plan.name.clone())),
    };

    let base = plan.base_price(cycle);
    let per_user = plan.per_user_price(cycle);
    let modules: Vec<(String, u64)> = addons
        .iter()
        .filter(|addon| !plan.modules.contains(&addon.module))
        .map(|addon| (addon.module.clone(), addon.price(cycle)))
        .collect();

    let total = modules
        .iter()
        .fold(base.saturating_add(per_user.saturating_mul(u64::from(users))), |sum, (_, price)| {
            sum.saturating_add(*price)
        });

    Ok(Quote {
        base,
        per_user,
        users,
        modules,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AddOnId, PlanId, PlanStatus, UserLimit};
    use std::collections::BTreeSet;

    fn plan() -> Plan {
        Plan {
            id: PlanId(1),
            name: "Growth".into(),
            price_monthly: 2_000,
            price_yearly: 20_000,
            price_per_user_monthly: 300,
            price_per_user_yearly: 3_000,
            max_users: UserLimit::Limited(10),
            storage_limit_mb: None,
            trial_days: 14,
            modules: ["Hrm".to_string()].into(),
            is_free: false,
            status: PlanStatus::Active,
        }
    }

    fn addon(module: &str, monthly: u64, yearly: u64) -> AddOn {
        AddOn {
            id: AddOnId(1),
            module: module.into(),
            alias: module.into(),
            description: String::new(),
            priority: 0,
            parent_module: None,
            version: "1.0".into(),
            monthly_price: monthly,
            yearly_price: yearly,
            permissions: BTreeSet::new(),
            enabled: true,
            display: true,
        }
    }

    #[test]
    fn monthly_total_adds_seats_and_modules() {
        let addons = [addon("Goal", 500, 5_000), addon("Hrm", 700, 7_000)];
        let q = quote(&plan(), PlanDuration::Month, &addons, 3).unwrap();
        assert_eq!(q.base, 2_000);
        assert_eq!(q.modules, vec![("Goal".to_string(), 500)]);
        assert_eq!(q.total, 2_000 + 3 * 300 + 500);
    }

    #[test]
    fn yearly_uses_yearly_prices() {
        let q = quote(&plan(), PlanDuration::Year, &[addon("Goal", 500, 5_000)], 1).unwrap();
        assert_eq!(q.total, 20_000 + 3_000 + 5_000);
    }

    #[test]
    fn trial_is_free_and_lifetime_is_not_sold() {
        assert_eq!(quote(&plan(), PlanDuration::Trial, &[], 5).unwrap().total, 0);
        assert!(matches!(
            quote(&plan(), PlanDuration::Lifetime, &[], 0),
            Err(BillingError::LifetimeNotSold(_))
        ));
    }
}
