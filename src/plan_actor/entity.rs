//! Entity trait implementation for the Plan domain type.
//!
//! Validation of the plan form lives in `from_create_params` and `on_update`.

use super::actions::PlanAction;
use super::error::PlanError;
use crate::framework::ActorEntity;
use crate::model::{
    normalize_key, Plan, PlanCreate, PlanId, PlanQuery, PlanStatus, PlanUpdate, UserLimit,
};
use async_trait::async_trait;

fn validate(plan: &Plan) -> Result<(), PlanError> {
    if plan.name.trim().is_empty() {
        return Err(PlanError::Validation("name must not be empty".into()));
    }
    if plan.max_users == UserLimit::Limited(0) {
        return Err(PlanError::Validation(
            "max_users must be positive or unlimited".into(),
        ));
    }
    if plan.is_free
        && (plan.price_monthly
            | plan.price_yearly
            | plan.price_per_user_monthly
            | plan.price_per_user_yearly)
            != 0
    {
        return Err(PlanError::Validation("a free plan cannot carry a price".into()));
    }
    Ok(())
}

#[async_trait]
impl ActorEntity for Plan {
    type Id = PlanId;
    type Create = PlanCreate;
    type Update = PlanUpdate;
    type Action = PlanAction;
    type ActionResult = Plan;
    type Query = PlanQuery;
    type Context = ();
    type Error = PlanError;

    fn from_create_params(id: PlanId, params: PlanCreate) -> Result<Self, PlanError> {
        let plan = Plan {
            id,
            name: params.name.trim().to_string(),
            price_monthly: params.price_monthly,
            price_yearly: params.price_yearly,
            price_per_user_monthly: params.price_per_user_monthly,
            price_per_user_yearly: params.price_per_user_yearly,
            max_users: params.max_users,
            storage_limit_mb: params.storage_limit_mb,
            trial_days: params.trial_days,
            modules: params.modules,
            is_free: params.is_free,
            status: PlanStatus::Active,
        };
        validate(&plan)?;
        Ok(plan)
    }

    async fn on_update(&mut self, update: PlanUpdate, _ctx: &()) -> Result<(), PlanError> {
        if self.status == PlanStatus::Deleted {
            return Err(PlanError::Deleted);
        }
        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if let Some(price) = update.price_monthly {
            self.price_monthly = price;
        }
        if let Some(price) = update.price_yearly {
            self.price_yearly = price;
        }
        if let Some(price) = update.price_per_user_monthly {
            self.price_per_user_monthly = price;
        }
        if let Some(price) = update.price_per_user_yearly {
            self.price_per_user_yearly = price;
        }
        if let Some(max_users) = update.max_users {
            self.max_users = max_users;
        }
        if let Some(limit) = update.storage_limit_mb {
            self.storage_limit_mb = limit;
        }
        if let Some(days) = update.trial_days {
            self.trial_days = days;
        }
        if let Some(modules) = update.modules {
            self.modules = modules;
        }
        validate(self)
    }

    /// # Actions
    /// - `SetStatus`: any transition is allowed except leaving `Deleted`.
    async fn handle_action(&mut self, action: PlanAction, _ctx: &()) -> Result<Plan, PlanError> {
        match action {
            PlanAction::SetStatus(status) => {
                if self.status == PlanStatus::Deleted && status != PlanStatus::Deleted {
                    return Err(PlanError::Deleted);
                }
                self.status = status;
                Ok(self.clone())
            }
        }
    }

    fn matches(&self, query: &PlanQuery) -> bool {
        query.status.is_none_or(|status| self.status == status)
            && query
                .name
                .as_deref()
                .is_none_or(|name| normalize_key(name) == normalize_key(&self.name))
    }

    /// Names are unique among plans that are not deleted.
    fn unique_key(&self) -> Option<String> {
        (self.status != PlanStatus::Deleted).then(|| normalize_key(&self.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn starter() -> PlanCreate {
        PlanCreate {
            name: " Starter ".into(),
            price_monthly: 1_000,
            price_yearly: 10_000,
            price_per_user_monthly: 100,
            price_per_user_yearly: 1_000,
            max_users: UserLimit::Limited(5),
            storage_limit_mb: Some(512),
            trial_days: 14,
            modules: ["Hrm".to_string()].into(),
            is_free: false,
        }
    }

    #[test]
    fn create_trims_and_activates() {
        let plan = Plan::from_create_params(PlanId(1), starter()).unwrap();
        assert_eq!(plan.name, "Starter");
        assert_eq!(plan.status, PlanStatus::Active);
    }

    #[test]
    fn create_rejects_bad_forms() {
        let mut params = starter();
        params.name = "  ".into();
        assert!(matches!(
            Plan::from_create_params(PlanId(1), params),
            Err(PlanError::Validation(_))
        ));

        let mut params = starter();
        params.max_users = UserLimit::Limited(0);
        assert!(matches!(
            Plan::from_create_params(PlanId(1), params),
            Err(PlanError::Validation(_))
        ));

        let mut params = starter();
        params.is_free = true;
        assert!(matches!(
            Plan::from_create_params(PlanId(1), params),
            Err(PlanError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn deleted_is_terminal() {
        let mut plan = Plan::from_create_params(PlanId(1), starter()).unwrap();
        plan.handle_action(PlanAction::SetStatus(PlanStatus::Disabled), &())
            .await
            .unwrap();
        plan.handle_action(PlanAction::SetStatus(PlanStatus::Deleted), &())
            .await
            .unwrap();
        let err = plan
            .handle_action(PlanAction::SetStatus(PlanStatus::Active), &())
            .await
            .unwrap_err();
        assert_eq!(err, PlanError::Deleted);
        assert_eq!(err.to_string(), "Plan is deleted.");
        assert_eq!(plan.unique_key(), None);
    }
}
