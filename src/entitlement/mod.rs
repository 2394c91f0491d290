//! # Entitlement Engine
//!
//! Resolves which modules a user may access, enforces per-tenant staff
//! ceilings and applies plans to tenants.

pub mod error;
pub mod gate;
pub mod service;

pub use error::*;
pub use gate::Gate;
pub use service::{plan_expired, EntitlementService, PlanAssignment};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{AddOnClient, PlanClient, UserClient};
    use crate::framework::ActorClient;
    use crate::lifecycle::FixedClock;
    use crate::model::{
        AddOnCreate, PlanCreate, PlanDuration, PlanStatus, UserCreate, UserId, UserLimit,
    };
    use crate::{addon_actor, plan_actor, user_actor};
    use chrono::NaiveDate;
    use std::collections::BTreeSet;
    use std::sync::Arc;

    struct Fixture {
        users: UserClient,
        plans: PlanClient,
        addons: AddOnClient,
        service: EntitlementService,
        clock: FixedClock,
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    async fn fixture() -> Fixture {
        let (user_actor, users) = user_actor::new(16);
        let (plan_actor, plans) = plan_actor::new(16);
        let (addon_actor, addons) = addon_actor::new(16);
        tokio::spawn(user_actor.run(()));
        tokio::spawn(plan_actor.run(()));
        tokio::spawn(addon_actor.run(()));

        for (module, enabled) in [("Hrm", true), ("Goal", true), ("Training", false)] {
            addons
                .register(AddOnCreate {
                    module: module.into(),
                    alias: String::new(),
                    description: String::new(),
                    priority: 0,
                    parent_module: None,
                    version: "1.0".into(),
                    monthly_price: 0,
                    yearly_price: 0,
                    permissions: set(&["hrm.manage", "hrm.view"]),
                    enabled,
                    display: true,
                })
                .await
                .unwrap();
        }

        let clock = FixedClock::new(date(2026, 1, 31));
        let service = EntitlementService::new(
            users.clone(),
            plans.clone(),
            addons.clone(),
            vec!["Base".to_string()],
            Arc::new(clock.clone()),
        );
        Fixture {
            users,
            plans,
            addons,
            service,
            clock,
        }
    }

    async fn company_with_staff(f: &Fixture, staff: usize) -> (UserId, Vec<UserId>) {
        let tenant = f
            .users
            .create_user(UserCreate::company("Acme", "owner@acme.io"))
            .await
            .unwrap();
        let mut ids = Vec::new();
        for i in 0..staff {
            let id = f
                .users
                .create_user(UserCreate::staff(tenant, format!("Staff {}", i), format!("s{}@acme.io", i)))
                .await
                .unwrap();
            ids.push(id);
        }
        (tenant, ids)
    }

    fn plan(name: &str, max_users: UserLimit, modules: &[&str]) -> PlanCreate {
        PlanCreate {
            modules: set(modules),
            trial_days: 7,
            ..PlanCreate::free(name, max_users)
        }
    }

    #[tokio::test]
    async fn downgrade_disables_staff_beyond_the_ceiling_in_id_order() {
        let f = fixture().await;
        let (tenant, staff) = company_with_staff(&f, 4).await;
        let small = f
            .plans
            .create_plan(plan("Small", UserLimit::Limited(2), &["Hrm"]))
            .await
            .unwrap();

        let assignment = f
            .service
            .assign_plan(tenant, small, PlanDuration::Month, None, None)
            .await
            .unwrap();
        assert_eq!(assignment.enabled_staff, 2);
        assert_eq!(assignment.disabled_staff, 2);
        assert_eq!(assignment.expires_on, Some(date(2026, 2, 28)));

        let flags: Vec<bool> = f
            .users
            .staff_of(tenant)
            .await
            .unwrap()
            .iter()
            .map(|u| u.is_disabled)
            .collect();
        assert_eq!(flags, vec![false, false, true, true]);

        // Upgrading re-enables everyone.
        let assignment = f
            .service
            .assign_plan(tenant, small, PlanDuration::Lifetime, None, Some(UserLimit::Unlimited))
            .await
            .unwrap();
        assert_eq!(assignment.disabled_staff, 0);
        assert_eq!(assignment.expires_on, None);
        assert!(!f.users.fetch(staff[3]).await.unwrap().is_disabled);
    }

    #[tokio::test]
    async fn deleted_and_disabled_plans_cannot_be_assigned() {
        let f = fixture().await;
        let (tenant, _) = company_with_staff(&f, 0).await;
        let id = f
            .plans
            .create_plan(plan("Gone", UserLimit::Unlimited, &[]))
            .await
            .unwrap();

        f.plans.set_status(id, PlanStatus::Disabled).await.unwrap();
        let err = f
            .service
            .assign_plan(tenant, id, PlanDuration::Month, None, None)
            .await
            .unwrap_err();
        assert_eq!(err, EntitlementError::PlanUnavailable);
        assert_eq!(err.to_string(), "Plan is deleted.");

        let missing = f
            .service
            .assign_plan(tenant, crate::model::PlanId(99), PlanDuration::Month, None, None)
            .await
            .unwrap_err();
        assert_eq!(missing, EntitlementError::PlanUnavailable);
    }

    #[tokio::test]
    async fn ceiling_counts_only_enabled_staff() {
        let f = fixture().await;
        let (tenant, staff) = company_with_staff(&f, 0).await;
        let id = f
            .plans
            .create_plan(plan("Duo", UserLimit::Limited(2), &[]))
            .await
            .unwrap();
        f.service
            .assign_plan(tenant, id, PlanDuration::Trial, None, None)
            .await
            .unwrap();
        assert!(staff.is_empty());

        let a = f.service.create_staff(tenant, "A", "a@acme.io").await.unwrap();
        f.service.create_staff(tenant, "B", "b@acme.io").await.unwrap();
        let err = f
            .service
            .create_staff(tenant, "C", "c@acme.io")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Your user limit is over, please upgrade plan.");

        f.users.set_disabled(a, true).await.unwrap();
        let c = f.service.create_staff(tenant, "C", "c@acme.io").await.unwrap();

        assert_eq!(
            f.service.enable_staff(a).await.unwrap_err(),
            EntitlementError::UserLimitReached
        );
        f.users.set_disabled(c, true).await.unwrap();
        assert!(!f.service.enable_staff(a).await.unwrap().is_disabled);
    }

    #[tokio::test]
    async fn activated_modules_follow_the_role() {
        let f = fixture().await;
        let (tenant, staff) = company_with_staff(&f, 1).await;
        let id = f
            .plans
            .create_plan(plan("Pro", UserLimit::Unlimited, &["hrm", "Training", "Ghost"]))
            .await
            .unwrap();
        let assignment = f
            .service
            .assign_plan(tenant, id, PlanDuration::Year, None, None)
            .await
            .unwrap();
        // Unknown modules are dropped; disabled ones are still granted.
        assert_eq!(assignment.modules, set(&["Hrm", "Training"]));

        let company = f.users.fetch(tenant).await.unwrap();
        assert_eq!(
            f.service.activated_modules(&company).await.unwrap(),
            vec!["Base", "Hrm"]
        );

        let member = f.users.fetch(staff[0]).await.unwrap();
        assert_eq!(
            f.service.activated_modules(&member).await.unwrap(),
            vec!["Base", "Hrm"]
        );

        let admin_id = f
            .users
            .create_user(UserCreate::super_admin("Root", "root@suite.io"))
            .await
            .unwrap();
        let admin = f.users.fetch(admin_id).await.unwrap();
        assert_eq!(
            f.service.activated_modules(&admin).await.unwrap(),
            vec!["Base", "Goal", "Hrm"]
        );
        assert!(f.service.module_is_active("goal", &admin).await.unwrap());
        assert!(!f.service.module_is_active("goal", &company).await.unwrap());
    }

    #[tokio::test]
    async fn gate_checks_module_then_permission() {
        let f = fixture().await;
        let (tenant, staff) = company_with_staff(&f, 1).await;
        let id = f
            .plans
            .create_plan(plan("Pro", UserLimit::Unlimited, &["Hrm"]))
            .await
            .unwrap();
        f.service
            .assign_plan(tenant, id, PlanDuration::Month, None, None)
            .await
            .unwrap();
        let gate = Gate::new(f.service.clone(), f.addons.clone());

        let company = f.users.fetch(tenant).await.unwrap();
        assert!(gate.authorize(&company, "hrm.manage", "Hrm").await.is_ok());
        assert_eq!(
            gate.authorize(&company, "hrm.delete", "Hrm").await,
            Err(EntitlementError::PermissionDenied("hrm.delete".into()))
        );
        assert_eq!(
            gate.authorize(&company, "goal.view", "Goal").await,
            Err(EntitlementError::ModuleInactive("Goal".into()))
        );
        assert!(gate.authorize(&company, "settings.edit", "Base").await.is_ok());

        let member = f.users.fetch(staff[0]).await.unwrap();
        assert!(gate.authorize(&member, "hrm.view", "Hrm").await.is_err());
        let member = f
            .users
            .grant_permissions(staff[0], set(&["hrm.view"]))
            .await
            .unwrap();
        assert!(gate.authorize(&member, "hrm.view", "Hrm").await.is_ok());
    }

    #[tokio::test]
    async fn expiry_and_storage() {
        let f = fixture().await;
        let (tenant, staff) = company_with_staff(&f, 1).await;
        let id = f
            .plans
            .create_plan(PlanCreate {
                storage_limit_mb: Some(100),
                ..plan("Trial", UserLimit::Unlimited, &[])
            })
            .await
            .unwrap();
        let assignment = f
            .service
            .assign_plan(tenant, id, PlanDuration::Trial, None, None)
            .await
            .unwrap();
        assert_eq!(assignment.expires_on, Some(date(2026, 2, 7)));

        let company = f.users.add_storage(tenant, 90).await.unwrap();
        assert!(!plan_expired(&company, f.service.today()));
        f.clock.set(date(2026, 2, 7));
        assert!(!plan_expired(&company, f.service.today()));
        f.clock.advance_days(1);
        assert!(plan_expired(&company, f.service.today()));

        let member = f.users.fetch(staff[0]).await.unwrap();
        assert!(f.service.check_storage(&member, 10).await.is_ok());
        assert!(matches!(
            f.service.check_storage(&member, 11).await,
            Err(EntitlementError::StorageLimitExceeded { limit: 100, .. })
        ));
    }
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_staff_creation_respects_the_ceiling() {
        let f = fixture().await;
        let (tenant, _) = company_with_staff(&f, 0).await;
        let id = f
            .plans
            .create_plan(plan("Solo", UserLimit::Limited(1), &[]))
            .await
            .unwrap();
        f.service
            .assign_plan(tenant, id, PlanDuration::Month, None, None)
            .await
            .unwrap();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let service = f.service.clone();
                tokio::spawn(async move {
                    service
                        .create_staff(tenant, "Staff", &format!("c{}@acme.io", i))
                        .await
                })
            })
            .collect();
        let mut created = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(e) => assert_eq!(e, EntitlementError::UserLimitReached),
            }
        }
        assert_eq!(created, 1);
        assert_eq!(f.users.staff_of(tenant).await.unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_re_enable_respects_the_ceiling() {
        let f = fixture().await;
        let (tenant, staff) = company_with_staff(&f, 4).await;
        let id = f
            .plans
            .create_plan(plan("Solo", UserLimit::Limited(1), &[]))
            .await
            .unwrap();
        f.service
            .assign_plan(tenant, id, PlanDuration::Month, None, None)
            .await
            .unwrap();
        f.users.set_disabled(staff[0], true).await.unwrap();

        let handles: Vec<_> = staff
            .iter()
            .map(|&member| {
                let service = f.service.clone();
                tokio::spawn(async move { service.enable_staff(member).await })
            })
            .collect();
        for handle in handles {
            let _ = handle.await.unwrap();
        }
        let enabled = f
            .users
            .staff_of(tenant)
            .await
            .unwrap()
            .iter()
            .filter(|u| !u.is_disabled)
            .count();
        assert_eq!(enabled, 1);
    }

    #[tokio::test]
    async fn staff_uploads_count_against_the_company() {
        let f = fixture().await;
        let (tenant, staff) = company_with_staff(&f, 1).await;
        let id = f
            .plans
            .create_plan(PlanCreate {
                storage_limit_mb: Some(100),
                ..plan("Small", UserLimit::Unlimited, &[])
            })
            .await
            .unwrap();
        f.service
            .assign_plan(tenant, id, PlanDuration::Month, None, None)
            .await
            .unwrap();

        let company = f.service.add_storage(staff[0], 70).await.unwrap();
        assert_eq!(company.id, tenant);
        assert_eq!(company.storage_used_mb, 70);
        assert_eq!(f.users.fetch(staff[0]).await.unwrap().storage_used_mb, 0);

        assert_eq!(
            f.service.add_storage(staff[0], 10_000).await,
            Err(EntitlementError::StorageLimitExceeded {
                used: 70,
                requested: 10_000,
                limit: 100
            })
        );
        let member = f.users.fetch(staff[0]).await.unwrap();
        assert!(f.service.check_storage(&member, 30).await.is_ok());
        assert!(f.service.check_storage(&member, 31).await.is_err());

        // Staff rows have no storage of their own.
        assert!(matches!(
            f.users.add_storage(staff[0], 1).await,
            Err(crate::user_actor::UserError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn disabled_users_are_refused_before_module_checks() {
        let f = fixture().await;
        let (tenant, staff) = company_with_staff(&f, 1).await;
        let id = f
            .plans
            .create_plan(plan("Pro", UserLimit::Unlimited, &["Hrm"]))
            .await
            .unwrap();
        f.service
            .assign_plan(tenant, id, PlanDuration::Month, None, None)
            .await
            .unwrap();
        f.users
            .grant_permissions(staff[0], set(&["hrm.view"]))
            .await
            .unwrap();
        let member = f.users.set_disabled(staff[0], true).await.unwrap();

        let gate = Gate::new(f.service.clone(), f.addons.clone());
        assert_eq!(
            gate.authorize(&member, "hrm.view", "Hrm").await,
            Err(EntitlementError::UserDisabled(staff[0].to_string()))
        );
    }
}
