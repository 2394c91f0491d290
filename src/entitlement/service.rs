//! Module activation, user ceilings and plan assignment.

use super::error::EntitlementError;
use crate::clients::{AddOnClient, PlanClient, UserClient};
use crate::framework::ActorClient;
use crate::lifecycle::Clock;
use crate::model::{
    normalize_key, PlanDuration, PlanId, Role, User, UserCreate, UserId, UserLimit,
};
use crate::user_actor::{PlanGrant, UserError};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{info, instrument, warn};

type TenantLocks = Arc<Mutex<HashMap<UserId, Arc<AsyncMutex<()>>>>>;

/// Outcome of [`EntitlementService::assign_plan`].
#[derive(Debug, Clone, PartialEq)]
pub struct PlanAssignment {
    pub tenant: UserId,
    pub plan: PlanId,
    pub expires_on: Option<NaiveDate>,
    pub total_users: UserLimit,
    pub modules: BTreeSet<String>,
    pub enabled_staff: usize,
    pub disabled_staff: usize,
}

/// True once the day after the expiry date has started.
pub fn plan_expired(user: &User, today: NaiveDate) -> bool {
    user.plan_expire_date.is_some_and(|expiry| expiry < today)
}

/// Clones share the per-tenant locks, so every clone sees the same ceiling.
#[derive(Clone)]
pub struct EntitlementService {
    users: UserClient,
    plans: PlanClient,
    addons: AddOnClient,
    always_active: Vec<String>,
    clock: Arc<dyn Clock>,
    /// Held while a tenant's staff count is checked and changed.
    tenant_locks: TenantLocks,
}

impl EntitlementService {
    pub fn new(
        users: UserClient,
        plans: PlanClient,
        addons: AddOnClient,
        always_active: Vec<String>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            plans,
            addons,
            always_active,
            clock,
            tenant_locks: Arc::default(),
        }
    }

    /// Serializes the check-then-write sequences on one tenant's staff.
    async fn lock_tenant(&self, tenant: UserId) -> OwnedMutexGuard<()> {
        let lock = self
            .tenant_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(tenant)
            .or_default()
            .clone();
        lock.lock_owned().await
    }

    /// Enabled AddOns keyed by normalized name.
    async fn enabled_addons(&self) -> Result<BTreeMap<String, String>, EntitlementError> {
        Ok(self
            .addons
            .enabled()
            .await?
            .into_iter()
            .map(|addon| (normalize_key(&addon.module), addon.module))
            .collect())
    }

    async fn company(&self, id: UserId) -> Result<User, EntitlementError> {
        let user = self.users.fetch(id).await?;
        if user.role != Role::Company {
            return Err(EntitlementError::NotACompany(id.to_string()));
        }
        Ok(user)
    }

    /// The modules `user` may use, sorted and without duplicates.
    ///
    /// The configured base modules are always included. The super admin gets
    /// every enabled AddOn. A company gets its own active modules and staff get
    /// their company's, both limited to AddOns that are enabled.
    #[instrument(skip(self, user), fields(user = %user.id))]
    pub async fn activated_modules(&self, user: &User) -> Result<Vec<String>, EntitlementError> {
        let enabled = self.enabled_addons().await?;
        let mut modules: Vec<String> = self.always_active.clone();

        let owned = match user.role {
            Role::SuperAdmin => {
                modules.extend(enabled.values().cloned());
                None
            }
            Role::Company => Some(user.active_modules.clone()),
            Role::Staff => {
                let owner = self.users.fetch(user.tenant_id()).await?;
                Some(owner.active_modules)
            }
        };
        if let Some(owned) = owned {
            modules.extend(
                owned
                    .iter()
                    .filter_map(|m| enabled.get(&normalize_key(m)).cloned()),
            );
        }

        modules.sort_by_key(|m| normalize_key(m));
        modules.dedup_by(|a, b| normalize_key(a) == normalize_key(b));
        Ok(modules)
    }

    pub async fn module_is_active(&self, module: &str, user: &User) -> Result<bool, EntitlementError> {
        let wanted = normalize_key(module);
        Ok(self
            .activated_modules(user)
            .await?
            .iter()
            .any(|m| normalize_key(m) == wanted))
    }

    /// Whether `tenant` may have one more enabled staff user.
    ///
    /// Disabled staff do not count toward the ceiling. The answer is only a
    /// snapshot; [`create_staff`](Self::create_staff) and
    /// [`enable_staff`](Self::enable_staff) repeat it under the tenant lock.
    #[instrument(skip(self))]
    pub async fn can_create_user(&self, tenant: UserId) -> Result<(), EntitlementError> {
        let company = self.company(tenant).await?;
        let active = self
            .users
            .staff_of(tenant)
            .await?
            .iter()
            .filter(|staff| !staff.is_disabled)
            .count();
        if company.total_users.allows(active) {
            Ok(())
        } else {
            warn!(%tenant, active, limit = %company.total_users, "User limit reached");
            Err(EntitlementError::UserLimitReached)
        }
    }

    #[instrument(skip(self))]
    pub async fn create_staff(
        &self,
        tenant: UserId,
        name: &str,
        email: &str,
    ) -> Result<UserId, EntitlementError> {
        let _guard = self.lock_tenant(tenant).await;
        self.can_create_user(tenant).await?;
        let id = self
            .users
            .create_user(UserCreate::staff(tenant, name, email))
            .await?;
        info!(%tenant, staff = %id, "Staff created");
        Ok(id)
    }

    /// Re-enables a disabled staff user, subject to the company's ceiling.
    #[instrument(skip(self))]
    pub async fn enable_staff(&self, id: UserId) -> Result<User, EntitlementError> {
        let staff = self.users.fetch(id).await?;
        if !staff.is_staff() {
            return Err(EntitlementError::NotStaff(id.to_string()));
        }
        let _guard = self.lock_tenant(staff.tenant_id()).await;
        let staff = self.users.fetch(id).await?;
        if !staff.is_disabled {
            return Ok(staff);
        }
        self.can_create_user(staff.tenant_id()).await?;
        Ok(self.users.set_disabled(id, false).await?)
    }

    /// Assigns `plan` to `tenant`.
    ///
    /// `modules` and `user_counter` override the plan's own modules and
    /// ceiling. Modules that are not registered AddOns are dropped. After the
    /// tenant row is updated, staff are walked in ascending id order: the first
    /// `N` are enabled and the rest disabled.
    #[instrument(skip(self, modules))]
    pub async fn assign_plan(
        &self,
        tenant: UserId,
        plan: PlanId,
        duration: PlanDuration,
        modules: Option<BTreeSet<String>>,
        user_counter: Option<UserLimit>,
    ) -> Result<PlanAssignment, EntitlementError> {
        let plan = match self.plans.get(plan).await? {
            Some(plan) if plan.is_available() => plan,
            _ => {
                warn!(%plan, "Plan unavailable");
                return Err(EntitlementError::PlanUnavailable);
            }
        };
        self.company(tenant).await?;
        let _guard = self.lock_tenant(tenant).await;

        let known: BTreeMap<String, String> = self
            .addons
            .all()
            .await?
            .into_iter()
            .map(|addon| (normalize_key(&addon.module), addon.module))
            .collect();
        let mut granted = BTreeSet::new();
        for module in modules.unwrap_or_else(|| plan.modules.clone()) {
            match known.get(&normalize_key(&module)) {
                Some(name) => {
                    granted.insert(name.clone());
                }
                None => warn!(module = %module, "Unknown module, not granted"),
            }
        }

        let total_users = user_counter.unwrap_or(plan.max_users);
        let expires_on = duration.expiry(self.clock.today(), plan.trial_days);
        self.users
            .apply_plan(
                tenant,
                PlanGrant {
                    plan: plan.id,
                    expires_on,
                    total_users,
                    storage_limit_mb: plan.storage_limit_mb,
                    modules: granted.clone(),
                },
            )
            .await?;

        let (mut enabled_staff, mut disabled_staff) = (0, 0);
        for (index, staff) in self.users.staff_of(tenant).await?.into_iter().enumerate() {
            let keep = total_users.allows(index);
            if staff.is_disabled == keep {
                self.users.set_disabled(staff.id, !keep).await?;
            }
            if keep {
                enabled_staff += 1;
            } else {
                disabled_staff += 1;
            }
        }

        info!(
            %tenant,
            plan = %plan.id,
            ?expires_on,
            enabled_staff,
            disabled_staff,
            "Plan assigned"
        );
        Ok(PlanAssignment {
            tenant,
            plan: plan.id,
            expires_on,
            total_users,
            modules: granted,
            enabled_staff,
            disabled_staff,
        })
    }

    /// Records `mb` of uploads by `user` against its tenant's storage.
    ///
    /// Staff uploads are charged to the owning company, whose row carries the
    /// plan's limit. The limit is checked inside the User actor.
    #[instrument(skip(self))]
    pub async fn add_storage(&self, user: UserId, mb: u64) -> Result<User, EntitlementError> {
        let user = self.users.fetch(user).await?;
        match self.users.add_storage(user.tenant_id(), mb).await {
            Ok(tenant) => Ok(tenant),
            Err(UserError::StorageLimitExceeded {
                used,
                requested,
                limit,
            }) => Err(EntitlementError::StorageLimitExceeded {
                used,
                requested,
                limit,
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Whether the tenant of `user` can store `additional_mb` more.
    pub async fn check_storage(&self, user: &User, additional_mb: u64) -> Result<(), EntitlementError> {
        let tenant = if user.is_staff() {
            self.users.fetch(user.tenant_id()).await?
        } else {
            user.clone()
        };
        match tenant.storage_limit_mb {
            Some(limit) if tenant.storage_used_mb.saturating_add(additional_mb) > limit => {
                Err(EntitlementError::StorageLimitExceeded {
                    used: tenant.storage_used_mb,
                    requested: additional_mb,
                    limit,
                })
            }
            _ => Ok(()),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }
}
