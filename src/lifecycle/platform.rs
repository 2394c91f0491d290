use crate::billing::BillingService;
use crate::clients::{
    AddOnClient, CouponClient, OrderClient, PlanClient, SettingsClient, UserClient,
};
use crate::config::PlatformConfig;
use crate::entitlement::{EntitlementError, EntitlementService, Gate, PlanAssignment};
use crate::lifecycle::{Clock, SystemClock};
use crate::model::{PlanDuration, UserCreate, UserId};
use crate::registry::{discover, ModuleRegistry, RegistryError, SyncReport};
use std::sync::Arc;
use tokio::task::{JoinError, JoinHandle};
use tracing::{error, info, instrument, warn};

/// The running platform: every resource actor plus the services on top.
///
/// `Platform` is responsible for:
/// - **Lifecycle Management**: starting and stopping all actors
/// - **Dependency Wiring**: the Order actor gets the User and Plan clients as
///   its context; services get the clients they coordinate
///
/// # Example
///
/// ```rust
/// use tenant_suite::config::PlatformConfig;
/// use tenant_suite::lifecycle::Platform;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let platform = Platform::new(PlatformConfig::default());
///     let (tenant, assignment) = platform.register_company("Acme", "owner@acme.io").await?;
///     assert!(assignment.is_none()); // no "Free" plan exists yet
///     assert_eq!(tenant.to_string(), "user_1");
///     platform.shutdown().await?;
///     Ok(())
/// }
/// ```
pub struct Platform {
    pub config: PlatformConfig,

    pub users: UserClient,
    pub plans: PlanClient,
    pub addons: AddOnClient,
    pub coupons: CouponClient,
    pub orders: OrderClient,
    pub settings: SettingsClient,

    pub registry: ModuleRegistry,
    pub entitlement: EntitlementService,
    pub gate: Gate,
    pub billing: BillingService,

    clock: Arc<dyn Clock>,

    /// Task handles for all running actors (used for graceful shutdown)
    handles: Vec<JoinHandle<()>>,
}

impl Platform {
    /// Starts every actor using the system clock.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn new(config: PlatformConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: PlatformConfig, clock: Arc<dyn Clock>) -> Self {
        let buffer = config.channel_buffer;

        // 1. Create actors
        let (user_actor, users) = crate::user_actor::new(buffer);
        let (plan_actor, plans) = crate::plan_actor::new(buffer);
        let (addon_actor, addons) = crate::addon_actor::new(buffer);
        let (coupon_actor, coupons) = crate::coupon_actor::new(buffer);
        let (order_actor, orders) = crate::order_actor::new(buffer);
        let (settings_actor, settings) = crate::settings_actor::new(buffer);

        // 2. Start actors with injected context
        let handles = vec![
            tokio::spawn(user_actor.run(())),
            tokio::spawn(plan_actor.run(())),
            tokio::spawn(addon_actor.run(())),
            tokio::spawn(coupon_actor.run(())),
            tokio::spawn(order_actor.run((users.clone(), plans.clone()))),
            tokio::spawn(settings_actor.run(())),
        ];

        // 3. Services
        let registry = ModuleRegistry::new(addons.clone(), config.auto_enable.iter().cloned());
        let entitlement = EntitlementService::new(
            users.clone(),
            plans.clone(),
            addons.clone(),
            config.always_active.clone(),
            clock.clone(),
        );
        let gate = Gate::new(entitlement.clone(), addons.clone());
        let billing = BillingService::new(
            plans.clone(),
            addons.clone(),
            coupons.clone(),
            orders.clone(),
            entitlement.clone(),
            clock.clone(),
        );

        info!(buffer, "Platform started");
        Self {
            config,
            users,
            plans,
            addons,
            coupons,
            orders,
            settings,
            registry,
            entitlement,
            gate,
            billing,
            clock,
            handles,
        }
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Discovers the packages under `packages_dir` and syncs them into the registry.
    #[instrument(skip(self))]
    pub async fn sync_modules(&self) -> Result<SyncReport, RegistryError> {
        let manifests = discover(&self.config.packages_dir)?;
        self.registry.sync(&manifests).await
    }

    /// Creates a company and gives it the configured default plan.
    ///
    /// A free default plan is granted for a lifetime, a paid one as a trial.
    /// Returns no assignment when the default plan does not exist.
    #[instrument(skip(self))]
    pub async fn register_company(
        &self,
        name: &str,
        email: &str,
    ) -> Result<(UserId, Option<PlanAssignment>), EntitlementError> {
        let tenant = self
            .users
            .create_user(UserCreate::company(name, email))
            .await?;

        let Some(plan) = self.plans.find_by_name(&self.config.default_plan).await? else {
            warn!(plan = %self.config.default_plan, "Default plan not found");
            return Ok((tenant, None));
        };
        let duration = if plan.is_free {
            PlanDuration::Lifetime
        } else {
            PlanDuration::Trial
        };
        let assignment = self
            .entitlement
            .assign_plan(tenant, plan.id, duration, None, None)
            .await?;
        Ok((tenant, Some(assignment)))
    }

    /// Gracefully shuts down every actor.
    ///
    /// Dropping the clients and services closes the actors' channels; each
    /// actor then leaves its loop. The Order actor holds User and Plan clients
    /// in its context, so those two stop once it has.
    pub async fn shutdown(mut self) -> Result<(), JoinError> {
        info!("Shutting down platform...");
        let handles = std::mem::take(&mut self.handles);
        drop(self);

        for handle in handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(e);
            }
        }

        info!("Platform shutdown complete.");
        Ok(())
    }
}
