//! Checkout and order approval.
//!
//! Buying a plan is a sequence of writes across resources with no
//! transaction: the order is created pending, and only approval redeems the
//! coupon and assigns the plan, in that order.

use super::discount::{CouponCheck, Discount};
use super::error::BillingError;
use super::pricing::{quote, Quote};
use crate::clients::{AddOnClient, CouponClient, OrderClient, PlanClient};
use crate::coupon_actor::CouponError;
use crate::entitlement::{EntitlementService, PlanAssignment};
use crate::framework::ActorClient;
use crate::lifecycle::Clock;
use crate::model::{
    normalize_code, AddOn, BillingCycle, Order, OrderCreate, OrderId, PaymentMethod, Plan,
    PlanDuration, PlanId, UserId, UserLimit,
};
use crate::order_actor::OrderError;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, instrument, warn};

/// What a tenant wants to buy.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub tenant: UserId,
    pub plan: PlanId,
    pub cycle: BillingCycle,
    /// AddOns on top of the plan's own modules.
    pub modules: BTreeSet<String>,
    /// Total seats purchased, charged at the plan's per-user price. Becomes
    /// the tenant's staff ceiling on approval instead of the plan's own.
    pub users: Option<u32>,
    pub coupon: Option<String>,
}

impl CheckoutRequest {
    pub fn new(tenant: UserId, plan: PlanId, cycle: BillingCycle) -> Self {
        Self {
            tenant,
            plan,
            cycle,
            modules: BTreeSet::new(),
            users: None,
            coupon: None,
        }
    }

    pub fn with_modules<I, S>(mut self, modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.modules = modules.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_users(mut self, users: u32) -> Self {
        self.users = Some(users);
        self
    }

    pub fn with_coupon(mut self, code: impl Into<String>) -> Self {
        self.coupon = Some(code.into());
        self
    }
}

/// A priced checkout, before any order exists.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub quote: Quote,
    /// Canonical names of the requested AddOns.
    pub modules: BTreeSet<String>,
    /// Upper-case code of the applied coupon.
    pub coupon: Option<String>,
    pub discount: Discount,
}

impl Preview {
    pub fn final_price(&self) -> u64 {
        self.discount.final_price
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Approval {
    pub order: Order,
    pub assignment: PlanAssignment,
}

#[derive(Clone)]
pub struct BillingService {
    plans: PlanClient,
    addons: AddOnClient,
    coupons: CouponClient,
    orders: OrderClient,
    entitlement: EntitlementService,
    clock: Arc<dyn Clock>,
    approvals: Arc<Mutex<()>>,
}

impl BillingService {
    pub fn new(
        plans: PlanClient,
        addons: AddOnClient,
        coupons: CouponClient,
        orders: OrderClient,
        entitlement: EntitlementService,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            plans,
            addons,
            coupons,
            orders,
            entitlement,
            clock,
            approvals: Arc::default(),
        }
    }

    async fn available_plan(&self, id: PlanId) -> Result<Plan, BillingError> {
        match self.plans.get(id).await? {
            Some(plan) if plan.is_available() => Ok(plan),
            _ => Err(BillingError::PlanUnavailable),
        }
    }

    async fn purchasable_addons(&self, modules: &BTreeSet<String>) -> Result<Vec<AddOn>, BillingError> {
        let mut addons = Vec::with_capacity(modules.len());
        for module in modules {
            match self.addons.find(module).await? {
                Some(addon) if addon.enabled => addons.push(addon),
                _ => return Err(BillingError::ModuleUnavailable(module.clone())),
            }
        }
        Ok(addons)
    }

    /// Looks the coupon up and checks it for `tenant` against `price`.
    #[instrument(skip(self))]
    pub async fn check_coupon(
        &self,
        code: &str,
        tenant: UserId,
        price: u64,
    ) -> Result<CouponCheck, BillingError> {
        let coupon = self
            .coupons
            .find_by_code(code)
            .await?
            .ok_or_else(|| CouponError::NotFound(normalize_code(code)))?;
        Ok(CouponCheck::evaluate(coupon, tenant, self.clock.today(), price)?)
    }

    /// Prices a checkout with the coupon applied. Nothing is written.
    #[instrument(skip(self))]
    pub async fn preview(&self, request: &CheckoutRequest) -> Result<Preview, BillingError> {
        let plan = self.available_plan(request.plan).await?;
        let addons = self.purchasable_addons(&request.modules).await?;
        let quote = quote(
            &plan,
            request.cycle.duration(),
            &addons,
            request.users.unwrap_or(0),
        )?;

        let (coupon, discount) = match request.coupon.as_deref() {
            Some(code) => {
                let check = self.check_coupon(code, request.tenant, quote.total).await?;
                (Some(check.coupon.code), check.discount)
            }
            None => (None, Discount::none(quote.total)),
        };

        Ok(Preview {
            modules: addons.into_iter().map(|addon| addon.module).collect(),
            quote,
            coupon,
            discount,
        })
    }

    /// Places a bank-transfer order.
    ///
    /// The order stays pending until an admin approves it. When nothing is
    /// left to pay the order is placed as `Free` and approved right away.
    #[instrument(skip(self, receipt))]
    pub async fn checkout_bank_transfer(
        &self,
        request: &CheckoutRequest,
        receipt: Option<String>,
    ) -> Result<Order, BillingError> {
        let preview = self.preview(request).await?;
        let payment_method = if preview.final_price() == 0 {
            PaymentMethod::Free
        } else {
            PaymentMethod::BankTransfer
        };

        let id = self
            .orders
            .create_order(OrderCreate {
                tenant: request.tenant,
                plan: request.plan,
                cycle: request.cycle,
                modules: preview.modules.clone(),
                user_count: request.users,
                list_price: preview.quote.total,
                coupon: preview.coupon.clone(),
                discount: preview.discount.discount,
                payment_method,
                receipt,
            })
            .await?;
        info!(order = %id, total = preview.final_price(), "Order placed");

        if payment_method == PaymentMethod::Free {
            return Ok(self.approve(id).await?.order);
        }
        Ok(self.orders.fetch(id).await?)
    }

    /// Approves a pending order: redeems its coupon, marks it approved and
    /// assigns the plan.
    ///
    /// Approvals are serialized. The coupon is redeemed before the order
    /// changes state, so an order whose coupon ran out stays pending. A plan
    /// that cannot be assigned after approval is reported as
    /// [`BillingError::PlanNotAssigned`].
    #[instrument(skip(self))]
    pub async fn approve(&self, id: OrderId) -> Result<Approval, BillingError> {
        let _guard = self.approvals.lock().await;
        let order = self.orders.fetch(id).await?;
        if !order.is_pending() {
            return Err(OrderError::NotPending(id.to_string()).into());
        }
        let plan = self.available_plan(order.plan).await?;
        let coupon = match order.coupon.as_deref() {
            Some(code) => Some(self.check_coupon(code, order.tenant, order.list_price).await?.coupon),
            None => None,
        };

        if let Some(coupon) = &coupon {
            self.coupons
                .redeem(coupon.id, order.tenant, self.clock.today())
                .await
                .inspect_err(|e| warn!(order = %id, error = %e, "Coupon redemption failed"))?;
        }
        let order = self.orders.approve(id).await.inspect_err(|e| {
            if let Some(coupon) = &coupon {
                error!(order = %id, coupon = %coupon.code, error = %e, "Coupon redeemed but order not approved");
            }
        })?;

        let modules: BTreeSet<String> = plan.modules.union(&order.modules).cloned().collect();
        let assignment = self
            .entitlement
            .assign_plan(
                order.tenant,
                order.plan,
                order.cycle.duration(),
                Some(modules),
                order.user_count.map(UserLimit::Limited),
            )
            .await
            .map_err(|source| {
                error!(order = %id, tenant = %order.tenant, error = %source, "Order approved but plan not assigned");
                BillingError::PlanNotAssigned {
                    order: id.to_string(),
                    source,
                }
            })?;
        info!(order = %id, tenant = %order.tenant, "Order approved");
        Ok(Approval { order, assignment })
    }

    #[instrument(skip(self))]
    pub async fn reject(&self, id: OrderId, reason: &str) -> Result<Order, BillingError> {
        let order = self.orders.reject(id, reason.to_string()).await?;
        info!(order = %id, "Order rejected");
        Ok(order)
    }

    /// Starts the plan's trial for `tenant`. No order is involved.
    #[instrument(skip(self))]
    pub async fn start_trial(
        &self,
        tenant: UserId,
        plan: PlanId,
    ) -> Result<PlanAssignment, BillingError> {
        let found = self.available_plan(plan).await?;
        if found.trial_days == 0 {
            return Err(BillingError::TrialUnavailable(found.name));
        }
        Ok(self
            .entitlement
            .assign_plan(tenant, plan, PlanDuration::Trial, None, None)
            .await?)
    }
}
