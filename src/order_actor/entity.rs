//! Entity trait implementation for the Order domain type.
//!
//! The buyer and the plan are checked against the User and Plan actors in
//! `on_create`, so an order can never reference a staff user or a deleted plan.

use super::actions::OrderAction;
use super::error::OrderError;
use crate::clients::{PlanClient, UserClient};
use crate::framework::{ActorClient, ActorEntity};
use crate::model::{Order, OrderCreate, OrderId, OrderQuery, OrderStatus, PaymentMethod};
use async_trait::async_trait;
use tracing::{debug, warn};

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Create = OrderCreate;
    type Update = ();
    type Action = OrderAction;
    type ActionResult = Order;
    type Query = OrderQuery;
    type Context = (UserClient, PlanClient);
    type Error = OrderError;

    /// Builds the order and checks the payment form.
    fn from_create_params(id: OrderId, params: OrderCreate) -> Result<Self, OrderError> {
        if params.discount > params.list_price {
            return Err(OrderError::Validation(
                "discount exceeds the list price".into(),
            ));
        }
        if params.user_count == Some(0) {
            return Err(OrderError::Validation("user count must be positive".into()));
        }
        let final_price = params.list_price - params.discount;
        let has_receipt = params
            .receipt
            .as_deref()
            .is_some_and(|r| !r.trim().is_empty());
        match params.payment_method {
            PaymentMethod::BankTransfer if final_price > 0 && !has_receipt => {
                return Err(OrderError::Validation(
                    "a bank transfer needs a payment receipt".into(),
                ));
            }
            PaymentMethod::Free if final_price > 0 => {
                return Err(OrderError::Validation(format!(
                    "an order of {} cannot be free",
                    final_price
                )));
            }
            _ => {}
        }

        Ok(Order {
            id,
            tenant: params.tenant,
            plan: params.plan,
            cycle: params.cycle,
            modules: params.modules,
            user_count: params.user_count,
            list_price: params.list_price,
            coupon: params.coupon,
            discount: params.discount,
            final_price,
            payment_method: params.payment_method,
            receipt: params.receipt,
            status: OrderStatus::Pending,
        })
    }

    /// Validates the buyer and the plan against their actors.
    async fn on_create(&mut self, ctx: &Self::Context) -> Result<(), OrderError> {
        let (users, plans) = ctx;

        debug!(tenant = %self.tenant, "Validating buyer");
        let tenant = users.fetch(self.tenant).await?;
        if !tenant.is_company() || tenant.is_disabled {
            warn!(tenant = %self.tenant, "Buyer is not an active company");
            return Err(OrderError::InvalidTenant(self.tenant.to_string()));
        }

        debug!(plan = %self.plan, "Validating plan");
        match plans.get(self.plan).await? {
            Some(plan) if plan.is_available() => Ok(()),
            _ => Err(OrderError::PlanUnavailable),
        }
    }

    async fn on_update(&mut self, _update: (), _ctx: &Self::Context) -> Result<(), OrderError> {
        Err(OrderError::Validation("orders cannot be edited".into()))
    }

    async fn handle_action(
        &mut self,
        action: OrderAction,
        _ctx: &Self::Context,
    ) -> Result<Order, OrderError> {
        if !self.is_pending() {
            return Err(OrderError::NotPending(self.id.to_string()));
        }
        self.status = match action {
            OrderAction::Approve => OrderStatus::Approved,
            OrderAction::Reject(reason) => OrderStatus::Rejected { reason },
        };
        Ok(self.clone())
    }

    fn matches(&self, query: &OrderQuery) -> bool {
        query.tenant.is_none_or(|tenant| self.tenant == tenant)
            && (!query.pending_only || self.is_pending())
    }
}
