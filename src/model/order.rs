//! Plan purchase orders.

use super::{BillingCycle, PlanId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

super::resource_id!(
    /// Type-safe identifier for Orders.
    OrderId,
    "order"
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    BankTransfer,
    /// Nothing to pay after discounts.
    Free,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Approved,
    Rejected { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub tenant: UserId,
    pub plan: PlanId,
    pub cycle: BillingCycle,
    pub modules: BTreeSet<String>,
    pub user_count: Option<u32>,
    pub list_price: u64,
    pub coupon: Option<String>,
    pub discount: u64,
    pub final_price: u64,
    pub payment_method: PaymentMethod,
    /// Reference to the uploaded bank-transfer receipt.
    pub receipt: Option<String>,
    pub status: OrderStatus,
}

impl Order {
    pub fn is_pending(&self) -> bool {
        self.status == OrderStatus::Pending
    }
}

#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub tenant: UserId,
    pub plan: PlanId,
    pub cycle: BillingCycle,
    pub modules: BTreeSet<String>,
    pub user_count: Option<u32>,
    pub list_price: u64,
    pub coupon: Option<String>,
    pub discount: u64,
    pub payment_method: PaymentMethod,
    pub receipt: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct OrderQuery {
    pub tenant: Option<UserId>,
    pub pending_only: bool,
}

impl OrderQuery {
    pub fn pending() -> Self {
        Self {
            tenant: None,
            pending_only: true,
        }
    }

    pub fn tenant(tenant: UserId) -> Self {
        Self {
            tenant: Some(tenant),
            pending_only: false,
        }
    }
}
