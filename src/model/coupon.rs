//! Discount coupons.

use super::UserId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

super::resource_id!(
    /// Type-safe identifier for Coupons.
    CouponId,
    "coupon"
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouponKind {
    /// `amount` is a percentage of the price (0..=100).
    Percentage,
    /// `amount` is taken off the price.
    Flat,
    /// `amount` becomes the final price.
    Fixed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coupon {
    pub id: CouponId,
    pub name: String,
    /// Always upper-case.
    pub code: String,
    pub kind: CouponKind,
    pub amount: u64,
    /// 0 means unlimited.
    pub usage_limit: u32,
    /// 0 means unlimited.
    pub per_user_limit: u32,
    pub expires_on: Option<NaiveDate>,
    pub enabled: bool,
    /// One entry per redemption, in order.
    pub redemptions: Vec<UserId>,
}

impl Coupon {
    pub fn times_used(&self) -> usize {
        self.redemptions.len()
    }

    pub fn times_used_by(&self, user: UserId) -> usize {
        self.redemptions.iter().filter(|u| **u == user).count()
    }
}

/// Canonical form of a coupon code.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

#[derive(Debug, Clone)]
pub struct CouponCreate {
    pub name: String,
    pub code: String,
    pub kind: CouponKind,
    pub amount: u64,
    pub usage_limit: u32,
    pub per_user_limit: u32,
    pub expires_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default)]
pub struct CouponUpdate {
    pub name: Option<String>,
    pub kind: Option<CouponKind>,
    pub amount: Option<u64>,
    pub usage_limit: Option<u32>,
    pub per_user_limit: Option<u32>,
    pub expires_on: Option<Option<NaiveDate>>,
}

#[derive(Debug, Clone, Default)]
pub struct CouponQuery {
    /// Matched case-insensitively.
    pub code: Option<String>,
    pub enabled: Option<bool>,
}

impl CouponQuery {
    pub fn code(code: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            enabled: None,
        }
    }
}
