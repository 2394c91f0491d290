//! # Billing
//!
//! Coupon discounts, plan pricing and bank-transfer orders.

pub mod discount;
pub mod error;
pub mod pricing;
pub mod service;

pub use discount::{CouponCheck, Discount};
pub use error::*;
pub use pricing::{quote, Quote};
pub use service::{Approval, BillingService, CheckoutRequest, Preview};
