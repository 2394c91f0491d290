//! # Coupon Actor
//!
//! Discount coupons and their redemption ledger.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::CouponClient;
use crate::framework::ResourceActor;
use crate::model::Coupon;

/// Creates a new Coupon actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Coupon>, CouponClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, CouponClient::new(generic_client))
}
