//! Custom actions for the Coupon actor.

use crate::model::UserId;
use chrono::NaiveDate;

/// Both actions return the updated coupon.
#[derive(Debug, Clone)]
pub enum CouponAction {
    /// Records one use by `user`. Validity is re-checked inside the actor, so
    /// two concurrent redemptions cannot both take the last use.
    Redeem { user: UserId, today: NaiveDate },
    SetEnabled(bool),
}
