//! Coupon arithmetic. All amounts are minor currency units.

use crate::coupon_actor::CouponError;
use crate::model::{Coupon, CouponKind, UserId};
use chrono::NaiveDate;

/// The effect of a coupon on one price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Discount {
    pub discount: u64,
    pub final_price: u64,
}

impl Discount {
    pub fn none(price: u64) -> Self {
        Self {
            discount: 0,
            final_price: price,
        }
    }

    /// Applies a coupon of `kind` and `amount` to `price`.
    ///
    /// - `Percentage`: `price * amount / 100`, rounded half-up.
    /// - `Flat`: `amount` off, never more than the price.
    /// - `Fixed`: the price becomes `amount` unless it is already lower.
    pub fn apply(kind: CouponKind, amount: u64, price: u64) -> Self {
        let discount = match kind {
            CouponKind::Percentage => {
                let pct = u128::from(amount.min(100));
                let off = (u128::from(price) * pct + 50) / 100;
                u64::try_from(off).unwrap_or(price).min(price)
            }
            CouponKind::Flat => amount.min(price),
            CouponKind::Fixed => price.saturating_sub(amount),
        };
        Self {
            discount,
            final_price: price - discount,
        }
    }
}

/// A coupon that is valid for a buyer, with its effect on a price.
#[derive(Debug, Clone, PartialEq)]
pub struct CouponCheck {
    pub coupon: Coupon,
    pub discount: Discount,
}

impl CouponCheck {
    /// Validates `coupon` for `user` on `today` and prices it against `price`.
    pub fn evaluate(
        coupon: Coupon,
        user: UserId,
        today: NaiveDate,
        price: u64,
    ) -> Result<Self, CouponError> {
        coupon.check_redeemable(user, today)?;
        let discount = Discount::apply(coupon.kind, coupon.amount, price);
        Ok(Self { coupon, discount })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CouponId;

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(Discount::apply(CouponKind::Percentage, 15, 1_010).discount, 152);
        assert_eq!(Discount::apply(CouponKind::Percentage, 15, 1_003).discount, 150);
        assert_eq!(Discount::apply(CouponKind::Percentage, 50, 1).discount, 1);
        assert_eq!(Discount::apply(CouponKind::Percentage, 100, 999).final_price, 0);
    }

    #[test]
    fn percentage_does_not_overflow() {
        let d = Discount::apply(CouponKind::Percentage, 100, u64::MAX);
        assert_eq!(d.discount, u64::MAX);
        assert_eq!(d.final_price, 0);
    }

    #[test]
    fn flat_never_goes_negative() {
        assert_eq!(
            Discount::apply(CouponKind::Flat, 500, 2_000),
            Discount { discount: 500, final_price: 1_500 }
        );
        assert_eq!(
            Discount::apply(CouponKind::Flat, 5_000, 2_000),
            Discount { discount: 2_000, final_price: 0 }
        );
    }

    #[test]
    fn fixed_sets_the_final_price() {
        assert_eq!(
            Discount::apply(CouponKind::Fixed, 999, 5_000),
            Discount { discount: 4_001, final_price: 999 }
        );
        assert_eq!(Discount::apply(CouponKind::Fixed, 9_000, 5_000), Discount::none(5_000));
    }

    #[test]
    fn evaluate_rejects_expired_coupons() {
        let coupon = Coupon {
            id: CouponId(1),
            name: "Old".into(),
            code: "OLD".into(),
            kind: CouponKind::Flat,
            amount: 100,
            usage_limit: 0,
            per_user_limit: 0,
            expires_on: NaiveDate::from_ymd_opt(2025, 12, 31),
            enabled: true,
            redemptions: vec![],
        };
        let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert_eq!(
            CouponCheck::evaluate(coupon, UserId(1), today, 1_000).unwrap_err(),
            CouponError::Expired
        );
    }
}
