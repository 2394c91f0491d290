//! Entity trait implementation for the Coupon domain type, plus the validity
//! check shared by previews and redemption.

use super::actions::CouponAction;
use super::error::CouponError;
use crate::framework::ActorEntity;
use crate::model::{
    normalize_code, Coupon, CouponCreate, CouponId, CouponKind, CouponQuery, CouponUpdate, UserId,
};
use async_trait::async_trait;
use chrono::NaiveDate;

impl Coupon {
    /// Whether `user` may use this coupon on `today`.
    ///
    /// Checks run in order: enabled, expiry, total usage, per-user usage.
    /// A coupon expiring today is still valid.
    pub fn check_redeemable(&self, user: UserId, today: NaiveDate) -> Result<(), CouponError> {
        if !self.enabled {
            return Err(CouponError::Disabled);
        }
        if self.expires_on.is_some_and(|expiry| expiry < today) {
            return Err(CouponError::Expired);
        }
        if self.usage_limit > 0 && self.times_used() >= self.usage_limit as usize {
            return Err(CouponError::UsageLimitReached);
        }
        if self.per_user_limit > 0 && self.times_used_by(user) >= self.per_user_limit as usize {
            return Err(CouponError::PerUserLimitReached);
        }
        Ok(())
    }
}

fn validate(coupon: &Coupon) -> Result<(), CouponError> {
    if coupon.name.trim().is_empty() {
        return Err(CouponError::Validation("name must not be empty".into()));
    }
    if coupon.code.is_empty()
        || !coupon
            .code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(CouponError::Validation(format!(
            "invalid coupon code: {:?}",
            coupon.code
        )));
    }
    match coupon.kind {
        CouponKind::Percentage if coupon.amount == 0 || coupon.amount > 100 => Err(
            CouponError::Validation("percentage must be between 1 and 100".into()),
        ),
        CouponKind::Flat if coupon.amount == 0 => {
            Err(CouponError::Validation("flat discount must be positive".into()))
        }
        _ => Ok(()),
    }
}

#[async_trait]
impl ActorEntity for Coupon {
    type Id = CouponId;
    type Create = CouponCreate;
    type Update = CouponUpdate;
    type Action = CouponAction;
    type ActionResult = Coupon;
    type Query = CouponQuery;
    type Context = ();
    type Error = CouponError;

    fn from_create_params(id: CouponId, params: CouponCreate) -> Result<Self, CouponError> {
        let coupon = Coupon {
            id,
            name: params.name.trim().to_string(),
            code: normalize_code(&params.code),
            kind: params.kind,
            amount: params.amount,
            usage_limit: params.usage_limit,
            per_user_limit: params.per_user_limit,
            expires_on: params.expires_on,
            enabled: true,
            redemptions: Vec::new(),
        };
        validate(&coupon)?;
        Ok(coupon)
    }

    async fn on_update(&mut self, update: CouponUpdate, _ctx: &()) -> Result<(), CouponError> {
        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if let Some(kind) = update.kind {
            self.kind = kind;
        }
        if let Some(amount) = update.amount {
            self.amount = amount;
        }
        if let Some(limit) = update.usage_limit {
            self.usage_limit = limit;
        }
        if let Some(limit) = update.per_user_limit {
            self.per_user_limit = limit;
        }
        if let Some(expiry) = update.expires_on {
            self.expires_on = expiry;
        }
        validate(self)
    }

    async fn handle_action(
        &mut self,
        action: CouponAction,
        _ctx: &(),
    ) -> Result<Coupon, CouponError> {
        match action {
            CouponAction::Redeem { user, today } => {
                self.check_redeemable(user, today)?;
                self.redemptions.push(user);
            }
            CouponAction::SetEnabled(enabled) => self.enabled = enabled,
        }
        Ok(self.clone())
    }

    fn matches(&self, query: &CouponQuery) -> bool {
        query
            .code
            .as_deref()
            .is_none_or(|code| normalize_code(code) == self.code)
            && query.enabled.is_none_or(|enabled| self.enabled == enabled)
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.code.clone())
    }
}
