//! # Coupon Client
//!
//! Provides a high-level API for interacting with the `Coupon` actor.
use crate::coupon_actor::{CouponAction, CouponError};
use crate::framework::{ActorClient, PageRequest, ResourceClient};
use crate::model::{Coupon, CouponCreate, CouponId, CouponQuery, CouponUpdate, UserId};
use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{debug, instrument};

/// Client for interacting with the Coupon actor.
#[derive(Clone)]
pub struct CouponClient {
    inner: ResourceClient<Coupon>,
}

impl CouponClient {
    pub fn new(inner: ResourceClient<Coupon>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<Coupon> for CouponClient {
    type Error = CouponError;

    fn inner(&self) -> &ResourceClient<Coupon> {
        &self.inner
    }
}

impl CouponClient {
    #[instrument(skip(self))]
    pub async fn create_coupon(&self, params: CouponCreate) -> Result<CouponId, CouponError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(CouponError::from)
    }

    #[instrument(skip(self))]
    pub async fn update_coupon(
        &self,
        id: CouponId,
        update: CouponUpdate,
    ) -> Result<Coupon, CouponError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(CouponError::from)
    }

    /// Looks a coupon up by code, case-insensitively.
    #[instrument(skip(self))]
    pub async fn find_by_code(&self, code: &str) -> Result<Option<Coupon>, CouponError> {
        let page = self
            .inner
            .list(CouponQuery::code(code), PageRequest::all())
            .await
            .map_err(CouponError::from)?;
        Ok(page.items.into_iter().next())
    }

    /// Records one use of the coupon by `user`.
    ///
    /// The limits are checked again inside the actor, so this can fail even
    /// after a successful preview.
    #[instrument(skip(self))]
    pub async fn redeem(
        &self,
        id: CouponId,
        user: UserId,
        today: NaiveDate,
    ) -> Result<Coupon, CouponError> {
        debug!("Redeeming {} for {}", id, user);
        self.inner
            .perform_action(id, CouponAction::Redeem { user, today })
            .await
            .map_err(CouponError::from)
    }

    #[instrument(skip(self))]
    pub async fn set_enabled(&self, id: CouponId, enabled: bool) -> Result<Coupon, CouponError> {
        self.inner
            .perform_action(id, CouponAction::SetEnabled(enabled))
            .await
            .map_err(CouponError::from)
    }
}
