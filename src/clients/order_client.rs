use crate::framework::{ActorClient, PageRequest, ResourceClient};
use crate::model::{Order, OrderCreate, OrderId, OrderQuery, UserId};
use crate::order_actor::{OrderAction, OrderError};
use async_trait::async_trait;
use tracing::{debug, info, instrument};

/// Client for interacting with the Order actor.
///
/// Buyer and plan validation happen in the Order actor's `on_create` hook.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }
}

impl OrderClient {
    #[instrument(skip(self, params))]
    pub async fn create_order(&self, params: OrderCreate) -> Result<OrderId, OrderError> {
        debug!(?params, "create_order called");
        info!("Sending create_order to actor");
        self.inner.create(params).await.map_err(OrderError::from)
    }

    #[instrument(skip(self))]
    pub async fn approve(&self, id: OrderId) -> Result<Order, OrderError> {
        self.inner
            .perform_action(id, OrderAction::Approve)
            .await
            .map_err(OrderError::from)
    }

    #[instrument(skip(self))]
    pub async fn reject(&self, id: OrderId, reason: String) -> Result<Order, OrderError> {
        self.inner
            .perform_action(id, OrderAction::Reject(reason))
            .await
            .map_err(OrderError::from)
    }

    /// Orders waiting for an admin decision, oldest first.
    #[instrument(skip(self))]
    pub async fn pending(&self) -> Result<Vec<Order>, OrderError> {
        let page = self
            .inner
            .list(OrderQuery::pending(), PageRequest::all())
            .await
            .map_err(OrderError::from)?;
        Ok(page.items)
    }

    #[instrument(skip(self))]
    pub async fn for_tenant(&self, tenant: UserId) -> Result<Vec<Order>, OrderError> {
        let page = self
            .inner
            .list(OrderQuery::tenant(tenant), PageRequest::all())
            .await
            .map_err(OrderError::from)?;
        Ok(page.items)
    }
}
