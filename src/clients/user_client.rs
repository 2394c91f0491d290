use crate::framework::{ActorClient, PageRequest, ResourceClient};
use crate::model::{User, UserCreate, UserId, UserQuery, UserUpdate};
use crate::user_actor::{PlanGrant, UserAction, UserError};
use async_trait::async_trait;
use std::collections::BTreeSet;
use tracing::{debug, instrument};

/// Client for interacting with the User actor.
#[derive(Clone)]
pub struct UserClient {
    inner: ResourceClient<User>,
}

impl UserClient {
    pub fn new(inner: ResourceClient<User>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<User> for UserClient {
    type Error = UserError;

    fn inner(&self) -> &ResourceClient<User> {
        &self.inner
    }
}

impl UserClient {
    #[instrument(skip(self))]
    pub async fn create_user(&self, params: UserCreate) -> Result<UserId, UserError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(UserError::from)
    }

    #[instrument(skip(self))]
    pub async fn update_user(&self, id: UserId, update: UserUpdate) -> Result<User, UserError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(UserError::from)
    }

    async fn act(&self, id: UserId, action: UserAction) -> Result<User, UserError> {
        self.inner
            .perform_action(id, action)
            .await
            .map_err(UserError::from)
    }

    #[instrument(skip(self))]
    pub async fn apply_plan(&self, id: UserId, grant: PlanGrant) -> Result<User, UserError> {
        debug!("Sending request");
        self.act(id, UserAction::ApplyPlan(grant)).await
    }

    #[instrument(skip(self))]
    pub async fn set_disabled(&self, id: UserId, disabled: bool) -> Result<User, UserError> {
        self.act(id, UserAction::SetDisabled(disabled)).await
    }

    #[instrument(skip(self))]
    pub async fn grant_permissions(
        &self,
        id: UserId,
        permissions: BTreeSet<String>,
    ) -> Result<User, UserError> {
        self.act(id, UserAction::GrantPermissions(permissions)).await
    }

    #[instrument(skip(self))]
    pub async fn revoke_permissions(
        &self,
        id: UserId,
        permissions: BTreeSet<String>,
    ) -> Result<User, UserError> {
        self.act(id, UserAction::RevokePermissions(permissions)).await
    }

    /// Records `mb` of new uploads on a company or the super admin, failing
    /// past the plan's storage limit. Staff uploads go through
    /// [`EntitlementService::add_storage`](crate::entitlement::EntitlementService::add_storage).
    #[instrument(skip(self))]
    pub async fn add_storage(&self, id: UserId, mb: u64) -> Result<User, UserError> {
        self.act(id, UserAction::AddStorage(mb)).await
    }

    /// Every staff user of `tenant`, enabled or not, in ascending id order.
    #[instrument(skip(self))]
    pub async fn staff_of(&self, tenant: UserId) -> Result<Vec<User>, UserError> {
        let page = self
            .inner
            .list(UserQuery::staff_of(tenant), PageRequest::all())
            .await
            .map_err(UserError::from)?;
        Ok(page.items)
    }

    #[instrument(skip(self))]
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        let page = self
            .inner
            .list(UserQuery::by_email(email), PageRequest::all())
            .await
            .map_err(UserError::from)?;
        Ok(page.items.into_iter().next())
    }
}
