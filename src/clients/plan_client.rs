use crate::framework::{ActorClient, PageRequest, ResourceClient};
use crate::model::{Plan, PlanCreate, PlanId, PlanQuery, PlanStatus, PlanUpdate};
use crate::plan_actor::{PlanAction, PlanError};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the Plan actor.
#[derive(Clone)]
pub struct PlanClient {
    inner: ResourceClient<Plan>,
}

impl PlanClient {
    pub fn new(inner: ResourceClient<Plan>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<Plan> for PlanClient {
    type Error = PlanError;

    fn inner(&self) -> &ResourceClient<Plan> {
        &self.inner
    }
}

impl PlanClient {
    #[instrument(skip(self))]
    pub async fn create_plan(&self, params: PlanCreate) -> Result<PlanId, PlanError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(PlanError::from)
    }

    #[instrument(skip(self))]
    pub async fn update_plan(&self, id: PlanId, update: PlanUpdate) -> Result<Plan, PlanError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(PlanError::from)
    }

    /// Moves a plan to `status`. Leaving `Deleted` fails with [`PlanError::Deleted`].
    #[instrument(skip(self))]
    pub async fn set_status(&self, id: PlanId, status: PlanStatus) -> Result<Plan, PlanError> {
        debug!("Sending request");
        self.inner
            .perform_action(id, PlanAction::SetStatus(status))
            .await
            .map_err(PlanError::from)
    }

    /// Looks a plan up by name, case-insensitively. Deleted plans are skipped.
    #[instrument(skip(self))]
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Plan>, PlanError> {
        let page = self
            .inner
            .list(PlanQuery::named(name), PageRequest::all())
            .await
            .map_err(PlanError::from)?;
        Ok(page
            .items
            .into_iter()
            .find(|plan| plan.status != PlanStatus::Deleted))
    }

    /// Plans that can currently be bought or assigned.
    #[instrument(skip(self))]
    pub async fn active_plans(&self) -> Result<Vec<Plan>, PlanError> {
        let page = self
            .inner
            .list(PlanQuery::active(), PageRequest::all())
            .await
            .map_err(PlanError::from)?;
        Ok(page.items)
    }
}
