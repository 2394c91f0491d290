use crate::addon_actor::{AddOnAction, AddOnError};
use crate::framework::{ActorClient, PageRequest, ResourceClient};
use crate::model::{AddOn, AddOnCreate, AddOnId, AddOnQuery, AddOnUpdate};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the AddOn actor.
#[derive(Clone)]
pub struct AddOnClient {
    inner: ResourceClient<AddOn>,
}

impl AddOnClient {
    pub fn new(inner: ResourceClient<AddOn>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<AddOn> for AddOnClient {
    type Error = AddOnError;

    fn inner(&self) -> &ResourceClient<AddOn> {
        &self.inner
    }
}

impl AddOnClient {
    #[instrument(skip(self))]
    pub async fn register(&self, params: AddOnCreate) -> Result<AddOnId, AddOnError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(AddOnError::from)
    }

    #[instrument(skip(self))]
    pub async fn refresh(&self, id: AddOnId, update: AddOnUpdate) -> Result<AddOn, AddOnError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(AddOnError::from)
    }

    /// Returns `true` if the module was disabled before.
    #[instrument(skip(self))]
    pub async fn enable(&self, id: AddOnId) -> Result<bool, AddOnError> {
        self.inner
            .perform_action(id, AddOnAction::Enable)
            .await
            .map_err(AddOnError::from)
    }

    /// Returns `true` if the module was enabled before.
    #[instrument(skip(self))]
    pub async fn disable(&self, id: AddOnId) -> Result<bool, AddOnError> {
        self.inner
            .perform_action(id, AddOnAction::Disable)
            .await
            .map_err(AddOnError::from)
    }

    async fn query(&self, query: AddOnQuery) -> Result<Vec<AddOn>, AddOnError> {
        let page = self
            .inner
            .list(query, PageRequest::all())
            .await
            .map_err(AddOnError::from)?;
        Ok(page.items)
    }

    /// Looks a module up by name, case-insensitively.
    #[instrument(skip(self))]
    pub async fn find(&self, module: &str) -> Result<Option<AddOn>, AddOnError> {
        Ok(self.query(AddOnQuery::module(module)).await?.into_iter().next())
    }

    pub async fn all(&self) -> Result<Vec<AddOn>, AddOnError> {
        self.query(AddOnQuery::default()).await
    }

    pub async fn enabled(&self) -> Result<Vec<AddOn>, AddOnError> {
        self.query(AddOnQuery::enabled()).await
    }

    pub async fn children_of(&self, module: &str) -> Result<Vec<AddOn>, AddOnError> {
        self.query(AddOnQuery::children_of(module)).await
    }
}
