//! # ActorClient Trait
//!
//! Resource-specific clients (e.g. `PlanClient`) wrap a [`ResourceClient`] and
//! implement this trait to inherit `get`, `fetch`, `delete` and `list` with their
//! own error type.

use crate::framework::{ActorEntity, FrameworkError, Page, PageRequest, ResourceClient};
use async_trait::async_trait;

/// Trait for resource-specific clients to inherit standard CRUD operations.
#[async_trait]
pub trait ActorClient<T: ActorEntity>: Send + Sync {
    /// The resource-specific error type.
    type Error: From<FrameworkError> + Send + Sync;

    /// Access the inner generic ResourceClient.
    fn inner(&self) -> &ResourceClient<T>;

    /// Map framework errors to the resource error type.
    fn map_error(e: FrameworkError) -> Self::Error {
        From::from(e)
    }

    /// Fetch an entity by ID.
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }

    /// Fetch an entity by ID, treating a missing entity as `NotFound`.
    #[tracing::instrument(skip(self))]
    async fn fetch(&self, id: T::Id) -> Result<T, Self::Error> {
        let key = id.to_string();
        match self.inner().get(id).await {
            Ok(Some(item)) => Ok(item),
            Ok(None) => Err(Self::map_error(FrameworkError::NotFound(key))),
            Err(e) => Err(Self::map_error(e)),
        }
    }

    /// Delete an entity by ID.
    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: T::Id) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.inner().delete(id).await.map_err(Self::map_error)
    }

    /// List entities matching `query`.
    #[tracing::instrument(skip(self))]
    async fn list(&self, query: T::Query, page: PageRequest) -> Result<Page<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().list(query, page).await.map_err(Self::map_error)
    }
}
