//! # Generic Actor Server
//!
//! [`ResourceActor`] owns the store for one resource type and processes requests
//! sequentially, so the store needs no locking.

use crate::framework::client::ResourceClient;
use crate::framework::entity::ActorEntity;
use crate::framework::error::FrameworkError;
use crate::framework::message::ResourceRequest;
use crate::framework::page::{Page, PageRequest};
use std::collections::BTreeMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The generic actor that manages a collection of entities.
///
/// # Concurrency Model
/// Each actor runs in its own Tokio task and handles one request at a time.
/// Many actors run in parallel, but a single store is only ever touched by its
/// own task.
///
/// # Usage Pattern
///
/// 1. **Create**: `ResourceActor::new()` returns the actor and its client.
/// 2. **Wire**: pass dependencies (other clients) into `actor.run(context)`.
/// 3. **Run**: spawn the run loop in a background task.
///
/// # Operations
///
/// * **Create**: next id from the counter, `from_create_params`, `on_create`,
///   uniqueness check, insert.
/// * **Get**: clone of the stored entity, or `None`.
/// * **Update** / **Action**: the hook runs on a copy; the copy replaces the
///   stored entity only if the hook and the uniqueness check pass.
/// * **Delete**: `on_delete`, then remove.
/// * **List**: entities matching the query, in ascending id order, paginated.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: BTreeMap<T::Id, T>,
    next_id: u32,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates a new `ResourceActor` and its associated `ResourceClient`.
    ///
    /// `buffer_size` is the channel capacity. When it is full, client calls wait.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size.max(1));
        let actor = Self {
            receiver,
            store: BTreeMap::new(),
            next_id: 1,
        };
        (actor, ResourceClient::new(sender))
    }

    /// Runs the event loop until every client has been dropped.
    pub async fn run(mut self, context: T::Context) {
        let entity_type = entity_type::<T>();
        info!(entity_type, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let result = self.create(params, &context).await;
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    debug!(entity_type, %id, found = item.is_some(), "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    let result = self.update(id, update, &context).await;
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Delete { id, respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    let result = self.delete(id, &context).await;
                    let _ = respond_to.send(result);
                }
                ResourceRequest::List {
                    query,
                    page,
                    respond_to,
                } => {
                    let result = self.list(&query, page);
                    debug!(entity_type, ?query, total = result.total, "List");
                    let _ = respond_to.send(Ok(result));
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?action, "Action");
                    let result = self.action(id, action, &context).await;
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }

    async fn create(
        &mut self,
        params: T::Create,
        context: &T::Context,
    ) -> Result<T::Id, FrameworkError> {
        let entity_type = entity_type::<T>();
        let id = T::Id::from(self.next_id);

        let mut item = T::from_create_params(id.clone(), params).map_err(|e| {
            warn!(entity_type, error = %e, "Create failed");
            FrameworkError::EntityError(Box::new(e))
        })?;
        if let Err(e) = item.on_create(context).await {
            warn!(entity_type, error = %e, "on_create failed");
            return Err(FrameworkError::EntityError(Box::new(e)));
        }
        self.ensure_unique(&item, None)?;

        self.next_id += 1;
        self.store.insert(id.clone(), item);
        info!(entity_type, %id, size = self.store.len(), "Created");
        Ok(id)
    }

    async fn update(
        &mut self,
        id: T::Id,
        update: T::Update,
        context: &T::Context,
    ) -> Result<T, FrameworkError> {
        let entity_type = entity_type::<T>();
        let mut item = self.stored(&id)?.clone();

        if let Err(e) = item.on_update(update, context).await {
            warn!(entity_type, %id, error = %e, "Update failed");
            return Err(FrameworkError::EntityError(Box::new(e)));
        }
        self.ensure_unique(&item, Some(&id))?;

        self.store.insert(id.clone(), item.clone());
        info!(entity_type, %id, "Updated");
        Ok(item)
    }

    async fn delete(&mut self, id: T::Id, context: &T::Context) -> Result<(), FrameworkError> {
        let entity_type = entity_type::<T>();
        let item = self.stored(&id)?;

        if let Err(e) = item.on_delete(context).await {
            warn!(entity_type, %id, error = %e, "on_delete failed");
            return Err(FrameworkError::EntityError(Box::new(e)));
        }

        self.store.remove(&id);
        info!(entity_type, %id, size = self.store.len(), "Deleted");
        Ok(())
    }

    async fn action(
        &mut self,
        id: T::Id,
        action: T::Action,
        context: &T::Context,
    ) -> Result<T::ActionResult, FrameworkError> {
        let entity_type = entity_type::<T>();
        let mut item = self.stored(&id)?.clone();

        let result = match item.handle_action(action, context).await {
            Ok(result) => result,
            Err(e) => {
                warn!(entity_type, %id, error = %e, "Action failed");
                return Err(FrameworkError::EntityError(Box::new(e)));
            }
        };
        self.ensure_unique(&item, Some(&id))?;

        self.store.insert(id.clone(), item);
        info!(entity_type, %id, "Action ok");
        Ok(result)
    }

    fn list(&self, query: &T::Query, page: PageRequest) -> Page<T> {
        let matching: Vec<&T> = self.store.values().filter(|item| item.matches(query)).collect();
        let total = matching.len();
        let items = page.slice(matching).into_iter().cloned().collect();
        Page {
            items,
            total,
            page: page.page.max(1),
            per_page: page.per_page,
        }
    }

    fn stored(&self, id: &T::Id) -> Result<&T, FrameworkError> {
        self.store.get(id).ok_or_else(|| {
            warn!(entity_type = entity_type::<T>(), %id, "Not found");
            FrameworkError::NotFound(id.to_string())
        })
    }

    /// Rejects `item` if another stored entity already holds its unique key.
    fn ensure_unique(&self, item: &T, own_id: Option<&T::Id>) -> Result<(), FrameworkError> {
        let Some(key) = item.unique_key() else {
            return Ok(());
        };
        let taken = self
            .store
            .iter()
            .any(|(id, other)| Some(id) != own_id && other.unique_key().as_deref() == Some(key.as_str()));
        if taken {
            warn!(entity_type = entity_type::<T>(), key = %key, "Duplicate");
            return Err(FrameworkError::Duplicate(key));
        }
        Ok(())
    }
}

/// Short type name for log fields ("Coupon" rather than the full module path).
fn entity_type<T>() -> &'static str {
    std::any::type_name::<T>()
        .split("::")
        .last()
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    #[derive(Clone, Debug, PartialEq)]
    struct Department {
        id: u32,
        name: String,
        headcount: u32,
        archived: bool,
    }

    #[derive(Debug)]
    struct DepartmentCreate {
        name: String,
    }

    #[derive(Debug)]
    struct DepartmentUpdate {
        name: Option<String>,
    }

    #[derive(Debug)]
    enum DepartmentAction {
        Hire(u32),
        Archive,
    }

    #[derive(Debug, Default)]
    struct DepartmentQuery {
        archived: Option<bool>,
    }

    #[derive(Debug, thiserror::Error)]
    enum DepartmentError {
        #[error("name is required")]
        NameRequired,
        #[error("department is archived")]
        Archived,
    }

    #[async_trait]
    impl ActorEntity for Department {
        type Id = u32;
        type Create = DepartmentCreate;
        type Update = DepartmentUpdate;
        type Action = DepartmentAction;
        type ActionResult = u32;
        type Query = DepartmentQuery;
        type Context = ();
        type Error = DepartmentError;

        fn from_create_params(id: u32, params: DepartmentCreate) -> Result<Self, Self::Error> {
            if params.name.trim().is_empty() {
                return Err(DepartmentError::NameRequired);
            }
            Ok(Self {
                id,
                name: params.name,
                headcount: 0,
                archived: false,
            })
        }

        async fn on_update(&mut self, update: DepartmentUpdate, _ctx: &()) -> Result<(), Self::Error> {
            if let Some(name) = update.name {
                self.name = name;
            }
            Ok(())
        }

        async fn handle_action(&mut self, action: DepartmentAction, _ctx: &()) -> Result<u32, Self::Error> {
            match action {
                DepartmentAction::Hire(n) => {
                    // Mutate first, fail after: the actor must discard the change.
                    self.headcount += n;
                    if self.archived {
                        return Err(DepartmentError::Archived);
                    }
                    Ok(self.headcount)
                }
                DepartmentAction::Archive => {
                    self.archived = true;
                    Ok(self.headcount)
                }
            }
        }

        fn matches(&self, query: &DepartmentQuery) -> bool {
            query.archived.map_or(true, |archived| self.archived == archived)
        }

        fn unique_key(&self) -> Option<String> {
            Some(self.name.to_lowercase())
        }
    }

    fn spawn() -> ResourceClient<Department> {
        let (actor, client) = ResourceActor::new(10);
        tokio::spawn(actor.run(()));
        client
    }

    #[tokio::test]
    async fn crud_and_actions() {
        let client = spawn();

        let id = client
            .create(DepartmentCreate { name: "Finance".into() })
            .await
            .unwrap();
        assert_eq!(id, 1);

        let headcount = client.perform_action(id, DepartmentAction::Hire(3)).await.unwrap();
        assert_eq!(headcount, 3);

        let renamed = client
            .update(id, DepartmentUpdate { name: Some("Accounting".into()) })
            .await
            .unwrap();
        assert_eq!(renamed.name, "Accounting");
        assert_eq!(renamed.headcount, 3);

        client.delete(id).await.unwrap();
        assert!(client.get(id).await.unwrap().is_none());
        assert!(matches!(client.delete(id).await, Err(FrameworkError::NotFound(_))));
    }

    #[tokio::test]
    async fn failed_action_leaves_state_untouched() {
        let client = spawn();
        let id = client.create(DepartmentCreate { name: "HR".into() }).await.unwrap();
        client.perform_action(id, DepartmentAction::Hire(2)).await.unwrap();
        client.perform_action(id, DepartmentAction::Archive).await.unwrap();

        let err = client.perform_action(id, DepartmentAction::Hire(5)).await.unwrap_err();
        assert!(matches!(
            err.downcast_entity::<DepartmentError>(),
            Ok(DepartmentError::Archived)
        ));

        let stored = client.get(id).await.unwrap().unwrap();
        assert_eq!(stored.headcount, 2);
    }

    #[tokio::test]
    async fn rejected_create_does_not_consume_an_id() {
        let client = spawn();
        assert!(client.create(DepartmentCreate { name: " ".into() }).await.is_err());
        let id = client.create(DepartmentCreate { name: "Sales".into() }).await.unwrap();
        assert_eq!(id, 1);
    }

    #[tokio::test]
    async fn unique_keys_are_enforced_on_create_and_update() {
        let client = spawn();
        client.create(DepartmentCreate { name: "Sales".into() }).await.unwrap();
        let other = client.create(DepartmentCreate { name: "Support".into() }).await.unwrap();

        let dup = client.create(DepartmentCreate { name: "SALES".into() }).await;
        assert!(matches!(dup, Err(FrameworkError::Duplicate(key)) if key == "sales"));

        let clash = client
            .update(other, DepartmentUpdate { name: Some("sales".into()) })
            .await;
        assert!(matches!(clash, Err(FrameworkError::Duplicate(_))));
        assert_eq!(client.get(other).await.unwrap().unwrap().name, "Support");

        // Re-saving an entity under its own key is fine.
        client
            .update(other, DepartmentUpdate { name: Some("Support".into()) })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn list_filters_and_paginates_in_id_order() {
        let client = spawn();
        for name in ["A", "B", "C", "D", "E"] {
            client.create(DepartmentCreate { name: name.into() }).await.unwrap();
        }
        client.perform_action(2, DepartmentAction::Archive).await.unwrap();

        let active = client
            .list(DepartmentQuery { archived: Some(false) }, PageRequest::new(1, 2))
            .await
            .unwrap();
        assert_eq!(active.total, 4);
        assert_eq!(active.last_page(), 2);
        let names: Vec<_> = active.items.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);

        let second = client
            .list(DepartmentQuery { archived: Some(false) }, PageRequest::new(2, 2))
            .await
            .unwrap();
        let names: Vec<_> = second.items.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["D", "E"]);

        let everything = client.list(DepartmentQuery::default(), PageRequest::all()).await.unwrap();
        assert_eq!(everything.items.len(), 5);
    }
}
