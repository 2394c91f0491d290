//! # Mock Framework
//!
//! Utilities for testing clients and services without spawning real actors.
//!
//! | Feature | MockClient | Real Actor |
//! |---------|------------|------------|
//! | **State** | Scripted replies | Real store |
//! | **Use Case** | Logic *around* the client | The actor itself or the full platform |
//! | **Error Injection** | `return_err` | Needs the right state |
//!
//! Two styles are available:
//!
//! - [`MockClient`]: queue expectations with a fluent API, hand out
//!   `mock.client()`, then call [`MockClient::verify`].
//! - [`create_mock_client`] plus the `expect_*` helpers: receive the raw request
//!   and answer it yourself, which lets the test inspect the payload.
//!
//! ```rust
//! use tenant_suite::framework::mock::MockClient;
//! use tenant_suite::framework::FrameworkError;
//! use tenant_suite::model::{Plan, PlanId};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockClient::<Plan>::new();
//!     mock.expect_get(PlanId(1)).return_err(FrameworkError::ActorClosed);
//!
//!     let result = mock.client().get(PlanId(1)).await;
//!     assert!(matches!(result, Err(FrameworkError::ActorClosed)));
//!     mock.verify();
//! }
//! ```

use crate::framework::client::ResourceClient;
use crate::framework::entity::ActorEntity;
use crate::framework::error::FrameworkError;
use crate::framework::message::ResourceRequest;
use crate::framework::page::Page;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{mpsc, oneshot};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// A scripted reply for the next request of a given kind.
enum Expectation<T: ActorEntity> {
    Get(Result<Option<T>, FrameworkError>),
    Create(Result<T::Id, FrameworkError>),
    Update(Result<T, FrameworkError>),
    Delete(Result<(), FrameworkError>),
    List(Result<Page<T>, FrameworkError>),
    Action(Result<T::ActionResult, FrameworkError>),
}

impl<T: ActorEntity> Expectation<T> {
    fn kind(&self) -> &'static str {
        match self {
            Expectation::Get(_) => "Get",
            Expectation::Create(_) => "Create",
            Expectation::Update(_) => "Update",
            Expectation::Delete(_) => "Delete",
            Expectation::List(_) => "List",
            Expectation::Action(_) => "Action",
        }
    }
}

type Queue<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

fn lock<T: ActorEntity>(queue: &Queue<T>) -> MutexGuard<'_, VecDeque<Expectation<T>>> {
    queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A mock client with expectation tracking for fluent testing.
///
/// Requests are answered strictly in the order expectations were queued. A
/// request of the wrong kind panics the mock task, which the caller observes as
/// `FrameworkError::ActorDropped`; `verify` then reports the leftover
/// expectations.
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    expectations: Queue<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a new mock client with no expectations.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let expectations: Queue<T> = Arc::new(Mutex::new(VecDeque::new()));
        let queue = expectations.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = lock(&queue).pop_front();

                match (request, expectation) {
                    (ResourceRequest::Get { respond_to, .. }, Some(Expectation::Get(response))) => {
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::Create { respond_to, .. }, Some(Expectation::Create(response))) => {
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::Update { respond_to, .. }, Some(Expectation::Update(response))) => {
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::Delete { respond_to, .. }, Some(Expectation::Delete(response))) => {
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::List { respond_to, .. }, Some(Expectation::List(response))) => {
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::Action { respond_to, .. }, Some(Expectation::Action(response))) => {
                        let _ = respond_to.send(response);
                    }
                    (request, expectation) => {
                        panic!(
                            "Unexpected {} request, expected {}",
                            request.kind(),
                            expectation.as_ref().map_or("nothing", Expectation::kind)
                        );
                    }
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    /// Expects a `get` operation.
    pub fn expect_get(&mut self, _id: T::Id) -> ExpectationBuilder<T, Option<T>> {
        self.builder(Expectation::Get)
    }

    /// Expects a `create` operation.
    pub fn expect_create(&mut self) -> ExpectationBuilder<T, T::Id> {
        self.builder(Expectation::Create)
    }

    /// Expects an `update` operation.
    pub fn expect_update(&mut self, _id: T::Id) -> ExpectationBuilder<T, T> {
        self.builder(Expectation::Update)
    }

    /// Expects a `delete` operation.
    pub fn expect_delete(&mut self, _id: T::Id) -> ExpectationBuilder<T, ()> {
        self.builder(Expectation::Delete)
    }

    /// Expects a `list` operation.
    pub fn expect_list(&mut self) -> ExpectationBuilder<T, Page<T>> {
        self.builder(Expectation::List)
    }

    /// Expects an `action` operation.
    pub fn expect_action(&mut self, _id: T::Id) -> ExpectationBuilder<T, T::ActionResult> {
        self.builder(Expectation::Action)
    }

    fn builder<R>(
        &self,
        wrap: fn(Result<R, FrameworkError>) -> Expectation<T>,
    ) -> ExpectationBuilder<T, R> {
        ExpectationBuilder {
            wrap,
            expectations: self.expectations.clone(),
        }
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let remaining = lock(&self.expectations);
        if !remaining.is_empty() {
            let kinds: Vec<_> = remaining.iter().map(Expectation::kind).collect();
            panic!("Not all expectations were met. {} remaining: {:?}", kinds.len(), kinds);
        }
    }
}

/// Queues the reply for one expected request.
pub struct ExpectationBuilder<T: ActorEntity, R> {
    wrap: fn(Result<R, FrameworkError>) -> Expectation<T>,
    expectations: Queue<T>,
}

impl<T: ActorEntity, R> ExpectationBuilder<T, R> {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: R) {
        lock(&self.expectations).push_back((self.wrap)(Ok(value)));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FrameworkError) {
        lock(&self.expectations).push_back((self.wrap)(Err(error)));
    }
}

// =============================================================================
// RECEIVER HELPERS
// =============================================================================

/// Creates a client whose requests land on a receiver the test controls.
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Create request.
pub async fn expect_create<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Create, oneshot::Sender<Result<T::Id, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Get request.
pub async fn expect_get<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, oneshot::Sender<Result<Option<T>, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a List request.
pub async fn expect_list<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Query, oneshot::Sender<Result<Page<T>, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::List {
            query, respond_to, ..
        }) => Some((query, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Action request.
pub async fn expect_action<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(
    T::Id,
    T::Action,
    oneshot::Sender<Result<T::ActionResult, FrameworkError>>,
)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action {
            id,
            action,
            respond_to,
        }) => Some((id, action, respond_to)),
        _ => None,
    }
}

/// Wraps `items` in a single page, for `expect_list` replies.
pub fn page_of<T>(items: Vec<T>) -> Page<T> {
    Page {
        total: items.len(),
        items,
        page: 1,
        per_page: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::PageRequest;
    use crate::model::{Settings, SettingsCreate, SettingsId, SettingsQuery, UserId};

    fn settings(id: u32, tenant: u32) -> Settings {
        Settings {
            id: SettingsId(id),
            tenant: UserId(tenant),
            values: Default::default(),
        }
    }

    #[tokio::test]
    async fn receiver_helpers_expose_the_payload() {
        let (client, mut receiver) = create_mock_client::<Settings>(10);

        let create_task = tokio::spawn(async move {
            client.create(SettingsCreate { tenant: UserId(4) }).await
        });

        let (payload, responder) = expect_create(&mut receiver)
            .await
            .expect("Expected Create request");
        assert_eq!(payload.tenant, UserId(4));
        responder.send(Ok(SettingsId(1))).unwrap();

        assert_eq!(create_task.await.unwrap().unwrap(), SettingsId(1));
    }

    #[tokio::test]
    async fn fluent_expectations_are_answered_in_order() {
        let mut mock = MockClient::<Settings>::new();
        mock.expect_create().return_ok(SettingsId(1));
        mock.expect_get(SettingsId(1)).return_ok(Some(settings(1, 4)));
        mock.expect_list().return_ok(page_of(vec![settings(1, 4)]));
        mock.expect_delete(SettingsId(1)).return_err(FrameworkError::NotFound("settings_1".into()));

        let client = mock.client();
        let id = client.create(SettingsCreate { tenant: UserId(4) }).await.unwrap();
        assert_eq!(id, SettingsId(1));

        let fetched = client.get(id).await.unwrap().unwrap();
        assert_eq!(fetched.tenant, UserId(4));

        let page = client
            .list(SettingsQuery { tenant: Some(UserId(4)) }, PageRequest::all())
            .await
            .unwrap();
        assert_eq!(page.total, 1);

        assert!(matches!(client.delete(id).await, Err(FrameworkError::NotFound(_))));
        mock.verify();
    }

    #[tokio::test]
    #[should_panic(expected = "Not all expectations were met")]
    async fn verify_reports_unused_expectations() {
        let mut mock = MockClient::<Settings>::new();
        mock.expect_get(SettingsId(1)).return_ok(None);
        mock.verify();
    }
}
