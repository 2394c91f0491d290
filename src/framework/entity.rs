//! # ActorEntity Trait
//!
//! The `ActorEntity` trait is the contract every resource (Plan, AddOn, User, Coupon,
//! Order, Settings) implements to be managed by the generic [`ResourceActor`](crate::framework::ResourceActor).
//! It names the id, DTO, action, query, context and error types of a resource and
//! provides the lifecycle hooks the actor calls while processing requests.
//!
//! # Provided Methods (Hooks)
//! - [`ActorEntity::on_create`]
//! - [`ActorEntity::on_delete`]
//! - [`ActorEntity::matches`]
//! - [`ActorEntity::unique_key`]
//!
//! The defaults accept everything. Override them to add validation, filtering or
//! uniqueness constraints.

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any resource entity must implement to be managed by `ResourceActor`.
///
/// # Async & Context
/// Hooks are async so they can call other actors. The `Context` type is injected
/// into every hook when the actor is started, not when it is constructed, so
/// resources can depend on each other without construction-order problems.
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// The unique identifier. Ids are generated from a `u32` counter and are
    /// kept in ascending order, which is also the listing order.
    type Id: Ord + Eq + Hash + Clone + Send + Sync + Display + Debug + From<u32>;

    /// The data required to create a new instance.
    type Create: Send + Sync + Debug;

    /// The data required to update an existing instance.
    type Update: Send + Sync + Debug;

    /// Resource-specific operations beyond CRUD (e.g. `Redeem`, `Approve`).
    type Action: Send + Sync + Debug;

    /// The result type returned by custom actions.
    type ActionResult: Send + Sync + Debug;

    /// Filter used by `List` requests.
    type Query: Send + Sync + Debug;

    /// Dependencies injected into the actor. Use `()` if none are needed.
    type Context: Send + Sync;

    /// One error enum per resource. It crosses the actor boundary boxed inside
    /// [`FrameworkError::EntityError`](crate::framework::FrameworkError::EntityError)
    /// and clients downcast it back.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Build the entity from its id and the create payload.
    /// Field validation belongs here.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    // --- Lifecycle Hooks (Async) ---

    /// Called after `from_create_params`, before the entity is stored.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Apply an update. The actor runs this on a copy and only stores the
    /// result when the hook succeeds.
    async fn on_update(
        &mut self,
        update: Self::Update,
        ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Called before the entity is removed. Returning an error vetoes the delete.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    // --- Action Handler (Async) ---

    /// Handle a resource-specific action. Like `on_update`, this runs on a copy
    /// that is committed only on success.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;

    // --- Query Support ---

    /// Whether this entity belongs in the result of a `List` request.
    fn matches(&self, _query: &Self::Query) -> bool {
        true
    }

    /// A key that must be unique across the store (an email, a coupon code, a
    /// module name). `None` opts out.
    fn unique_key(&self) -> Option<String> {
        None
    }
}
