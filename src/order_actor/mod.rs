//! # Order Actor
//!
//! Plan purchase orders. Depends on the User and Plan actors
//! (Context = `(UserClient, PlanClient)`), injected through `run`.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::OrderClient;
use crate::framework::ResourceActor;
use crate::model::Order;

/// Creates a new Order actor and its client.
///
/// The actor's dependencies are passed to `run`, not here.
pub fn new(buffer_size: usize) -> (ResourceActor<Order>, OrderClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, OrderClient::new(generic_client))
}
