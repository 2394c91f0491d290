//! # AddOn Actor
//!
//! The module registry table: one row per discovered package.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::AddOnClient;
use crate::framework::ResourceActor;
use crate::model::AddOn;

/// Creates a new AddOn actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<AddOn>, AddOnClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, AddOnClient::new(generic_client))
}
