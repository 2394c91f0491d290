//! # Plan Actor
//!
//! Subscription plans. No dependencies (Context = ()).

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::PlanClient;
use crate::framework::ResourceActor;
use crate::model::Plan;

/// Creates a new Plan actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Plan>, PlanClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, PlanClient::new(generic_client))
}
