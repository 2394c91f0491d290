//! # Settings Actor
//!
//! Per-tenant company settings.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::SettingsClient;
use crate::framework::ResourceActor;
use crate::model::Settings;

/// Creates a new Settings actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Settings>, SettingsClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, SettingsClient::new(generic_client))
}
