//! Generic resource framework.
//!
//! Every business resource (plans, add-ons, users, coupons, orders, settings) has
//! the same lifecycle: create, read, update, delete, list, plus a handful of
//! resource-specific actions. This module implements that lifecycle once.
//!
//! # Main Components
//!
//! - [`ActorEntity`] - Trait that resource types implement to be managed by actors
//! - [`ResourceActor`] - Generic actor that owns a resource store
//! - [`ResourceClient`] - Typed, cloneable handle for sending requests
//! - [`ActorClient`] - Shared CRUD methods for resource-specific clients
//! - [`FrameworkError`] - Plumbing errors plus the boxed entity error
//!
//! # Testing
//!
//! See [`mock`] for utilities to test clients and services without spawning actors.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod page;

pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response};
pub use page::{Page, PageRequest};
