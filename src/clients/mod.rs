//! Type-safe wrappers around [`ResourceClient`](crate::framework::ResourceClient).
//!
//! Each client implements [`ActorClient`](crate::framework::ActorClient) for the
//! shared `get`/`fetch`/`delete`/`list` calls and adds resource-specific methods
//! that return the resource's own error type.

pub mod addon_client;
pub mod coupon_client;
pub mod order_client;
pub mod plan_client;
pub mod settings_client;
pub mod user_client;

pub use addon_client::*;
pub use coupon_client::*;
pub use order_client::*;
pub use plan_client::*;
pub use settings_client::*;
pub use user_client::*;
