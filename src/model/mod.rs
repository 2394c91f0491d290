//! Pure data structures (entities and DTOs) implementing the
//! [`ActorEntity`](crate::framework::ActorEntity) trait.
//!
//! Money is always an integer amount of minor currency units (cents).

/// Declares a type-safe resource id wrapping the actor's `u32` counter.
macro_rules! resource_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            serde::Serialize,
            serde::Deserialize,
        )]
        pub struct $name(pub u32);

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, "_{}"), self.0)
            }
        }
    };
}

pub(crate) use resource_id;

pub mod addon;
pub mod coupon;
pub mod order;
pub mod plan;
pub mod settings;
pub mod user;

pub use addon::*;
pub use coupon::*;
pub use order::*;
pub use plan::*;
pub use settings::*;
pub use user::*;

/// Normalizes a free-form identifier (module name, coupon code, email) for
/// comparisons.
pub(crate) fn normalize_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}
