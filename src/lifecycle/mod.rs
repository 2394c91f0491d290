//! Orchestration: starting the actors, wiring their dependencies, and
//! shutting them down.

pub mod clock;
pub mod platform;
pub mod tracing;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::platform::Platform;
pub use self::tracing::setup_tracing;
