//! # Observability & Tracing
//!
//! Structured logging for the whole platform, built on `tracing`.
//!
//! Every actor logs with an `entity_type` field and the entity id, so a
//! compact line is enough to follow a request:
//!
//! ```text
//! INFO Created entity_type="User" id=user_1 size=1
//! INFO Action ok entity_type="Coupon" id=coupon_1
//! INFO Plan assigned tenant=user_1 plan=plan_2 enabled_staff=2 disabled_staff=1
//! ```
//!
//! ## Configuration
//!
//! `RUST_LOG` wins when set. Otherwise the level is `info`, or `debug` with
//! `--verbose`, which also prints the full payload of every request.
//!
//! ```bash
//! RUST_LOG=tenant_suite::framework=debug cargo run
//! ```

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Later calls are no-ops.
pub fn setup_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false) // entity_type already says where a line comes from
        .compact()
        .try_init();
}
