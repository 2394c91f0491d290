//! # Tenant Suite
//!
//! > **A multi-tenant SaaS core: plans, modules, entitlements and billing.**
//!
//! Every resource (plans, add-on modules, users, coupons, orders, settings)
//! lives in its own actor built on one generic message loop. Services on top
//! coordinate the actors to answer the questions a tenant-facing platform
//! asks all day: which modules may this user open, may this company add
//! another staff member, what does this plan cost with this coupon.
//!
//! ## Core Concepts
//!
//! ### Resource actors
//! `ResourceActor<T: ActorEntity>` owns the state of one resource type and
//! processes requests sequentially. Creation, update and custom actions are
//! validated against a scratch copy, so a failed operation never leaves a
//! half-applied row. Uniqueness (plan names, module names, e-mails, coupon
//! codes) is enforced by the actor itself.
//!
//! ### Late-bound context
//! Dependencies are injected through `run()`, not at construction. The Order
//! actor receives the User and Plan clients this way and validates buyers
//! against them.
//!
//! ### Typed errors
//! Each actor has its own error enum; the framework error converts into it,
//! and services wrap actor errors with `#[from]`.
//!
//! ## Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! - **Key items**: [`ActorEntity`](framework::ActorEntity),
//!   [`ResourceActor`](framework::ResourceActor), [`mock`](framework::mock).
//!
//! ### 2. Resources ([`model`], [`plan_actor`], [`addon_actor`], [`user_actor`],
//! [`coupon_actor`], [`order_actor`], [`settings_actor`])
//! - **Role**: Plain data plus the `ActorEntity` implementations and actions.
//!
//! ### 3. The Interface ([`clients`])
//! - **Role**: Domain-specific wrappers around the generic `ResourceClient`.
//!
//! ### 4. Services ([`registry`], [`entitlement`], [`billing`])
//! - **Role**: Module discovery and enablement, module access and staff
//!   ceilings, pricing, coupons and bank-transfer orders.
//!
//! ### 5. The Orchestrator ([`lifecycle`], [`config`])
//! - **Key items**: [`Platform`](lifecycle::Platform),
//!   [`PlatformConfig`](config::PlatformConfig).
//!
//! ## Quick Start
//!
//! ```bash
//! RUST_LOG=info cargo run -- --packages ./packages
//! cargo test
//! ```

pub mod addon_actor;
pub mod billing;
pub mod clients;
pub mod config;
pub mod coupon_actor;
pub mod entitlement;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod order_actor;
pub mod plan_actor;
pub mod registry;
pub mod settings_actor;
pub mod user_actor;
