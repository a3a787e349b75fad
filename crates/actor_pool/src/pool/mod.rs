//! Typed pools
//!
//! A pool recycles instances of exactly one actor type. See
//! [`generic_pool::ActorPool`].

pub mod generic_pool;
pub mod domain;
pub mod stats;

pub use generic_pool::{ActorPool, ActivationOutcome};
pub use domain::SpawnDomain;
pub use stats::PoolStats;
