//! # Actor Pool
//!
//! Recycles expensive-to-construct actors instead of building and destroying
//! them at high churn rates (projectiles, effects, transient actors).
//!
//! ## Features
//!
//! - **Typed Pools**: FIFO reuse of one actor type with on-demand growth
//! - **Tag Registry**: Many pools of different types behind one manager
//! - **Checked Release**: Foreign, stale and double releases are rejected
//! - **Deferred Activation**: Delayed spawns driven by an injectable clock
//! - **Config Presets**: Pool sizes loaded from TOML or RON
//!
//! ## Quick Start
//!
//! ```rust
//! use actor_pool::prelude::*;
//!
//! #[derive(Clone, Default)]
//! struct Bullet {
//!     damage: f32,
//! }
//!
//! impl Actor for Bullet {
//!     fn initialize_actor(&mut self) {
//!         self.damage = 10.0;
//!     }
//!
//!     fn reset_actor(&mut self) {
//!         self.damage = 0.0;
//!     }
//! }
//!
//! fn main() -> Result<(), PoolError> {
//!     let mut pools = PoolManager::default();
//!     pools.create_pool("Bullet", Bullet::default(), 10)?;
//!
//!     let bullet = pools.spawn_from_pool::<Bullet>("Bullet", Vec3::zeros(), Quat::identity())?;
//!     pools.release_to_pool("Bullet", bullet)?;
//!
//!     pools.dispose_all_pools();
//!     Ok(())
//! }
//! ```
//!
//! ## Threading
//!
//! Everything runs synchronously on the caller's thread. The manager is not
//! `Sync` and takes `&mut self`; share it across threads only behind a lock.

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod actor;
pub mod error;
pub mod pool;
pub mod scheduler;
pub mod manager;

#[cfg(test)]
mod tests;

pub use actor::{Actor, ActorState, PooledActor};
pub use error::{InstanceError, PoolError};
pub use manager::{ManagerStats, PoolManager};
pub use pool::{ActorPool, SpawnDomain};

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        Actor, ActorState, PooledActor,
        InstanceError, PoolError,
        ActorPool, SpawnDomain,
        ManagerStats, PoolManager,
        foundation::{
            collections::ActorHandle,
            math::{Vec3, Quat, Transform},
            time::{TimeSource, SystemClock, VirtualClock},
        },
        config::{Config, PoolingConfig},
    };
}
