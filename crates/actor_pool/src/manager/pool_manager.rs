//! Actor Pool Manager
//!
//! Tag-addressed front end over many typed [`ActorPool`]s. Callers create a
//! pool per tag, spawn and release through the tag, and drive deferred
//! activations by calling [`PoolManager::update`] once per frame.
//!
//! # Error Handling
//!
//! Every failed create, spawn, release or resize request is logged at error
//! level, counted in [`ManagerStats::failed_requests`] and returned as a
//! [`PoolError`]. A failed request never changes any pool. Callers that only
//! care whether an instance was spawned can use `.ok()`.
//!
//! Lookups ([`PoolManager::actor`], [`PoolManager::pool`] and friends) only
//! return the error; they are queries, not requests.
//!
//! # Usage
//!
//! ```rust
//! use actor_pool::prelude::*;
//!
//! #[derive(Clone, Default)]
//! struct Bullet;
//!
//! impl Actor for Bullet {
//!     fn initialize_actor(&mut self) {}
//!     fn reset_actor(&mut self) {}
//! }
//!
//! let (mut manager, clock) = PoolManager::with_virtual_clock();
//! manager.create_pool("Bullet", Bullet, 10).unwrap();
//!
//! let bullet = manager
//!     .spawn_from_pool_delayed::<Bullet>("Bullet", Vec3::zeros(), Quat::identity(), 2.0)
//!     .unwrap();
//! assert!(!manager.actor("Bullet", bullet).unwrap().is_active());
//!
//! clock.advance_secs(2.0);
//! manager.update();
//! assert!(manager.actor("Bullet", bullet).unwrap().is_active());
//!
//! manager.release_to_pool("Bullet", bullet).unwrap();
//! ```

use crate::actor::{Actor, PooledActor};
use crate::config::PoolingConfig;
use crate::error::PoolError;
use crate::foundation::collections::ActorHandle;
use crate::foundation::math::{Quat, Transform, Vec3};
use crate::foundation::time::{SystemClock, TimeSource, VirtualClock};
use crate::manager::registry::{ErasedPool, PoolRegistry};
use crate::pool::{ActivationOutcome, ActorPool, SpawnDomain};
use crate::scheduler::{ActivationScheduler, DeferredActivation};
use std::time::Duration;

/// Statistics for the pool manager
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManagerStats {
    /// Pools created since construction
    pub pools_created: u64,
    /// Pools disposed since construction
    pub pools_disposed: u64,
    /// Successful spawns
    pub total_spawned: u64,
    /// Successful releases
    pub total_released: u64,
    /// Spawns that deferred their activation
    pub deferred_scheduled: u64,
    /// Deferred activations that made their instance visible
    pub deferred_fired: u64,
    /// Deferred activations whose target was gone or released
    pub deferred_skipped: u64,
    /// Requests rejected with a [`PoolError`]
    pub failed_requests: u64,
}

/// Registry of tag-addressed actor pools
pub struct PoolManager {
    registry: PoolRegistry,
    scheduler: ActivationScheduler,
    stats: ManagerStats,
}

impl Default for PoolManager {
    fn default() -> Self {
        Self::new(SystemClock::new())
    }
}

impl PoolManager {
    /// Create a manager whose deferred activations follow `clock`
    pub fn new(clock: impl TimeSource + 'static) -> Self {
        Self {
            registry: PoolRegistry::new(),
            scheduler: ActivationScheduler::new(clock),
            stats: ManagerStats::default(),
        }
    }

    /// Create a manager on a manually advanced clock
    ///
    /// The returned clock shares time with the manager.
    pub fn with_virtual_clock() -> (Self, VirtualClock) {
        let clock = VirtualClock::new();
        (Self::new(clock.clone()), clock)
    }

    /// Create a pool of `size` clones of `prototype` under `tag`
    ///
    /// The pool gets its own spawn domain named `"{tag} Parent"` at the
    /// origin. Fails with [`PoolError::DuplicateTag`] if the tag is taken.
    pub fn create_pool<T: Actor + Clone>(
        &mut self,
        tag: &str,
        prototype: T,
        size: usize,
    ) -> Result<(), PoolError> {
        if self.registry.contains(tag) {
            return Err(self.report(PoolError::DuplicateTag { tag: tag.to_string() }));
        }

        let domain = SpawnDomain::at_origin(format!("{tag} Parent"));
        let pool = ActorPool::new(move || prototype.clone(), domain, size);

        if let Err(err) = self.registry.insert(tag, pool) {
            return Err(self.report(err));
        }

        self.stats.pools_created += 1;
        log::info!("Created pool '{}' with {} instances", tag, size);
        Ok(())
    }

    /// Create a pool sized from `config`'s preset for `tag`
    pub fn create_pool_from_config<T: Actor + Clone>(
        &mut self,
        tag: &str,
        prototype: T,
        config: &PoolingConfig,
    ) -> Result<(), PoolError> {
        self.create_pool(tag, prototype, config.initial_size(tag))
    }

    /// Spawn an instance from `tag`'s pool at the given placement
    pub fn spawn_from_pool<T: Actor>(
        &mut self,
        tag: &str,
        position: Vec3,
        rotation: Quat,
    ) -> Result<ActorHandle<T>, PoolError> {
        self.spawn_from_pool_delayed(tag, position, rotation, 0.0)
    }

    /// Spawn an instance whose placement and activation wait `delay` seconds
    ///
    /// With `delay <= 0` the instance is placed and active on return.
    /// Otherwise it is returned inactive and becomes active from the first
    /// [`Self::update`] at or after the delay. A delay too long for
    /// [`Duration`] never comes due. The call never blocks.
    pub fn spawn_from_pool_delayed<T: Actor>(
        &mut self,
        tag: &str,
        position: Vec3,
        rotation: Quat,
        delay: f32,
    ) -> Result<ActorHandle<T>, PoolError> {
        let pool = match self.registry.get_mut::<T>(tag) {
            Ok(pool) => pool,
            Err(err) => return Err(self.report(err)),
        };

        let transform = Transform::from_position_rotation(position, rotation);
        let deferral = deferral_from_secs(tag, delay);
        let pool_id = pool.id();
        let handle = pool.get();
        let staged = match deferral {
            None => pool.place(handle, transform),
            Some(_) => pool.suspend(handle),
        };
        if let Err(err) = staged {
            return Err(self.report(PoolError::from_instance(tag, err)));
        }

        if let Some(delay) = deferral {
            self.scheduler.schedule(
                delay,
                DeferredActivation {
                    tag: tag.to_string(),
                    pool: pool_id,
                    key: handle.key(),
                    generation: handle.generation(),
                    transform,
                    due: Duration::ZERO,
                },
            );
            self.stats.deferred_scheduled += 1;
            log::debug!("Spawned from '{}' with activation deferred by {:?}", tag, delay);
        } else {
            log::debug!("Spawned from '{}' at {:?}", tag, position);
        }

        self.stats.total_spawned += 1;
        Ok(handle)
    }

    /// Return a spawned instance to `tag`'s pool
    ///
    /// Rejects instances that were not spawned from this pool, are already
    /// pooled, or have been destroyed.
    pub fn release_to_pool<T: Actor>(
        &mut self,
        tag: &str,
        handle: ActorHandle<T>,
    ) -> Result<(), PoolError> {
        let pool = match self.registry.get_mut::<T>(tag) {
            Ok(pool) => pool,
            Err(err) => return Err(self.report(err)),
        };

        if let Err(err) = pool.release(handle) {
            return Err(self.report(PoolError::from_instance(tag, err)));
        }

        self.stats.total_released += 1;
        log::trace!("Released instance to '{}'", tag);
        Ok(())
    }

    /// Grow or shrink `tag`'s queue to exactly `new_size` pooled instances
    pub fn adjust_pool_size<T: Actor>(&mut self, tag: &str, new_size: usize) -> Result<(), PoolError> {
        match self.registry.get_mut::<T>(tag) {
            Ok(pool) => {
                pool.adjust_pool_size(new_size);
                Ok(())
            }
            Err(err) => Err(self.report(err)),
        }
    }

    /// Dispose and deregister the pool under `tag`
    ///
    /// Returns `false` without reporting an error if no such pool exists.
    /// Instances still checked out from the pool are destroyed with it.
    pub fn dispose_pool(&mut self, tag: &str) -> bool {
        let Some(mut pool) = self.registry.remove(tag) else {
            log::debug!("No pool '{}' to dispose", tag);
            return false;
        };

        self.teardown(tag, pool.as_mut());
        true
    }

    /// Dispose every pool and clear the registry
    ///
    /// Pending deferred activations are discarded and counted as skipped.
    pub fn dispose_all_pools(&mut self) {
        let pools: Vec<_> = self.registry.drain().collect();
        for (tag, mut pool) in pools {
            self.teardown(&tag, pool.as_mut());
        }

        let discarded = self.scheduler.clear();
        if discarded > 0 {
            self.stats.deferred_skipped += discarded as u64;
            log::debug!("Discarded {} pending activations", discarded);
        }
    }

    /// Fire every deferred activation that is due
    ///
    /// Returns the number of instances that became active. Activations whose
    /// instance was released, destroyed or whose pool was disposed are
    /// skipped.
    pub fn update(&mut self) -> usize {
        let mut activated = 0;

        for activation in self.scheduler.take_due() {
            let outcome = match self.registry.get_erased_mut(&activation.tag) {
                Some(pool) if pool.pool_id() == activation.pool => pool.complete_activation(&activation),
                _ => ActivationOutcome::InstanceGone,
            };

            if outcome == ActivationOutcome::Activated {
                activated += 1;
                self.stats.deferred_fired += 1;
            } else {
                self.stats.deferred_skipped += 1;
                log::warn!("Skipped deferred activation for '{}': {:?}", activation.tag, outcome);
            }
        }

        activated
    }

    /// Look up a spawned instance
    pub fn actor<T: Actor>(&self, tag: &str, handle: ActorHandle<T>) -> Result<&PooledActor<T>, PoolError> {
        let pool = self.registry.get::<T>(tag)?;
        if handle.pool() != pool.id() {
            return Err(PoolError::ForeignInstance { tag: tag.to_string() });
        }
        pool.instance(handle)
            .ok_or_else(|| PoolError::StaleHandle { tag: tag.to_string() })
    }

    /// Mutable lookup of a spawned instance
    pub fn actor_mut<T: Actor>(
        &mut self,
        tag: &str,
        handle: ActorHandle<T>,
    ) -> Result<&mut PooledActor<T>, PoolError> {
        let pool = self.registry.get_mut::<T>(tag)?;
        if handle.pool() != pool.id() {
            return Err(PoolError::ForeignInstance { tag: tag.to_string() });
        }
        pool.instance_mut(handle)
            .ok_or_else(|| PoolError::StaleHandle { tag: tag.to_string() })
    }

    /// Typed access to the pool under `tag`
    pub fn pool<T: Actor>(&self, tag: &str) -> Result<&ActorPool<T>, PoolError> {
        self.registry.get(tag)
    }

    /// Whether a pool is registered under `tag`
    pub fn has_pool(&self, tag: &str) -> bool {
        self.registry.contains(tag)
    }

    /// Registered tags, in no particular order
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.registry.tags()
    }

    /// Number of registered pools
    pub fn pool_count(&self) -> usize {
        self.registry.len()
    }

    /// Queued instances in `tag`'s pool
    pub fn pooled_count(&self, tag: &str) -> Option<usize> {
        self.registry.get_erased(tag).map(|pool| pool.pooled_count())
    }

    /// Checked-out instances in `tag`'s pool
    pub fn active_count(&self, tag: &str) -> Option<usize> {
        self.registry.get_erased(tag).map(|pool| pool.active_count())
    }

    /// Deferred activations that have not fired yet
    pub fn pending_activations(&self) -> usize {
        self.scheduler.pending_count()
    }

    /// Current time of the manager's clock
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    /// Manager statistics
    pub fn stats(&self) -> &ManagerStats {
        &self.stats
    }

    fn teardown(&mut self, tag: &str, pool: &mut dyn ErasedPool) {
        let pooled = pool.pooled_count();
        let checked_out = pool.teardown();
        if checked_out > 0 {
            log::warn!(
                "Disposed pool '{}' with {} instances still checked out; their handles are now stale",
                tag,
                checked_out
            );
        }
        self.stats.pools_disposed += 1;
        log::info!("Disposed pool '{}' ({} pooled instances destroyed)", tag, pooled);
    }

    fn report(&mut self, err: PoolError) -> PoolError {
        self.stats.failed_requests += 1;
        log::error!("{}", err);
        err
    }
}

/// Convert a spawn delay in seconds into a deferral, if any
fn deferral_from_secs(tag: &str, delay: f32) -> Option<Duration> {
    if delay.is_nan() || delay <= 0.0 {
        if delay.is_nan() {
            log::warn!("NaN spawn delay for '{}', activating immediately", tag);
        }
        return None;
    }

    match Duration::try_from_secs_f32(delay) {
        Ok(duration) => Some(duration),
        Err(_) => {
            log::warn!("Spawn delay {} for '{}' is out of range, it will never come due", delay, tag);
            Some(Duration::MAX)
        }
    }
}
