//! Typed Actor Pool
//!
//! Recycles instances of one concrete actor type. The pool owns every
//! instance it has built; callers address checked-out instances through
//! [`ActorHandle`]s.
//!
//! # Architecture
//!
//! ```text
//! ActorPool<T>
//!     ├── instances  (SlotMap: every live instance, pooled or checked out)
//!     ├── available  (FIFO of keys whose instance is pooled)
//!     ├── factory    (builds a new T on demand)
//!     └── domain     (spawn domain the instances are parented under)
//! ```
//!
//! # Usage
//!
//! ```rust
//! use actor_pool::prelude::*;
//!
//! #[derive(Clone, Default)]
//! struct Spark;
//!
//! impl Actor for Spark {
//!     fn initialize_actor(&mut self) {}
//!     fn reset_actor(&mut self) {}
//! }
//!
//! let mut pool = ActorPool::new(Spark::default, SpawnDomain::at_origin("Spark Parent"), 4);
//! let handle = pool.get();
//! assert_eq!(pool.pooled_count(), 3);
//!
//! pool.release(handle).unwrap();
//! assert_eq!(pool.pooled_count(), 4);
//! ```

use crate::actor::{Actor, ActorState, PooledActor};
use crate::error::InstanceError;
use crate::foundation::collections::{ActorHandle, InstanceKey, InstanceMap, PoolId};
use crate::foundation::math::Transform;
use crate::pool::{PoolStats, SpawnDomain};
use std::collections::VecDeque;

/// Result of firing a deferred activation against a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationOutcome {
    /// The instance was placed and made visible
    Activated,
    /// The instance was destroyed before the activation fired
    InstanceGone,
    /// The instance was released (and possibly re-spawned) in the meantime
    Superseded,
}

/// Pool of recyclable instances of one actor type
pub struct ActorPool<T: Actor> {
    id: PoolId,
    instances: InstanceMap<PooledActor<T>>,
    available: VecDeque<InstanceKey>,
    factory: Box<dyn FnMut() -> T>,
    domain: SpawnDomain,
    stats: PoolStats,
}

impl<T: Actor> ActorPool<T> {
    /// Create a pool pre-filled with `initial_size` deactivated instances
    ///
    /// Instances are attached to `domain` and left uninitialized until their
    /// first checkout.
    pub fn new(
        factory: impl FnMut() -> T + 'static,
        domain: SpawnDomain,
        initial_size: usize,
    ) -> Self {
        let mut pool = Self {
            id: PoolId::next(),
            instances: InstanceMap::with_capacity_and_key(initial_size),
            available: VecDeque::with_capacity(initial_size),
            factory: Box::new(factory),
            domain,
            stats: PoolStats::default(),
        };

        for _ in 0..initial_size {
            let key = pool.build_instance();
            pool.available.push_back(key);
        }

        log::debug!(
            "Created {} with {} pooled instances under '{}'",
            pool.id,
            initial_size,
            pool.domain.name()
        );
        pool
    }

    /// Check out an instance, building a new one if the queue is empty
    ///
    /// The returned instance is active and has been initialized.
    pub fn get(&mut self) -> ActorHandle<T> {
        let key = if let Some(key) = self.available.pop_front() {
            self.stats.reused += 1;
            key
        } else {
            self.stats.grown += 1;
            log::trace!("{} empty, growing", self.id);
            self.build_instance()
        };

        // Keys in `available` always point at live instances.
        let generation = self.instances[key].check_out();
        ActorHandle::new(self.id, key, generation)
    }

    /// Reset an instance and queue it for reuse
    ///
    /// Fails without touching the queue when the handle was issued by another
    /// pool, the instance is already pooled, or the handle is stale.
    pub fn release(&mut self, handle: ActorHandle<T>) -> Result<(), InstanceError> {
        let instance = self.checked_out_mut(handle)?;
        instance.check_in();
        self.available.push_back(handle.key());
        self.stats.released += 1;
        Ok(())
    }

    /// Grow or shrink the queue to exactly `new_size` pooled instances
    ///
    /// Shrinking destroys queued instances. Checked-out instances are never
    /// recalled.
    pub fn adjust_pool_size(&mut self, new_size: usize) {
        let before = self.available.len();

        while self.available.len() > new_size {
            if let Some(key) = self.available.pop_front() {
                self.destroy_instance(key);
            }
        }

        while self.available.len() < new_size {
            let key = self.build_instance();
            self.instances[key].check_in();
            self.available.push_back(key);
        }

        log::debug!("{} resized from {} to {} pooled instances", self.id, before, new_size);
    }

    /// Destroy every pooled instance
    ///
    /// Checked-out instances stay alive and can still be released back.
    pub fn dispose(&mut self) {
        let count = self.available.len();
        while let Some(key) = self.available.pop_front() {
            self.destroy_instance(key);
        }
        log::debug!("{} disposed {} pooled instances", self.id, count);
    }

    /// Destroy every instance, including checked-out ones
    ///
    /// Returns how many checked-out instances were destroyed. Their handles
    /// become stale.
    pub fn destroy_all(&mut self) -> usize {
        self.dispose();

        let keys: Vec<InstanceKey> = self.instances.keys().collect();
        let checked_out = keys.len();
        for key in keys {
            self.destroy_instance(key);
        }
        checked_out
    }

    /// Hide a checked-out instance until [`Self::complete_activation`]
    pub fn suspend(&mut self, handle: ActorHandle<T>) -> Result<(), InstanceError> {
        self.checked_out_mut(handle)?.suspend();
        Ok(())
    }

    /// Move a checked-out instance and make it visible
    pub fn place(&mut self, handle: ActorHandle<T>, transform: Transform) -> Result<(), InstanceError> {
        self.checked_out_mut(handle)?.place(transform);
        Ok(())
    }

    /// Finish a deferred activation scheduled for `key` at `generation`
    ///
    /// Only an instance still waiting on that same checkout is activated.
    pub fn complete_activation(
        &mut self,
        key: InstanceKey,
        generation: u32,
        transform: Transform,
    ) -> ActivationOutcome {
        let Some(instance) = self.instances.get_mut(key) else {
            return ActivationOutcome::InstanceGone;
        };

        if instance.generation() != generation
            || instance.state() != ActorState::PendingActivation
        {
            return ActivationOutcome::Superseded;
        }

        instance.place(transform);
        ActivationOutcome::Activated
    }

    /// Look up a live instance by handle
    pub fn instance(&self, handle: ActorHandle<T>) -> Option<&PooledActor<T>> {
        if handle.pool() != self.id {
            return None;
        }
        self.instances
            .get(handle.key())
            .filter(|instance| instance.generation() == handle.generation())
    }

    /// Mutable lookup of a live instance by handle
    pub fn instance_mut(&mut self, handle: ActorHandle<T>) -> Option<&mut PooledActor<T>> {
        if handle.pool() != self.id {
            return None;
        }
        self.instances
            .get_mut(handle.key())
            .filter(|instance| instance.generation() == handle.generation())
    }

    /// Identifier of this pool
    pub fn id(&self) -> PoolId {
        self.id
    }

    /// Spawn domain the instances are parented under
    pub fn domain(&self) -> &SpawnDomain {
        &self.domain
    }

    /// Number of queued, deactivated instances
    pub fn pooled_count(&self) -> usize {
        self.available.len()
    }

    /// Number of checked-out instances
    pub fn active_count(&self) -> usize {
        self.instances.len() - self.available.len()
    }

    /// Pool statistics
    pub fn stats(&self) -> &PoolStats {
        &self.stats
    }

    /// Resolve a handle to an instance that is currently checked out
    fn checked_out_mut(&mut self, handle: ActorHandle<T>) -> Result<&mut PooledActor<T>, InstanceError> {
        if handle.pool() != self.id {
            return Err(InstanceError::Foreign);
        }

        let instance = self
            .instances
            .get_mut(handle.key())
            .ok_or(InstanceError::Stale)?;

        if instance.generation() != handle.generation() {
            return Err(InstanceError::Stale);
        }

        if !instance.state().is_checked_out() {
            return Err(InstanceError::NotCheckedOut(instance.state()));
        }

        Ok(instance)
    }

    /// Build a deactivated instance and attach it to the domain
    fn build_instance(&mut self) -> InstanceKey {
        let actor = (self.factory)();
        self.domain.attach();
        self.stats.created += 1;
        self.instances.insert(PooledActor::new(actor))
    }

    fn destroy_instance(&mut self, key: InstanceKey) {
        if let Some(instance) = self.instances.remove(key) {
            instance.destroy();
            self.domain.detach();
            self.stats.destroyed += 1;
        }
    }
}

impl<T: Actor> Drop for ActorPool<T> {
    fn drop(&mut self) {
        if !self.instances.is_empty() {
            log::trace!("{} dropped with {} live instances", self.id, self.instances.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Quat, Vec3};
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Spark {
        initialized: u32,
        resets: u32,
        destroyed: Rc<Cell<u32>>,
    }

    impl Actor for Spark {
        fn initialize_actor(&mut self) {
            self.initialized += 1;
        }

        fn reset_actor(&mut self) {
            self.resets += 1;
        }

        fn on_destroy(&mut self) {
            self.destroyed.set(self.destroyed.get() + 1);
        }
    }

    fn spark_pool(size: usize) -> (ActorPool<Spark>, Rc<Cell<u32>>) {
        let prototype = Spark::default();
        let destroyed = Rc::clone(&prototype.destroyed);
        let pool = ActorPool::new(move || prototype.clone(), SpawnDomain::at_origin("Spark Parent"), size);
        (pool, destroyed)
    }

    #[test]
    fn test_construct_fills_queue_without_initializing() {
        let (pool, _) = spark_pool(10);

        assert_eq!(pool.pooled_count(), 10);
        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.domain().members(), 10);
        assert_eq!(pool.stats().created, 10);
        assert!(pool.instances.values().all(|i| i.actor().initialized == 0 && !i.is_active()));
    }

    #[test]
    fn test_construct_empty() {
        let (pool, _) = spark_pool(0);
        assert_eq!(pool.pooled_count(), 0);
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn test_get_reuses_then_grows() {
        let (mut pool, _) = spark_pool(1);

        let first = pool.get();
        assert_eq!(pool.pooled_count(), 0);
        let second = pool.get();
        assert_eq!(pool.pooled_count(), 0);

        assert_eq!(pool.active_count(), 2);
        assert_eq!(pool.stats().reused, 1);
        assert_eq!(pool.stats().grown, 1);

        for handle in [first, second] {
            let instance = pool.instance(handle).unwrap();
            assert!(instance.is_active());
            assert_eq!(instance.state(), ActorState::Active);
            assert_eq!(instance.actor().initialized, 1);
        }
    }

    #[test]
    fn test_get_release_round_trip_keeps_length() {
        let (mut pool, _) = spark_pool(3);

        for _ in 0..5 {
            let handle = pool.get();
            pool.release(handle).unwrap();
            assert_eq!(pool.pooled_count(), 3);
        }
        assert_eq!(pool.stats().created, 3);
    }

    #[test]
    fn test_release_resets_and_deactivates() {
        let (mut pool, _) = spark_pool(1);
        let handle = pool.get();
        let key = handle.key();

        pool.release(handle).unwrap();

        let instance = &pool.instances[key];
        assert!(!instance.is_active());
        assert_eq!(instance.state(), ActorState::Pooled);
        assert_eq!(instance.actor().resets, 1);
    }

    #[test]
    fn test_reuse_is_fifo() {
        let (mut pool, _) = spark_pool(0);
        let a = pool.get();
        let b = pool.get();

        pool.release(b).unwrap();
        pool.release(a).unwrap();

        assert_eq!(pool.get().key(), b.key());
        assert_eq!(pool.get().key(), a.key());
    }

    #[test]
    fn test_double_release_is_rejected() {
        let (mut pool, _) = spark_pool(2);
        let handle = pool.get();

        pool.release(handle).unwrap();
        assert_eq!(
            pool.release(handle),
            Err(InstanceError::NotCheckedOut(ActorState::Pooled))
        );
        assert_eq!(pool.pooled_count(), 2);
    }

    #[test]
    fn test_old_handle_after_reuse_is_stale() {
        let (mut pool, _) = spark_pool(1);
        let old = pool.get();
        pool.release(old).unwrap();

        let current = pool.get();
        assert_eq!(current.key(), old.key());

        assert_eq!(pool.release(old), Err(InstanceError::Stale));
        assert_eq!(pool.active_count(), 1);
        assert!(pool.release(current).is_ok());
    }

    #[test]
    fn test_foreign_handle_is_rejected() {
        let (mut pool, _) = spark_pool(1);
        let (mut other, _) = spark_pool(1);
        let handle = other.get();

        assert_eq!(pool.release(handle), Err(InstanceError::Foreign));
        assert_eq!(pool.pooled_count(), 1);
    }

    #[test]
    fn test_adjust_pool_size_shrinks_and_destroys() {
        let (mut pool, destroyed) = spark_pool(11);

        pool.adjust_pool_size(5);

        assert_eq!(pool.pooled_count(), 5);
        assert_eq!(destroyed.get(), 6);
        assert_eq!(pool.domain().members(), 5);
        assert_eq!(pool.stats().destroyed, 6);
    }

    #[test]
    fn test_adjust_pool_size_grows_with_reset_instances() {
        let (mut pool, _) = spark_pool(2);

        pool.adjust_pool_size(6);

        assert_eq!(pool.pooled_count(), 6);
        let fresh: Vec<_> = pool.available.iter().skip(2).map(|key| &pool.instances[*key]).collect();
        assert!(fresh.iter().all(|i| !i.is_active() && i.actor().resets == 1));
    }

    #[test]
    fn test_adjust_pool_size_leaves_active_instances() {
        let (mut pool, _) = spark_pool(4);
        let handle = pool.get();

        pool.adjust_pool_size(0);

        assert_eq!(pool.pooled_count(), 0);
        assert_eq!(pool.active_count(), 1);
        assert!(pool.instance(handle).unwrap().is_active());
    }

    #[test]
    fn test_dispose_destroys_only_pooled() {
        let (mut pool, destroyed) = spark_pool(3);
        let handle = pool.get();

        pool.dispose();

        assert_eq!(pool.pooled_count(), 0);
        assert_eq!(destroyed.get(), 2);
        assert!(pool.instance(handle).is_some());

        pool.release(handle).unwrap();
        assert_eq!(pool.pooled_count(), 1);
    }

    #[test]
    fn test_destroy_all_stales_checked_out_handles() {
        let (mut pool, destroyed) = spark_pool(2);
        let handle = pool.get();

        assert_eq!(pool.destroy_all(), 1);
        assert_eq!(destroyed.get(), 2);
        assert_eq!(pool.release(handle), Err(InstanceError::Stale));
        assert_eq!(pool.domain().members(), 0);
    }

    #[test]
    fn test_deferred_activation_lifecycle() {
        let (mut pool, _) = spark_pool(1);
        let handle = pool.get();
        let target = Transform::from_position_rotation(Vec3::new(3.0, 0.0, 0.0), Quat::identity());

        pool.suspend(handle).unwrap();
        assert!(!pool.instance(handle).unwrap().is_active());

        let outcome = pool.complete_activation(handle.key(), handle.generation(), target);
        assert_eq!(outcome, ActivationOutcome::Activated);

        let instance = pool.instance(handle).unwrap();
        assert!(instance.is_active());
        assert_eq!(instance.transform().position, Vec3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn test_deferred_activation_after_release_is_superseded() {
        let (mut pool, _) = spark_pool(1);
        let handle = pool.get();
        pool.suspend(handle).unwrap();
        pool.release(handle).unwrap();

        let outcome = pool.complete_activation(handle.key(), handle.generation(), Transform::identity());
        assert_eq!(outcome, ActivationOutcome::Superseded);

        // A later checkout of the same slot must not be activated by the old task
        let next = pool.get();
        pool.suspend(next).unwrap();
        let outcome = pool.complete_activation(handle.key(), handle.generation(), Transform::identity());
        assert_eq!(outcome, ActivationOutcome::Superseded);
        assert!(!pool.instance(next).unwrap().is_active());
    }

    #[test]
    fn test_deferred_activation_after_destroy() {
        let (mut pool, _) = spark_pool(1);
        let handle = pool.get();
        pool.suspend(handle).unwrap();
        pool.destroy_all();

        let outcome = pool.complete_activation(handle.key(), handle.generation(), Transform::identity());
        assert_eq!(outcome, ActivationOutcome::InstanceGone);
    }
}
