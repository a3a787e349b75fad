//! Type-erased pool registry
//!
//! Pools of different actor types share one map. Each entry is boxed behind
//! [`ErasedPool`], which exposes the type-independent operations (teardown,
//! counts, deferred activation) and an `Any` view for typed lookups.

use crate::actor::Actor;
use crate::error::PoolError;
use crate::foundation::collections::PoolId;
use crate::pool::{ActivationOutcome, ActorPool};
use crate::scheduler::DeferredActivation;
use std::any::{type_name, Any};
use std::collections::HashMap;

/// Operations available on a pool without knowing its actor type
pub trait ErasedPool: Any {
    /// Identifier of the pool
    fn pool_id(&self) -> PoolId;

    /// Name of the actor type this pool holds
    fn element_type_name(&self) -> &'static str;

    /// Number of queued instances
    fn pooled_count(&self) -> usize;

    /// Number of checked-out instances
    fn active_count(&self) -> usize;

    /// Destroy every instance; returns how many were checked out
    fn teardown(&mut self) -> usize;

    /// Fire a deferred activation against this pool
    fn complete_activation(&mut self, activation: &DeferredActivation) -> ActivationOutcome;

    /// Typed view for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Mutable typed view for downcasting
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Actor> ErasedPool for ActorPool<T> {
    fn pool_id(&self) -> PoolId {
        self.id()
    }

    fn element_type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn pooled_count(&self) -> usize {
        ActorPool::pooled_count(self)
    }

    fn active_count(&self) -> usize {
        ActorPool::active_count(self)
    }

    fn teardown(&mut self) -> usize {
        self.destroy_all()
    }

    fn complete_activation(&mut self, activation: &DeferredActivation) -> ActivationOutcome {
        ActorPool::complete_activation(self, activation.key, activation.generation, activation.transform)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Tag-keyed map of type-erased pools
#[derive(Default)]
pub struct PoolRegistry {
    pools: HashMap<String, Box<dyn ErasedPool>>,
}

impl PoolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a pool is registered under `tag`
    pub fn contains(&self, tag: &str) -> bool {
        self.pools.contains_key(tag)
    }

    /// Register a pool; fails if the tag is taken
    pub fn insert<T: Actor>(&mut self, tag: &str, pool: ActorPool<T>) -> Result<(), PoolError> {
        if self.pools.contains_key(tag) {
            return Err(PoolError::DuplicateTag { tag: tag.to_string() });
        }
        self.pools.insert(tag.to_string(), Box::new(pool));
        Ok(())
    }

    /// Type-erased lookup
    pub fn get_erased(&self, tag: &str) -> Option<&(dyn ErasedPool + 'static)> {
        self.pools.get(tag).map(|pool| &**pool)
    }

    /// Mutable type-erased lookup
    pub fn get_erased_mut(&mut self, tag: &str) -> Option<&mut (dyn ErasedPool + 'static)> {
        self.pools.get_mut(tag).map(|pool| &mut **pool)
    }

    /// Typed lookup with an explicit element type check
    pub fn get<T: Actor>(&self, tag: &str) -> Result<&ActorPool<T>, PoolError> {
        let entry = self
            .pools
            .get(tag)
            .ok_or_else(|| PoolError::TagNotFound { tag: tag.to_string() })?;

        let found = entry.element_type_name();
        entry
            .as_any()
            .downcast_ref::<ActorPool<T>>()
            .ok_or_else(|| PoolError::TypeMismatch {
                tag: tag.to_string(),
                expected: type_name::<T>(),
                found,
            })
    }

    /// Mutable typed lookup with an explicit element type check
    pub fn get_mut<T: Actor>(&mut self, tag: &str) -> Result<&mut ActorPool<T>, PoolError> {
        let entry = self
            .pools
            .get_mut(tag)
            .ok_or_else(|| PoolError::TagNotFound { tag: tag.to_string() })?;

        let found = entry.element_type_name();
        entry
            .as_any_mut()
            .downcast_mut::<ActorPool<T>>()
            .ok_or_else(|| PoolError::TypeMismatch {
                tag: tag.to_string(),
                expected: type_name::<T>(),
                found,
            })
    }

    /// Deregister and return the pool under `tag`
    pub fn remove(&mut self, tag: &str) -> Option<Box<dyn ErasedPool>> {
        self.pools.remove(tag)
    }

    /// Deregister every pool
    pub fn drain(&mut self) -> impl Iterator<Item = (String, Box<dyn ErasedPool>)> + '_ {
        self.pools.drain()
    }

    /// Registered tags, in no particular order
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.pools.keys().map(String::as_str)
    }

    /// Number of registered pools
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    /// Whether no pools are registered
    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}
