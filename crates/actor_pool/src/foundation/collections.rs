//! Handle types for pooled instances

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};

pub use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Stable key of an instance inside its pool's storage
    pub struct InstanceKey;
}

/// Storage for every live instance owned by a pool
pub type InstanceMap<T> = SlotMap<InstanceKey, T>;

static NEXT_POOL_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolId(pub u64);

impl PoolId {
    /// Allocate a fresh identifier
    pub fn next() -> Self {
        Self(NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pool#{}", self.0)
    }
}

/// Typed handle to a checked-out actor
///
/// A handle names one checkout of one instance: the owning pool, the slot
/// key and the spawn generation. Releasing the instance retires the handle,
/// so a second release with the same handle is rejected instead of queueing
/// the instance twice.
pub struct ActorHandle<T> {
    pool: PoolId,
    key: InstanceKey,
    generation: u32,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> ActorHandle<T> {
    pub(crate) fn new(pool: PoolId, key: InstanceKey, generation: u32) -> Self {
        Self {
            pool,
            key,
            generation,
            _phantom: PhantomData,
        }
    }

    /// Pool that issued this handle
    pub fn pool(&self) -> PoolId {
        self.pool
    }

    /// Slot key of the instance
    pub fn key(&self) -> InstanceKey {
        self.key
    }

    /// Spawn generation this handle was issued for
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

// Manual impls: the handle is Copy regardless of T.
impl<T> Clone for ActorHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ActorHandle<T> {}

impl<T> PartialEq for ActorHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.pool == other.pool && self.key == other.key && self.generation == other.generation
    }
}

impl<T> Eq for ActorHandle<T> {}

impl<T> Hash for ActorHandle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pool.hash(state);
        self.key.hash(state);
        self.generation.hash(state);
    }
}

impl<T> fmt::Debug for ActorHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActorHandle")
            .field("pool", &self.pool)
            .field("key", &self.key)
            .field("generation", &self.generation)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Marker;

    #[test]
    fn test_pool_ids_are_unique() {
        let a = PoolId::next();
        let b = PoolId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn test_handle_equality_includes_generation() {
        let mut map: InstanceMap<()> = InstanceMap::with_key();
        let key = map.insert(());
        let pool = PoolId::next();

        let first = ActorHandle::<Marker>::new(pool, key, 1);
        let copy = first;
        let later = ActorHandle::<Marker>::new(pool, key, 2);

        assert_eq!(first, copy);
        assert_ne!(first, later);
    }
}
