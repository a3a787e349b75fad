//! Actor contract and the pooled wrapper around it
//!
//! An actor only has to know how to (re)initialize itself when it is handed
//! out and how to reset itself when it comes back. Activation, placement and
//! lifecycle bookkeeping live in [`PooledActor`], which the pool owns.

use crate::foundation::math::Transform;
use std::fmt;

/// Entity that can be recycled by a pool
pub trait Actor: 'static {
    /// Prepare the actor for a new life; called on every checkout
    fn initialize_actor(&mut self);

    /// Return the actor to a neutral, poolable state
    fn reset_actor(&mut self);

    /// Release resources before the actor is permanently destroyed
    fn on_destroy(&mut self) {}
}

/// Lifecycle state of a pooled instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorState {
    /// Deactivated and queued for reuse
    Pooled,
    /// Checked out and visible
    Active,
    /// Checked out, hidden until a deferred activation fires
    PendingActivation,
}

impl ActorState {
    /// Whether the instance is currently held by a caller
    pub fn is_checked_out(self) -> bool {
        matches!(self, Self::Active | Self::PendingActivation)
    }
}

impl fmt::Display for ActorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pooled => "pooled",
            Self::Active => "active",
            Self::PendingActivation => "pending activation",
        };
        f.write_str(name)
    }
}

/// An actor together with its pool bookkeeping
#[derive(Debug)]
pub struct PooledActor<T> {
    actor: T,
    transform: Transform,
    enabled: bool,
    state: ActorState,
    generation: u32,
}

impl<T: Actor> PooledActor<T> {
    /// Wrap a freshly constructed actor in the deactivated, pooled state
    pub(crate) fn new(actor: T) -> Self {
        Self {
            actor,
            transform: Transform::identity(),
            enabled: false,
            state: ActorState::Pooled,
            generation: 0,
        }
    }

    /// Hand the instance out: bump the generation, enable, initialize
    pub(crate) fn check_out(&mut self) -> u32 {
        self.generation = self.generation.wrapping_add(1);
        self.state = ActorState::Active;
        self.enabled = true;
        self.actor.initialize_actor();
        self.generation
    }

    /// Reset and disable the instance for queueing
    pub(crate) fn check_in(&mut self) {
        self.actor.reset_actor();
        self.enabled = false;
        self.state = ActorState::Pooled;
    }

    /// Hide a checked-out instance until its deferred activation fires
    pub(crate) fn suspend(&mut self) {
        self.enabled = false;
        self.state = ActorState::PendingActivation;
    }

    /// Move the instance and make it visible
    pub(crate) fn place(&mut self, transform: Transform) {
        self.transform = transform;
        self.enabled = true;
        self.state = ActorState::Active;
    }

    pub(crate) fn destroy(mut self) {
        self.enabled = false;
        self.actor.on_destroy();
    }
}

impl<T> PooledActor<T> {
    /// The wrapped actor
    pub fn actor(&self) -> &T {
        &self.actor
    }

    /// Mutable access to the wrapped actor
    pub fn actor_mut(&mut self) -> &mut T {
        &mut self.actor
    }

    /// Current placement
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Whether the instance is visible in the world
    pub fn is_active(&self) -> bool {
        self.enabled
    }

    /// Lifecycle state
    pub fn state(&self) -> ActorState {
        self.state
    }

    /// Number of times this instance has been checked out
    pub fn generation(&self) -> u32 {
        self.generation
    }
}
