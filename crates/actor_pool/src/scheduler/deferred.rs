//! Pending activations ordered by due time

use crate::foundation::collections::{InstanceKey, PoolId};
use crate::foundation::math::Transform;
use crate::foundation::time::TimeSource;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::Duration;

/// A spawned instance waiting to be placed and shown
#[derive(Debug, Clone, PartialEq)]
pub struct DeferredActivation {
    /// Tag the instance was spawned from
    pub tag: String,
    /// Pool that owns the instance
    pub pool: PoolId,
    /// Slot of the instance in its pool
    pub key: InstanceKey,
    /// Checkout the activation belongs to
    pub generation: u32,
    /// Placement applied on activation
    pub transform: Transform,
    /// Time at which the activation becomes due
    pub due: Duration,
}

/// Heap entry; ties on `due` fire in scheduling order
struct Scheduled {
    due: Duration,
    sequence: u64,
    activation: DeferredActivation,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.sequence == other.sequence
    }
}

impl Eq for Scheduled {}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due
            .cmp(&other.due)
            .then(self.sequence.cmp(&other.sequence))
    }
}

/// Fire-and-forget timer queue for deferred activations
///
/// No cancellation handle is returned; an activation whose target has gone
/// away is discarded by the pool when it fires.
pub struct ActivationScheduler {
    clock: Box<dyn TimeSource>,
    pending: BinaryHeap<Reverse<Scheduled>>,
    next_sequence: u64,
}

impl ActivationScheduler {
    /// Create a scheduler driven by `clock`
    pub fn new(clock: impl TimeSource + 'static) -> Self {
        Self {
            clock: Box::new(clock),
            pending: BinaryHeap::new(),
            next_sequence: 0,
        }
    }

    /// Current time of the underlying clock
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Queue an activation to fire once `delay` has elapsed
    ///
    /// The `due` field of `activation` is overwritten.
    pub fn schedule(&mut self, delay: Duration, mut activation: DeferredActivation) {
        activation.due = self.clock.now().saturating_add(delay);
        let entry = Scheduled {
            due: activation.due,
            sequence: self.next_sequence,
            activation,
        };
        self.next_sequence += 1;
        self.pending.push(Reverse(entry));
    }

    /// Remove and return every activation that is due, earliest first
    pub fn take_due(&mut self) -> Vec<DeferredActivation> {
        let now = self.clock.now();
        let mut due = Vec::new();

        while let Some(Reverse(next)) = self.pending.peek() {
            if next.due > now {
                break;
            }
            if let Some(Reverse(entry)) = self.pending.pop() {
                due.push(entry.activation);
            }
        }

        due
    }

    /// Number of activations that have not fired yet
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Drop every pending activation, returning how many were dropped
    pub fn clear(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::collections::InstanceMap;
    use crate::foundation::time::VirtualClock;

    fn activation(tag: &str) -> DeferredActivation {
        let mut keys: InstanceMap<()> = InstanceMap::with_key();
        DeferredActivation {
            tag: tag.to_string(),
            pool: PoolId::next(),
            key: keys.insert(()),
            generation: 1,
            transform: Transform::identity(),
            due: Duration::ZERO,
        }
    }

    #[test]
    fn test_not_due_before_delay() {
        let clock = VirtualClock::new();
        let mut scheduler = ActivationScheduler::new(clock.clone());

        scheduler.schedule(Duration::from_secs(2), activation("Bullet"));

        clock.advance(Duration::from_millis(1999));
        assert!(scheduler.take_due().is_empty());
        assert_eq!(scheduler.pending_count(), 1);

        clock.advance(Duration::from_millis(1));
        let fired = scheduler.take_due();
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].due, Duration::from_secs(2));
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_due_in_time_order() {
        let clock = VirtualClock::new();
        let mut scheduler = ActivationScheduler::new(clock.clone());

        scheduler.schedule(Duration::from_secs(3), activation("late"));
        scheduler.schedule(Duration::from_secs(1), activation("early"));
        scheduler.schedule(Duration::from_secs(1), activation("early-second"));

        clock.advance(Duration::from_secs(5));
        let tags: Vec<_> = scheduler.take_due().into_iter().map(|a| a.tag).collect();

        assert_eq!(tags, vec!["early", "early-second", "late"]);
    }

    #[test]
    fn test_delay_is_relative_to_schedule_time() {
        let clock = VirtualClock::new();
        let mut scheduler = ActivationScheduler::new(clock.clone());

        clock.advance(Duration::from_secs(10));
        scheduler.schedule(Duration::from_secs(1), activation("Bullet"));

        clock.advance(Duration::from_millis(500));
        assert!(scheduler.take_due().is_empty());

        clock.advance(Duration::from_millis(500));
        assert_eq!(scheduler.take_due().len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut scheduler = ActivationScheduler::new(VirtualClock::new());
        scheduler.schedule(Duration::from_secs(1), activation("Bullet"));
        scheduler.schedule(Duration::from_secs(2), activation("Bullet"));

        assert_eq!(scheduler.clear(), 2);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_due_time_saturates_instead_of_overflowing() {
        let clock = VirtualClock::new();
        let mut scheduler = ActivationScheduler::new(clock.clone());

        clock.advance(Duration::from_secs(1 << 41));
        scheduler.schedule(Duration::from_secs(u64::MAX - 1), activation("Bullet"));
        scheduler.schedule(Duration::MAX, activation("Bullet"));

        clock.advance(Duration::from_secs(1 << 41));
        assert!(scheduler.take_due().is_empty());
        assert_eq!(scheduler.pending_count(), 2);
    }
}
