//! Spawn domains
//!
//! A spawn domain is the grouping context a pool parents its instances under.
//! The pool attaches every instance it builds and detaches every instance it
//! destroys, so the member count always equals the pool's live instances.

use crate::foundation::math::Transform;

/// Named placement context that groups a pool's instances
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnDomain {
    name: String,
    transform: Transform,
    members: usize,
}

impl SpawnDomain {
    /// Create an empty domain at the given placement
    pub fn new(name: impl Into<String>, transform: Transform) -> Self {
        Self {
            name: name.into(),
            transform,
            members: 0,
        }
    }

    /// Create an empty domain at the origin with no rotation
    pub fn at_origin(name: impl Into<String>) -> Self {
        Self::new(name, Transform::identity())
    }

    /// Domain name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Domain placement
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Number of instances currently parented here
    pub fn members(&self) -> usize {
        self.members
    }

    pub(crate) fn attach(&mut self) {
        self.members += 1;
    }

    pub(crate) fn detach(&mut self) {
        self.members = self.members.saturating_sub(1);
    }
}
