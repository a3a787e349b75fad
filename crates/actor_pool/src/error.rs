//! Error types for pool and registry operations

use crate::actor::ActorState;
use thiserror::Error;

/// Rejection of an instance-level operation by a single pool
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceError {
    /// Handle was issued by a different pool
    #[error("instance belongs to another pool")]
    Foreign,

    /// Instance is not checked out (already pooled)
    #[error("instance is {0}, expected it to be checked out")]
    NotCheckedOut(ActorState),

    /// Instance was destroyed or the handle predates its current checkout
    #[error("handle is stale")]
    Stale,
}

/// Errors reported by the pool manager
///
/// Every variant is recoverable: the manager logs it and performs no change.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// No pool is registered under the tag
    #[error("{tag} pool could not be found")]
    TagNotFound {
        /// Requested tag
        tag: String,
    },

    /// The registered pool holds a different actor type
    #[error("incorrect pool type for tag {tag}: requested {expected}, registered {found}")]
    TypeMismatch {
        /// Requested tag
        tag: String,
        /// Actor type the caller asked for
        expected: &'static str,
        /// Actor type the pool was created with
        found: &'static str,
    },

    /// A pool with the tag already exists
    #[error("a pool with tag {tag} already exists")]
    DuplicateTag {
        /// Requested tag
        tag: String,
    },

    /// Handle was issued by another pool
    #[error("instance released to {tag} was not spawned from it")]
    ForeignInstance {
        /// Requested tag
        tag: String,
    },

    /// Instance is already back in the pool
    #[error("instance released to {tag} is {state}, not checked out")]
    NotActive {
        /// Requested tag
        tag: String,
        /// Current state of the instance
        state: ActorState,
    },

    /// Instance no longer exists or the handle is from an earlier checkout
    #[error("stale handle for {tag} pool")]
    StaleHandle {
        /// Requested tag
        tag: String,
    },
}

impl PoolError {
    /// Attach a tag to an instance-level rejection
    pub fn from_instance(tag: &str, err: InstanceError) -> Self {
        let tag = tag.to_string();
        match err {
            InstanceError::Foreign => Self::ForeignInstance { tag },
            InstanceError::NotCheckedOut(state) => Self::NotActive { tag, state },
            InstanceError::Stale => Self::StaleHandle { tag },
        }
    }

    /// Tag the failed request referred to
    pub fn tag(&self) -> &str {
        match self {
            Self::TagNotFound { tag }
            | Self::TypeMismatch { tag, .. }
            | Self::DuplicateTag { tag }
            | Self::ForeignInstance { tag }
            | Self::NotActive { tag, .. }
            | Self::StaleHandle { tag } => tag,
        }
    }
}
