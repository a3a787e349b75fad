//! Deferred activation scheduling
//!
//! Spawning with a delay hands a [`DeferredActivation`] to the
//! [`ActivationScheduler`]; the pool manager fires due activations from its
//! `update` call. Time comes from an injectable
//! [`TimeSource`](crate::foundation::time::TimeSource).

pub mod deferred;

pub use deferred::{ActivationScheduler, DeferredActivation};
