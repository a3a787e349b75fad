//! Pool management
//!
//! - [`registry`]: tag-keyed, type-erased storage of pools
//! - [`pool_manager`]: creation, spawn, release and disposal by tag

pub mod registry;
pub mod pool_manager;

pub use registry::{ErasedPool, PoolRegistry};
pub use pool_manager::{ManagerStats, PoolManager};
