//! Pool statistics

/// Counters for a single pool
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Instances built by the factory
    pub created: u64,
    /// Checkouts served from the queue
    pub reused: u64,
    /// Checkouts that had to build a new instance
    pub grown: u64,
    /// Instances returned through release
    pub released: u64,
    /// Instances permanently destroyed
    pub destroyed: u64,
}

impl PoolStats {
    /// Total checkouts served
    pub fn checkouts(&self) -> u64 {
        self.reused + self.grown
    }
}
