//! Memory capacity bookkeeping.
//!
//! `ResourcePool` has no locking of its own. It is owned by the
//! [`AdmissionScheduler`](crate::core::AdmissionScheduler) and only mutated
//! inside its serialization point.

/// Fixed-capacity memory pool measured in megabytes.
///
/// Invariant: `0 <= free_mb <= total_mb` at all times. Any operation that
/// would break it panics, since it means the caller's serialization is broken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePool {
    total_mb: u64,
    free_mb: u64,
}

impl ResourcePool {
    /// Create a pool with all of `total_mb` free.
    #[must_use]
    pub const fn new(total_mb: u64) -> Self {
        Self {
            total_mb,
            free_mb: total_mb,
        }
    }

    /// Total capacity.
    #[must_use]
    pub const fn total_mb(&self) -> u64 {
        self.total_mb
    }

    /// Currently unreserved capacity.
    #[must_use]
    pub const fn free_mb(&self) -> u64 {
        self.free_mb
    }

    /// Currently reserved capacity.
    #[must_use]
    pub const fn used_mb(&self) -> u64 {
        self.total_mb - self.free_mb
    }

    /// Whether `amount` could be reserved right now.
    #[must_use]
    pub const fn fits(&self, amount: u64) -> bool {
        amount <= self.free_mb
    }

    /// Reserve `amount` megabytes.
    ///
    /// # Panics
    ///
    /// Panics if `amount` exceeds the free capacity.
    pub fn reserve(&mut self, amount: u64) {
        assert!(
            amount <= self.free_mb,
            "pool underflow: reserve {amount} MB with only {} MB free",
            self.free_mb
        );
        self.free_mb -= amount;
    }

    /// Return `amount` megabytes to the pool.
    ///
    /// # Panics
    ///
    /// Panics if the release would raise free capacity above the total,
    /// which happens on a double release.
    pub fn release(&mut self, amount: u64) {
        let free = self.free_mb.checked_add(amount);
        assert!(
            free.is_some_and(|f| f <= self.total_mb),
            "pool overflow: release {amount} MB with {} of {} MB already free",
            self.free_mb,
            self.total_mb
        );
        self.free_mb += amount;
    }

    /// Restore the pool to fully free.
    pub fn restore(&mut self) {
        self.free_mb = self.total_mb;
    }
}
