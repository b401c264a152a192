//! Per-land serialization of journey mutations
//!
//! Every read-validate-write sequence on a land runs while holding that
//! land's lock. Locks for different lands are independent. An entry lives
//! only while some caller holds or waits for it, so ids that never resolve
//! to a land leave nothing behind.

use crate::types::LandId;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Table of per-land async mutexes
#[derive(Debug, Default)]
pub struct LandLocks {
    locks: DashMap<LandId, Arc<Mutex<()>>>,
}

/// Exclusive access to one land, released on drop
#[derive(Debug)]
pub struct LandGuard<'a> {
    locks: &'a LandLocks,
    land_id: LandId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for LandGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Only the table's own handle left means nobody holds or waits
        self.locks
            .locks
            .remove_if(&self.land_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}

impl LandLocks {
    /// Create empty lock table
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to a land
    pub async fn acquire(&self, land_id: LandId) -> LandGuard<'_> {
        // Clone the Arc out so no map shard is held across the await
        let lock = self.locks.entry(land_id).or_default().value().clone();
        let guard = lock.lock_owned().await;
        LandGuard {
            locks: self,
            land_id,
            guard: Some(guard),
        }
    }

    /// Number of lands with a lock entry
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Whether no land has a lock entry
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
