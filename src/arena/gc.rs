/*!
 * Arena Garbage Collection
 * Drops the metadata of freed blocks to keep the block table bounded
 */

use super::Arena;
use std::sync::atomic::Ordering;
use tracing::debug;

impl Arena {
    /// Remove freed-block tombstones, returning how many were dropped
    ///
    /// Ids are never reissued, so a collected block still reports
    /// `DoubleFree` if it is released again.
    pub fn collect(&self) -> usize {
        let mut removed = 0;
        self.blocks.retain(|_, block| {
            if !block.live {
                removed += 1;
            }
            block.live
        });

        let _ = self
            .tombstones
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |count| {
                Some(count.saturating_sub(removed))
            });

        if removed > 0 {
            self.blocks.shrink_to_fit();
            self.storage.shrink_to_fit();
            debug!(
                removed,
                remaining = self.blocks.len(),
                "Garbage collection complete"
            );
        }

        removed
    }

    /// Whether enough tombstones have accumulated to warrant a collection
    pub fn should_collect(&self) -> bool {
        self.tombstones.load(Ordering::Acquire) >= self.config.gc_threshold
    }
}
