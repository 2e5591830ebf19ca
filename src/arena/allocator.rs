/*!
 * Arena Allocator Implementation
 * Allocation and deallocation logic
 */

use super::types::{ArenaError, ArenaResult, Block, BlockRef, MemoryPressure};
use super::Arena;
use crate::core::limits::RAW_BLOCK_LABEL;
use crate::core::types::{BlockId, Size};
use std::sync::atomic::Ordering;
use tracing::{debug, error, warn};

impl Arena {
    /// Allocate a raw block of `size` bytes
    pub fn allocate(&self, size: Size) -> ArenaResult<BlockRef> {
        self.allocate_labeled(size, RAW_BLOCK_LABEL)
    }

    /// Allocate a block and record what it holds for leak reports
    pub fn allocate_labeled(&self, size: Size, label: &str) -> ArenaResult<BlockRef> {
        let capacity = self.config.capacity;

        // Charge the budget first; nothing is recorded if it does not fit
        let previous = self
            .used_bytes
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |used| {
                used.checked_add(size).filter(|next| *next <= capacity)
            })
            .map_err(|used| {
                error!(
                    requested = size,
                    used,
                    capacity,
                    label,
                    "OOM: allocation exceeds arena capacity"
                );
                ArenaError::OutOfMemory {
                    requested: size,
                    available: capacity.saturating_sub(used),
                    used,
                    total: capacity,
                }
            })?;
        let used = previous + size;
        self.peak_bytes.fetch_max(used, Ordering::AcqRel);

        let sequence = self.next_id.fetch_add(1, Ordering::AcqRel);
        let id = BlockId::new(sequence);
        let block = Block::new(id, size, sequence, label);
        let block_ref = block.to_ref();

        self.blocks.insert(id, block);
        self.live_blocks.fetch_add(1, Ordering::AcqRel);

        match self.pressure_at(used) {
            level @ (MemoryPressure::High | MemoryPressure::Critical) => {
                warn!(
                    block = %id,
                    size,
                    used,
                    capacity,
                    pressure = %level,
                    "Arena under memory pressure"
                );
            }
            _ => debug!(block = %id, size, label, "Allocated block"),
        }

        Ok(block_ref)
    }

    /// Release a block back to the arena
    ///
    /// Fails with `DoubleFree` when the block was already released and with
    /// `InvalidBlock` when the id was never issued.
    pub fn deallocate(&self, block: BlockRef) -> ArenaResult<()> {
        let id = block.id;

        let (size, tombstones) = match self.blocks.get_mut(&id) {
            Some(mut entry) if entry.live => {
                entry.free();
                // Counted while the entry is held so `collect` never sees it uncounted
                let tombstones = self.tombstones.fetch_add(1, Ordering::AcqRel) + 1;
                (entry.size, tombstones)
            }
            Some(_) => return Err(self.double_free(id)),
            // Tombstone already collected; ids below the counter were issued
            None if self.was_issued(id) => return Err(self.double_free(id)),
            None => {
                warn!(block = %id, "Attempted to deallocate unknown block");
                return Err(ArenaError::InvalidBlock { block: id });
            }
        };

        self.storage.remove(&id);
        self.used_bytes.fetch_sub(size, Ordering::AcqRel);
        self.live_blocks.fetch_sub(1, Ordering::AcqRel);
        self.total_deallocations.fetch_add(1, Ordering::AcqRel);

        debug!(
            block = %id,
            size,
            live = self.live_count(),
            "Deallocated block"
        );

        if tombstones >= self.config.gc_threshold {
            debug!(tombstones, "GC threshold reached, collecting tombstones");
            self.collect();
        }

        Ok(())
    }

    /// Ids below the counter were issued, whether or not still tracked
    #[inline]
    pub(super) fn was_issued(&self, id: BlockId) -> bool {
        id.get() >= 1 && id.get() < self.next_id.load(Ordering::Acquire)
    }

    fn double_free(&self, id: BlockId) -> ArenaError {
        error!(block = %id, "Double free detected");
        ArenaError::DoubleFree { block: id }
    }
}
