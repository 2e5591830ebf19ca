/*!
 * Arena Storage Operations
 * Read/write access to the bytes of raw blocks
 */

use super::types::{ArenaError, ArenaResult, BlockRef};
use super::Arena;
use crate::core::types::{BlockId, Size};
use tracing::trace;

impl Arena {
    /// Write bytes into a live block at `offset`
    ///
    /// The block's storage is materialized on first write.
    pub fn write_bytes(&self, block: BlockRef, offset: usize, data: &[u8]) -> ArenaResult<()> {
        // Holding the metadata entry keeps a concurrent deallocate out
        let entry = self.live_entry(block.id)?;
        let size = entry.size;
        check_bounds(block.id, offset, data.len(), size)?;

        if !self.storage.contains_key(&block.id) {
            let bytes = self.try_zeroed(size)?;
            self.storage
                .entry(block.id)
                .or_insert_with(|| bytes.into_boxed_slice());
        }

        if let Some(mut bytes) = self.storage.get_mut(&block.id) {
            bytes[offset..offset + data.len()].copy_from_slice(data);
        }
        drop(entry);

        trace!(block = %block.id, offset, len = data.len(), "Wrote bytes");
        Ok(())
    }

    /// Read `len` bytes from a live block at `offset`
    ///
    /// Blocks that were never written read back as zeros.
    pub fn read_bytes(&self, block: BlockRef, offset: usize, len: Size) -> ArenaResult<Vec<u8>> {
        let entry = self.live_entry(block.id)?;
        check_bounds(block.id, offset, len, entry.size)?;

        let data = match self.storage.get(&block.id) {
            Some(bytes) => bytes[offset..offset + len].to_vec(),
            None => self.try_zeroed(len)?,
        };
        drop(entry);

        trace!(block = %block.id, offset, len, "Read bytes");
        Ok(data)
    }

    /// Zeroed buffer reserved through the system allocator without aborting
    pub(crate) fn try_zeroed(&self, len: usize) -> ArenaResult<Vec<u8>> {
        let mut bytes = Vec::new();
        bytes.try_reserve_exact(len).map_err(|_| {
            let used = self.used_bytes();
            ArenaError::OutOfMemory {
                requested: len,
                available: self.config.capacity.saturating_sub(used),
                used,
                total: self.config.capacity,
            }
        })?;
        bytes.resize(len, 0);
        Ok(bytes)
    }

    pub(super) fn live_entry(
        &self,
        id: BlockId,
    ) -> ArenaResult<dashmap::mapref::one::Ref<'_, BlockId, super::Block, ahash::RandomState>> {
        match self.blocks.get(&id) {
            Some(entry) if entry.live => Ok(entry),
            Some(_) => Err(ArenaError::UseAfterFree { block: id }),
            None if self.was_issued(id) => Err(ArenaError::UseAfterFree { block: id }),
            None => Err(ArenaError::InvalidBlock { block: id }),
        }
    }
}

fn check_bounds(block: BlockId, offset: usize, len: usize, size: Size) -> ArenaResult<()> {
    match offset.checked_add(len) {
        Some(end) if end <= size => Ok(()),
        _ => Err(ArenaError::OutOfBounds {
            block,
            offset,
            len,
            size,
        }),
    }
}
