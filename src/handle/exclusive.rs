/*!
 * Exclusive Handles
 *
 * Move-only ownership of a single arena block with release exactly once
 */

use super::traits::{Handle, HandleDrop};
use super::{HandleError, HandleMetadata, HandleResult};
use crate::arena::{Arena, BlockRef};
use crate::core::limits::RAW_BLOCK_LABEL;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error};

const KIND: &str = "exclusive";

/// Block plus the value stored in it
struct Owned<T> {
    block: BlockRef,
    value: Box<T>,
}

/// Block and value handed back by `release()`
///
/// The block is still live in the arena; whoever holds this is responsible
/// for passing `block` to `Arena::deallocate` exactly once.
#[derive(Debug)]
pub struct Released<T> {
    pub block: BlockRef,
    pub value: T,
}

/// Single-owner handle with automatic deallocation
///
/// There is no `Clone` impl: ownership moves, it is never duplicated.
/// Moving the handle (or `transfer_from`) leaves exactly one owner.
///
/// # Example
///
/// ```rust
/// use ownership_kernel::{Arena, ExclusiveHandle, Handle};
/// use std::sync::Arc;
///
/// let arena = Arc::new(Arena::with_capacity(1024));
/// let mut h1 = ExclusiveHandle::new_in(&arena, 8u64).unwrap();
/// let h2 = ExclusiveHandle::transfer_from(&mut h1);
/// assert!(h1.is_vacant());
/// assert_eq!(*h2.try_ref().unwrap(), 8);
/// drop(h2);
/// assert_eq!(arena.live_count(), 0);
/// ```
pub struct ExclusiveHandle<T> {
    slot: Option<Owned<T>>,
    arena: Arc<Arena>,
    metadata: HandleMetadata,
}

impl<T> ExclusiveHandle<T> {
    /// Allocate a block sized for `T` and move `value` into it
    pub fn new_in(arena: &Arc<Arena>, value: T) -> HandleResult<Self> {
        let block = arena.allocate_labeled(std::mem::size_of::<T>(), std::any::type_name::<T>())?;
        Ok(Self::from_parts(arena, block, value))
    }

    /// A handle that owns nothing
    pub fn vacant(arena: &Arc<Arena>) -> Self {
        Self {
            slot: None,
            arena: Arc::clone(arena),
            metadata: HandleMetadata::new::<T>(KIND),
        }
    }

    fn from_parts(arena: &Arc<Arena>, block: BlockRef, value: T) -> Self {
        debug!(block = %block.id, size = block.size, "Exclusive handle acquired block");
        Self {
            slot: Some(Owned {
                block,
                value: Box::new(value),
            }),
            arena: Arc::clone(arena),
            metadata: HandleMetadata::new::<T>(KIND),
        }
    }

    /// Take back ownership of a block handed out by `release()`
    ///
    /// `released` must come from `arena`. A block that was already freed is
    /// rejected rather than owned, and its value is dropped.
    pub fn from_released(arena: &Arc<Arena>, released: Released<T>) -> HandleResult<Self> {
        arena.ensure_live(released.block)?;
        Ok(Self::from_parts(arena, released.block, released.value))
    }

    /// Move ownership out of `other`, leaving it vacant
    ///
    /// Transferring from a vacant handle yields a vacant handle.
    pub fn transfer_from(other: &mut Self) -> Self {
        Self {
            slot: other.slot.take(),
            arena: Arc::clone(&other.arena),
            metadata: HandleMetadata::new::<T>(KIND),
        }
    }

    /// Release the current block, then own `replacement` (or become vacant)
    pub fn reset(&mut self, replacement: Option<T>) -> HandleResult<()> {
        if let Some(owned) = self.slot.take() {
            self.arena.deallocate(owned.block)?;
        }
        if let Some(value) = replacement {
            let block = self
                .arena
                .allocate_labeled(std::mem::size_of::<T>(), std::any::type_name::<T>())?;
            self.slot = Some(Owned {
                block,
                value: Box::new(value),
            });
        }
        Ok(())
    }

    /// Release the current block, then own a block handed out by `release()`
    ///
    /// The released block is checked first; on failure this handle keeps
    /// what it owned.
    pub fn reset_released(&mut self, released: Released<T>) -> HandleResult<()> {
        self.arena.ensure_live(released.block)?;
        if let Some(owned) = self.slot.take() {
            self.arena.deallocate(owned.block)?;
        }
        debug!(block = %released.block.id, "Exclusive handle adopted released block");
        self.slot = Some(Owned {
            block: released.block,
            value: Box::new(released.value),
        });
        Ok(())
    }

    /// Give up ownership without deallocating
    ///
    /// Dropping the now-vacant handle is a no-op; the caller must deallocate
    /// the returned block.
    pub fn release(&mut self) -> Option<Released<T>> {
        self.slot.take().map(|owned| Released {
            block: owned.block,
            value: *owned.value,
        })
    }

    /// Deallocate the block and hand back the value
    pub fn into_inner(mut self) -> HandleResult<T> {
        let owned = self.take_owned().ok_or(HandleError::NullAccess { kind: KIND })?;
        self.arena.deallocate(owned.0)?;
        Ok(*owned.1)
    }

    pub fn try_ref(&self) -> HandleResult<&T> {
        self.slot
            .as_ref()
            .map(|owned| owned.value.as_ref())
            .ok_or(HandleError::NullAccess { kind: KIND })
    }

    pub fn try_mut(&mut self) -> HandleResult<&mut T> {
        self.slot
            .as_mut()
            .map(|owned| owned.value.as_mut())
            .ok_or(HandleError::NullAccess { kind: KIND })
    }

    pub fn arena(&self) -> &Arc<Arena> {
        &self.arena
    }

    /// Take block and value out without touching the arena
    pub(super) fn take_owned(&mut self) -> Option<(BlockRef, Box<T>)> {
        self.slot.take().map(|owned| (owned.block, owned.value))
    }
}

impl ExclusiveHandle<Vec<u8>> {
    /// Allocate `len` zeroed bytes, accounted at their full length
    pub fn zeroed(arena: &Arc<Arena>, len: usize) -> HandleResult<Self> {
        let block = arena.allocate_labeled(len, RAW_BLOCK_LABEL)?;
        match arena.try_zeroed(len) {
            Ok(bytes) => Ok(Self::from_parts(arena, block, bytes)),
            Err(e) => {
                arena.deallocate(block)?;
                Err(e.into())
            }
        }
    }
}

impl<T> Handle for ExclusiveHandle<T> {
    fn metadata(&self) -> &HandleMetadata {
        &self.metadata
    }

    fn block(&self) -> Option<BlockRef> {
        self.slot.as_ref().map(|owned| owned.block)
    }
}

impl<T> HandleDrop for ExclusiveHandle<T> {
    fn on_drop(&mut self) {
        if let Some(owned) = self.slot.take() {
            match self.arena.deallocate(owned.block) {
                Ok(()) => debug!(
                    block = %owned.block.id,
                    lifetime_micros = self.metadata.lifetime_micros(),
                    "Exclusive handle released block"
                ),
                Err(e) => error!(
                    block = %owned.block.id,
                    error = %e,
                    "Exclusive handle drop failed"
                ),
            }
        }
    }
}

impl<T> Drop for ExclusiveHandle<T> {
    #[inline]
    fn drop(&mut self) {
        self.on_drop();
    }
}

impl<T: fmt::Debug> fmt::Debug for ExclusiveHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExclusiveHandle")
            .field("state", &self.state())
            .field("block", &self.block())
            .field("value", &self.slot.as_ref().map(|owned| &owned.value))
            .finish()
    }
}
