/*!
 * Shared Handles
 *
 * Reference-counted ownership of an arena block through a control block
 */

use super::exclusive::ExclusiveHandle;
use super::traits::{Handle, HandleDrop, SharedRef};
use super::{HandleError, HandleMetadata, HandleResult};
use crate::arena::{Arena, BlockRef};
use std::fmt;
use std::sync::atomic::{fence, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, error};

const KIND: &str = "shared";

/// Bookkeeping shared by every copy of a `SharedHandle`
///
/// `strong` is the authoritative owner count and drives block release; the
/// surrounding `Arc` only keeps the control block's own allocation alive.
///
/// # Ordering
///
/// - increment: `Relaxed`, a new owner can only come from an existing one
/// - decrement: `Release`, publishing this owner's accesses to the value
/// - 1 → 0: `Acquire` fence before deallocating, so every prior access from
///   any thread happens-before the release
pub struct ControlBlock<T> {
    strong: AtomicUsize,
    block: BlockRef,
    value: T,
    arena: Arc<Arena>,
}

impl<T> ControlBlock<T> {
    pub fn strong_count(&self) -> usize {
        self.strong.load(Ordering::Acquire)
    }

    pub fn block(&self) -> BlockRef {
        self.block
    }
}

/// Shared-ownership handle
///
/// # Example
///
/// ```rust
/// use ownership_kernel::{Arena, SharedHandle};
/// use std::sync::Arc;
///
/// let arena = Arc::new(Arena::with_capacity(1024));
/// let s1 = SharedHandle::new_in(&arena, 100i32).unwrap();
/// {
///     let s2 = s1.clone();
///     assert_eq!(s1.use_count(), 2);
///     assert_eq!(*s2.try_ref().unwrap(), 100);
/// }
/// assert_eq!(s1.use_count(), 1);
/// ```
pub struct SharedHandle<T> {
    control: Option<Arc<ControlBlock<T>>>,
    metadata: HandleMetadata,
}

impl<T> SharedHandle<T> {
    /// Allocate a block for `value` with a fresh control block (count = 1)
    pub fn new_in(arena: &Arc<Arena>, value: T) -> HandleResult<Self> {
        let block = arena.allocate_labeled(std::mem::size_of::<T>(), std::any::type_name::<T>())?;
        Ok(Self::with_control(block, value, Arc::clone(arena)))
    }

    /// A handle that shares nothing
    pub fn empty() -> Self {
        Self {
            control: None,
            metadata: HandleMetadata::new::<T>(KIND),
        }
    }

    /// Convert single ownership into shared ownership without reallocating
    ///
    /// A vacant exclusive handle converts into an empty shared handle.
    pub fn from_exclusive(mut handle: ExclusiveHandle<T>) -> Self {
        match handle.take_owned() {
            Some((block, value)) => Self::with_control(block, *value, Arc::clone(handle.arena())),
            None => Self::empty(),
        }
    }

    fn with_control(block: BlockRef, value: T, arena: Arc<Arena>) -> Self {
        debug!(block = %block.id, size = block.size, "Shared handle created control block");
        Self {
            control: Some(Arc::new(ControlBlock {
                strong: AtomicUsize::new(1),
                block,
                value,
                arena,
            })),
            metadata: HandleMetadata::new::<T>(KIND),
        }
    }

    /// Current strong count, 0 when empty
    #[inline]
    pub fn use_count(&self) -> usize {
        self.control
            .as_ref()
            .map_or(0, |control| control.strong_count())
    }

    pub fn try_ref(&self) -> HandleResult<&T> {
        self.control
            .as_ref()
            .map(|control| &control.value)
            .ok_or(HandleError::NullAccess { kind: KIND })
    }

    /// Whether both handles share the same control block
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        match (&a.control, &b.control) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Give up this handle's share and become empty
    pub fn reset(&mut self) {
        self.on_drop();
    }
}

impl<T> Clone for SharedHandle<T> {
    fn clone(&self) -> Self {
        if let Some(control) = &self.control {
            control.strong.fetch_add(1, Ordering::Relaxed);
        }
        Self {
            control: self.control.clone(),
            metadata: self.metadata.clone(),
        }
    }
}

impl<T> Default for SharedHandle<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Handle for SharedHandle<T> {
    fn metadata(&self) -> &HandleMetadata {
        &self.metadata
    }

    fn block(&self) -> Option<BlockRef> {
        self.control.as_ref().map(|control| control.block)
    }
}

impl<T> SharedRef for SharedHandle<T> {
    fn use_count(&self) -> usize {
        SharedHandle::use_count(self)
    }
}

impl<T> HandleDrop for SharedHandle<T> {
    fn on_drop(&mut self) {
        let Some(control) = self.control.take() else {
            return;
        };
        if control.strong.fetch_sub(1, Ordering::Release) != 1 {
            return;
        }
        fence(Ordering::Acquire);

        match control.arena.deallocate(control.block) {
            Ok(()) => debug!(
                block = %control.block.id,
                lifetime_micros = self.metadata.lifetime_micros(),
                "Last shared handle released block"
            ),
            Err(e) => error!(
                block = %control.block.id,
                error = %e,
                "Shared handle drop failed"
            ),
        }
    }
}

impl<T> Drop for SharedHandle<T> {
    #[inline]
    fn drop(&mut self) {
        self.on_drop();
    }
}

impl<T: fmt::Debug> fmt::Debug for SharedHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedHandle")
            .field("state", &self.state())
            .field("block", &self.block())
            .field("use_count", &self.use_count())
            .field("value", &self.control.as_ref().map(|control| &control.value))
            .finish()
    }
}
