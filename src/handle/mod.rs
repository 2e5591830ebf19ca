/*!
 * Ownership Handles
 *
 * Owning wrappers over arena blocks with deterministic release.
 *
 * ## Handle Types
 *
 * - **ExclusiveHandle**: move-only, exactly one owner, released on drop,
 *   reset, or overwrite
 * - **SharedHandle**: reference counted through a control block, released
 *   when the last owner goes away
 *
 * Both are two-state machines: `Vacant` or `Owning`. Dereferencing a vacant
 * handle fails with `HandleError::NullAccess` instead of touching invalid
 * memory.
 *
 * ## Example
 *
 * ```rust
 * use ownership_kernel::{Arena, ExclusiveHandle, SharedHandle};
 * use std::sync::Arc;
 *
 * let arena = Arc::new(Arena::with_capacity(1024));
 * let first = ExclusiveHandle::new_in(&arena, 42u64).unwrap();
 * let shared = SharedHandle::from_exclusive(first);
 * let copy = shared.clone();
 * assert_eq!(copy.use_count(), 2);
 * drop((shared, copy));
 * assert_eq!(arena.live_count(), 0);
 * ```
 */

mod exclusive;
mod shared;
mod traits;

pub use exclusive::{ExclusiveHandle, Released};
pub use shared::{ControlBlock, SharedHandle};
pub use traits::{Handle, HandleDrop, SharedRef};

use crate::arena::ArenaError;
use miette::Diagnostic;
use std::time::Instant;

/// Result type for handle operations
pub type HandleResult<T> = Result<T, HandleError>;

/// Errors that can occur during handle operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Diagnostic)]
pub enum HandleError {
    #[error("Null access: {kind} handle is vacant")]
    #[diagnostic(
        code(handle::null_access),
        help("The handle was moved from, released, or reset. Check `is_vacant()` before dereferencing.")
    )]
    NullAccess { kind: &'static str },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Arena(#[from] ArenaError),
}

/// Handle metadata for observability
#[derive(Debug, Clone)]
pub struct HandleMetadata {
    pub kind: &'static str,
    pub type_name: &'static str,
    pub creation_time: Instant,
}

impl HandleMetadata {
    #[inline]
    pub fn new<T>(kind: &'static str) -> Self {
        Self {
            kind,
            type_name: std::any::type_name::<T>(),
            creation_time: Instant::now(),
        }
    }

    #[inline]
    pub fn lifetime_micros(&self) -> u64 {
        self.creation_time.elapsed().as_micros() as u64
    }
}
