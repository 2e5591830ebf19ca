/*!
 * Ownership Kernel Library
 * Arena-tracked ownership handles and scoped locking
 */

pub mod arena;
pub mod core;
pub mod handle;
pub mod monitoring;
pub mod sync;

// Re-exports
pub use arena::{global, Arena, ArenaConfig, ArenaError, ArenaStats, Block, BlockRef, MemoryPressure};
pub use self::core::errors::{OwnershipError, OwnershipResult};
pub use self::core::types::{BlockId, HandleState};
pub use handle::{
    ExclusiveHandle, Handle, HandleDrop, HandleError, HandleResult, Released, SharedHandle,
    SharedRef,
};
pub use monitoring::{init_tracing, ScopeSpan};
pub use sync::{AcquirePolicy, LockConfig, LockError, LockResource, ScopedLock};
