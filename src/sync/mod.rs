/*!
 * Scoped Locking
 *
 * RAII mutual exclusion: a `ScopedLock` holds its `LockResource` for exactly
 * its own lifetime and releases it once on drop, whether the scope ends
 * normally, through `?`, or by unwinding.
 *
 * # Policies
 *
 * - `AcquirePolicy::Block` (default): wait until the resource is free, with
 *   no timeout and no cancellation
 * - `AcquirePolicy::FailFast`: fail with `LockError::Acquisition` instead of
 *   waiting
 *
 * Under either policy, acquiring a resource the calling thread already holds
 * fails instead of deadlocking.
 */

mod config;
mod scoped;

pub use config::{AcquirePolicy, LockConfig};
pub use scoped::{LockResource, ScopedLock};

use miette::Diagnostic;
use thiserror::Error;

/// Result type for lock operations
pub type LockResult<T> = Result<T, LockError>;

/// Lock acquisition errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum LockError {
    #[error("Failed to acquire lock '{resource}': {reason}")]
    #[diagnostic(
        code(sync::acquisition_failed),
        help("Acquisition is never retried automatically. Release the current guard or retry later.")
    )]
    Acquisition {
        resource: String,
        reason: &'static str,
    },
}
