/*!
 * Error Types
 * Centralized error handling with thiserror and miette
 */

use miette::Diagnostic;
use thiserror::Error;

pub use crate::arena::{ArenaError, ConfigError};
pub use crate::handle::HandleError;
pub use crate::sync::LockError;

/// Unified error type with miette diagnostics
#[derive(Error, Debug, Clone, PartialEq, Diagnostic)]
pub enum OwnershipError {
    #[error("Arena error: {0}")]
    #[diagnostic(transparent)]
    Arena(#[from] ArenaError),

    #[error("Handle error: {0}")]
    #[diagnostic(transparent)]
    Handle(#[from] HandleError),

    #[error("Lock error: {0}")]
    #[diagnostic(transparent)]
    Lock(#[from] LockError),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(config::invalid))]
    Config(#[from] ConfigError),
}

impl OwnershipError {
    /// Short machine-readable kind for callers presenting their own messages
    pub fn kind(&self) -> &'static str {
        match self {
            OwnershipError::Arena(ArenaError::OutOfMemory { .. })
            | OwnershipError::Handle(HandleError::Arena(ArenaError::OutOfMemory { .. })) => {
                "out_of_memory"
            }
            OwnershipError::Arena(ArenaError::DoubleFree { .. })
            | OwnershipError::Handle(HandleError::Arena(ArenaError::DoubleFree { .. })) => {
                "double_free"
            }
            OwnershipError::Handle(HandleError::NullAccess { .. }) => "null_access",
            OwnershipError::Lock(LockError::Acquisition { .. }) => "acquisition",
            OwnershipError::Arena(_) | OwnershipError::Handle(_) => "arena",
            OwnershipError::Config(_) => "config",
        }
    }
}

/// Common result type for ownership operations
pub type OwnershipResult<T> = Result<T, OwnershipError>;
