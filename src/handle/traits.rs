/*!
 * Handle Traits
 *
 * Core abstractions shared by the ownership handles
 */

use super::HandleMetadata;
use crate::arena::BlockRef;
use crate::core::types::HandleState;

/// Core handle trait
///
/// Every handle exposes the block it owns (if any) and its metadata.
pub trait Handle {
    /// Get handle metadata
    fn metadata(&self) -> &HandleMetadata;

    /// Handle kind name for logging/debugging
    #[inline]
    fn kind(&self) -> &'static str {
        self.metadata().kind
    }

    /// Block currently owned, without transferring ownership
    fn block(&self) -> Option<BlockRef>;

    #[inline]
    fn state(&self) -> HandleState {
        if self.block().is_some() {
            HandleState::Owning
        } else {
            HandleState::Vacant
        }
    }

    #[inline]
    fn is_vacant(&self) -> bool {
        self.block().is_none()
    }
}

/// Handles that release their block when dropped
///
/// Separates Drop logic for better testability and observability
pub trait HandleDrop: Handle {
    /// Perform cleanup on drop
    ///
    /// # Panics
    ///
    /// Should NOT panic. Log errors instead.
    fn on_drop(&mut self);
}

/// Handles that share one block through a reference count
pub trait SharedRef: Handle + Clone {
    /// Current strong count, 0 when empty
    fn use_count(&self) -> usize;

    /// Check if this is the last reference
    fn is_last_ref(&self) -> bool {
        self.use_count() == 1
    }
}
