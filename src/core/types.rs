/*!
 * Core Types
 * Common types used across the arena and its handles
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Size type for arena accounting
pub type Size = usize;

/// Allocation sequence number
pub type Sequence = u64;

/// Unique identifier of an arena block
///
/// Identifiers are issued from a monotonically increasing counter and are
/// never reused for the lifetime of an arena, so a stale id can always be
/// told apart from a live one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(u64);

impl BlockId {
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for BlockId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// Lifecycle state shared by every handle type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleState {
    Vacant,
    Owning,
}

impl fmt::Display for HandleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandleState::Vacant => write!(f, "VACANT"),
            HandleState::Owning => write!(f, "OWNING"),
        }
    }
}
