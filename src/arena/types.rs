/*!
 * Arena Types
 * Blocks, statistics and errors for the arena allocator
 */

use crate::core::types::{BlockId, Sequence, Size};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use thiserror::Error;

/// Arena operation result
pub type ArenaResult<T> = Result<T, ArenaError>;

/// Arena errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum ArenaError {
    #[error("Out of memory: requested {requested} bytes, available {available} bytes ({used} used / {total} total)")]
    #[diagnostic(
        code(arena::out_of_memory),
        help("Drop handles that are no longer needed or raise the arena capacity.")
    )]
    OutOfMemory {
        requested: usize,
        available: usize,
        used: usize,
        total: usize,
    },

    #[error("Double free of block {block}")]
    #[diagnostic(
        code(arena::double_free),
        help("The block was already released. A released handle's block must be freed exactly once.")
    )]
    DoubleFree { block: BlockId },

    #[error("Unknown block {block}")]
    #[diagnostic(code(arena::invalid_block), help("The id was never issued by this arena."))]
    InvalidBlock { block: BlockId },

    #[error("Use after free: block {block} has been released")]
    #[diagnostic(code(arena::use_after_free))]
    UseAfterFree { block: BlockId },

    #[error("Out of bounds: {len} bytes at offset {offset} exceed block {block} of {size} bytes")]
    #[diagnostic(code(arena::out_of_bounds))]
    OutOfBounds {
        block: BlockId,
        offset: usize,
        len: usize,
        size: usize,
    },
}

/// Tracked unit of arena storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub size: Size,
    pub sequence: Sequence,
    pub allocated_at: SystemTime,
    pub live: bool,
    pub label: String,
}

impl Block {
    pub(super) fn new(id: BlockId, size: Size, sequence: Sequence, label: &str) -> Self {
        Self {
            id,
            size,
            sequence,
            allocated_at: SystemTime::now(),
            live: true,
            label: label.to_string(),
        }
    }

    pub(super) fn free(&mut self) {
        self.live = false;
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn to_ref(&self) -> BlockRef {
        BlockRef {
            id: self.id,
            size: self.size,
        }
    }
}

/// Lightweight reference to a block handed out to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockRef {
    pub id: BlockId,
    pub size: Size,
}

/// Arena statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArenaStats {
    pub capacity: usize,
    pub used_bytes: usize,
    pub available_bytes: usize,
    pub peak_bytes: usize,
    pub usage_percentage: f64,
    pub live_blocks: usize,
    pub tombstones: usize,
    pub total_allocations: u64,
    pub total_deallocations: u64,
    pub pressure: MemoryPressure,
}

/// Memory pressure levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MemoryPressure {
    Low,
    Medium,
    High,
    Critical,
}

impl MemoryPressure {
    pub(crate) fn from_ratio(ratio: f64, medium: f64, warning: f64, critical: f64) -> Self {
        if ratio >= critical {
            MemoryPressure::Critical
        } else if ratio >= warning {
            MemoryPressure::High
        } else if ratio >= medium {
            MemoryPressure::Medium
        } else {
            MemoryPressure::Low
        }
    }
}

impl std::fmt::Display for MemoryPressure {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            MemoryPressure::Low => write!(f, "LOW"),
            MemoryPressure::Medium => write!(f, "MEDIUM"),
            MemoryPressure::High => write!(f, "HIGH"),
            MemoryPressure::Critical => write!(f, "CRITICAL"),
        }
    }
}
