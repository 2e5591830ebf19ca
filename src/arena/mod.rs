/*!
 * Arena
 *
 * Tracking allocator that owns every block handed to the ownership handles.
 *
 * ## Features
 *
 * - **Budgeted allocation**: every block is charged against a fixed capacity,
 *   exhausting it fails with `OutOfMemory` instead of aborting
 * - **Monotonic identifiers**: block ids are never reused, so stale ids are
 *   always detectable
 * - **Live-set tracking**: `live_count()` and `leak_report()` expose exactly
 *   which blocks are still owned
 * - **Double-free detection**: releasing a freed block fails with
 *   `DoubleFree`, even after its tombstone has been collected
 * - **Lazy storage**: raw blocks materialize their bytes on first write
 *
 * The arena is `Send + Sync`; handles share it through `Arc<Arena>`.
 */

mod allocator;
mod config;
mod gc;
pub mod global;
mod storage;
mod types;

pub use config::{ArenaConfig, ConfigError};
pub use types::{ArenaError, ArenaResult, ArenaStats, Block, BlockRef, MemoryPressure};

use crate::core::types::{BlockId, Size};
use ahash::RandomState;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tracing::info;

/// Block arena
///
/// # Performance
/// - Cache-line aligned to prevent false sharing of atomic counters
#[repr(C, align(64))]
pub struct Arena {
    blocks: DashMap<BlockId, Block, RandomState>,
    // Materialized bytes for raw blocks, keyed by owning block
    storage: DashMap<BlockId, Box<[u8]>, RandomState>,
    next_id: AtomicU64,
    used_bytes: AtomicUsize,
    peak_bytes: AtomicUsize,
    live_blocks: AtomicUsize,
    tombstones: AtomicUsize,
    total_deallocations: AtomicU64,
    config: ArenaConfig,
}

impl Arena {
    pub fn new() -> Self {
        Self::build(ArenaConfig::default())
    }

    /// Create an arena with a custom capacity (useful for testing)
    ///
    /// Skips validation: a zero capacity is accepted, every non-empty
    /// allocation then fails with `OutOfMemory` and pressure reads `Critical`.
    pub fn with_capacity(capacity: Size) -> Self {
        Self::build(ArenaConfig::with_capacity(capacity))
    }

    pub fn with_config(config: ArenaConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: ArenaConfig) -> Self {
        info!(
            capacity = config.capacity,
            gc_threshold = config.gc_threshold,
            "Arena initialized"
        );
        Self {
            blocks: DashMap::with_hasher(RandomState::new()),
            storage: DashMap::with_hasher(RandomState::new()),
            next_id: AtomicU64::new(1),
            used_bytes: AtomicUsize::new(0),
            peak_bytes: AtomicUsize::new(0),
            live_blocks: AtomicUsize::new(0),
            tombstones: AtomicUsize::new(0),
            total_deallocations: AtomicU64::new(0),
            config,
        }
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Number of currently live blocks
    #[inline]
    pub fn live_count(&self) -> usize {
        self.live_blocks.load(Ordering::Acquire)
    }

    /// Bytes charged against the capacity by live blocks
    #[inline]
    pub fn used_bytes(&self) -> usize {
        self.used_bytes.load(Ordering::Acquire)
    }

    /// Whether `id` names a live block
    pub fn is_live(&self, id: BlockId) -> bool {
        self.blocks.get(&id).map_or(false, |entry| entry.live)
    }

    /// Fails unless `block` is live
    ///
    /// Freed blocks (collected or not) report `UseAfterFree`, ids this arena
    /// never issued report `InvalidBlock`.
    pub fn ensure_live(&self, block: BlockRef) -> ArenaResult<()> {
        self.live_entry(block.id).map(|_| ())
    }

    /// Snapshot of a block's metadata, live or tombstoned
    pub fn block(&self, id: BlockId) -> Option<Block> {
        self.blocks.get(&id).map(|entry| entry.value().clone())
    }

    pub fn block_size(&self, id: BlockId) -> Option<Size> {
        self.blocks.get(&id).map(|entry| entry.size)
    }

    /// Live blocks ordered by id
    ///
    /// An empty report at scope or program end means nothing leaked.
    pub fn leak_report(&self) -> Vec<Block> {
        let mut live: Vec<Block> = self
            .blocks
            .iter()
            .filter(|entry| entry.live)
            .map(|entry| entry.value().clone())
            .collect();
        live.sort_by_key(|block| block.id);
        live
    }

    pub fn pressure(&self) -> MemoryPressure {
        self.pressure_at(self.used_bytes())
    }

    pub(crate) fn pressure_at(&self, used: Size) -> MemoryPressure {
        let ratio = usage_ratio(used, self.config.capacity);
        MemoryPressure::from_ratio(
            ratio,
            self.config.medium_threshold,
            self.config.warning_threshold,
            self.config.critical_threshold,
        )
    }

    pub fn stats(&self) -> ArenaStats {
        let used = self.used_bytes();
        let capacity = self.config.capacity;
        ArenaStats {
            capacity,
            used_bytes: used,
            available_bytes: capacity.saturating_sub(used),
            peak_bytes: self.peak_bytes.load(Ordering::Acquire),
            usage_percentage: usage_ratio(used, capacity) * 100.0,
            live_blocks: self.live_count(),
            tombstones: self.tombstones.load(Ordering::Acquire),
            total_allocations: self.next_id.load(Ordering::Acquire) - 1,
            total_deallocations: self.total_deallocations.load(Ordering::Acquire),
            pressure: self.pressure_at(used),
        }
    }
}

/// Fraction of `capacity` in use; an empty budget counts as full
fn usage_ratio(used: Size, capacity: Size) -> f64 {
    if capacity == 0 {
        1.0
    } else {
        used as f64 / capacity as f64
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Arena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arena")
            .field("capacity", &self.config.capacity)
            .field("used_bytes", &self.used_bytes())
            .field("live_blocks", &self.live_count())
            .finish()
    }
}
