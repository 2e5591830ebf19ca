/*!
 * Limits and Constants
 *
 * Default budgets and thresholds for the arena, grouped in one place.
 */

// =============================================================================
// ARENA LIMITS
// =============================================================================

/// Default arena capacity (64MB)
/// Budget every allocation is charged against
pub const DEFAULT_ARENA_CAPACITY: usize = 64 * 1024 * 1024;

/// Usage ratio reported as medium pressure
pub const PRESSURE_MEDIUM_RATIO: f64 = 0.60;

/// Usage ratio reported as high pressure (logged on allocation)
pub const PRESSURE_WARNING_RATIO: f64 = 0.80;

/// Usage ratio reported as critical pressure
pub const PRESSURE_CRITICAL_RATIO: f64 = 0.95;

/// Freed-block tombstones accumulated before an automatic collection
pub const DEFAULT_GC_THRESHOLD: usize = 1000;

/// Label recorded for raw byte blocks
pub const RAW_BLOCK_LABEL: &str = "bytes";
