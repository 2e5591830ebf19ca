/*!
 * Process-Wide Arena
 *
 * Explicit process-wide arena with documented ownership of its lifecycle:
 * constructed on first use (or by `init`), torn down by `shutdown`.
 */

use super::{Arena, ArenaConfig, ArenaStats, Block, ConfigError};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{info, warn};

static GLOBAL_ARENA: Mutex<Option<Arc<Arena>>> = parking_lot::const_mutex(None);

/// Final accounting produced by `shutdown`
#[derive(Debug, Clone)]
pub struct ShutdownReport {
    pub stats: ArenaStats,
    pub leaked: Vec<Block>,
}

impl ShutdownReport {
    pub fn is_clean(&self) -> bool {
        self.leaked.is_empty()
    }
}

/// Install the process-wide arena with an explicit configuration
///
/// Fails if the arena already exists; call `shutdown` first to replace it.
pub fn init(config: ArenaConfig) -> Result<Arc<Arena>, ConfigError> {
    let mut slot = GLOBAL_ARENA.lock();
    if slot.is_some() {
        return Err(ConfigError::AlreadyInitialized);
    }
    let arena = Arc::new(Arena::with_config(config)?);
    *slot = Some(Arc::clone(&arena));
    Ok(arena)
}

/// Process-wide arena, constructed with defaults on first use
pub fn arena() -> Arc<Arena> {
    let mut slot = GLOBAL_ARENA.lock();
    Arc::clone(slot.get_or_insert_with(|| Arc::new(Arena::new())))
}

pub fn is_initialized() -> bool {
    GLOBAL_ARENA.lock().is_some()
}

/// Tear down the process-wide arena and report anything still live
///
/// Handles created from the arena keep their own `Arc`, so blocks they own
/// stay valid; they simply show up in the report as leaked.
pub fn shutdown() -> Option<ShutdownReport> {
    let arena = GLOBAL_ARENA.lock().take()?;
    let report = ShutdownReport {
        stats: arena.stats(),
        leaked: arena.leak_report(),
    };

    if report.is_clean() {
        info!(
            allocations = report.stats.total_allocations,
            "Process-wide arena shut down cleanly"
        );
    } else {
        for block in &report.leaked {
            warn!(
                block = %block.id,
                size = block.size,
                label = %block.label,
                "Block still live at shutdown"
            );
        }
    }

    Some(report)
}
