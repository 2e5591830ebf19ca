/*!
 * Ownership Tour - Main Entry Point
 *
 * Walks the ownership primitives the way the memory lessons do:
 * - exclusive ownership and transfer
 * - shared ownership and reference counts
 * - manual release
 * - scoped locking across an error path
 */

use miette::Result;
use std::sync::Arc;
use tracing::info;

use ownership_kernel::{
    global, init_tracing, Arena, ExclusiveHandle, Handle, LockResource, OwnershipError,
    ScopeSpan, SharedHandle,
};

fn main() -> Result<()> {
    init_tracing();

    info!("Ownership tour starting...");
    info!("================================================");

    let arena = global::arena();

    exclusive_transfer(&arena)?;
    shared_counting(&arena)?;
    manual_release(&arena)?;
    scoped_lock_error_path(&arena);

    let report = global::shutdown().ok_or_else(|| miette::miette!("arena was not initialized"))?;
    info!(
        allocations = report.stats.total_allocations,
        deallocations = report.stats.total_deallocations,
        peak_bytes = report.stats.peak_bytes,
        "Tour finished"
    );

    if !report.is_clean() {
        return Err(miette::miette!("{} blocks leaked", report.leaked.len()));
    }
    Ok(())
}

fn exclusive_transfer(arena: &Arc<Arena>) -> Result<()> {
    let scope = ScopeSpan::new("exclusive_transfer", arena);
    let _entered = scope.enter();

    let mut h1 = ExclusiveHandle::new_in(arena, [0u8; 8])?;
    let h2 = ExclusiveHandle::transfer_from(&mut h1);
    info!(h1 = %h1.state(), h2 = %h2.state(), live = arena.live_count(), "after transfer");

    if let Err(e) = h1.try_ref() {
        info!(error = %e, "moved-from handle refuses access");
    }

    drop(h2);
    info!(live = arena.live_count(), "after dropping the owner");
    Ok(())
}

fn shared_counting(arena: &Arc<Arena>) -> Result<()> {
    let scope = ScopeSpan::new("shared_counting", arena);
    let _entered = scope.enter();

    let s1 = SharedHandle::new_in(arena, 100i32)?;
    {
        let s2 = s1.clone();
        info!(use_count = s2.use_count(), "inner scope shares the block");
    }
    info!(use_count = s1.use_count(), live = arena.live_count(), "inner copy dropped");
    Ok(())
}

fn manual_release(arena: &Arc<Arena>) -> Result<()> {
    let scope = ScopeSpan::new("manual_release", arena);
    let _entered = scope.enter();

    let mut handle = ExclusiveHandle::new_in(arena, 888u32)?;
    if let Some(released) = handle.release() {
        info!(value = released.value, block = %released.block.id, "released without freeing");
        arena.deallocate(released.block)?;
    }
    info!(vacant = handle.is_vacant(), live = arena.live_count(), "freed by hand");

    let mut p1 = ExclusiveHandle::new_in(arena, 42u32)?;
    let mut p2 = ExclusiveHandle::vacant(arena);
    if let Some(released) = p1.release() {
        p2.reset_released(released)?;
    }
    info!(p1 = %p1.state(), p2 = %p2.state(), live = arena.live_count(), "ownership handed back");
    Ok(())
}

fn scoped_lock_error_path(arena: &Arc<Arena>) {
    let resource = LockResource::new("tour", Vec::<ExclusiveHandle<Vec<u8>>>::new());

    let outcome: std::result::Result<(), OwnershipError> = resource.guarded(|buffers| {
        buffers.push(ExclusiveHandle::zeroed(arena, 64)?);
        // Larger than the whole arena
        buffers.push(ExclusiveHandle::zeroed(arena, arena.config().capacity + 1)?);
        Ok(())
    });

    if let Err(e) = &outcome {
        info!(
            error = %e,
            kind = e.kind(),
            locked = resource.is_locked(),
            releases = resource.releases(),
            "guarded scope failed after releasing the lock"
        );
    }
    drop(resource);
    info!(live = arena.live_count(), "buffers released with the resource");
}
