/*!
 * Exclusive Handle Tests
 */

use ownership_kernel::{
    Arena, ArenaError, ExclusiveHandle, Handle, HandleError, HandleState, OwnershipError,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn arena() -> Arc<Arena> {
    Arc::new(Arena::with_capacity(4096))
}

#[test]
fn test_vacant_handle_is_noop_on_drop() {
    let arena = arena();
    let handle: ExclusiveHandle<u64> = ExclusiveHandle::vacant(&arena);
    assert_eq!(handle.state(), HandleState::Vacant);
    drop(handle);
    assert_eq!(arena.stats().total_deallocations, 0);
}

#[test]
fn test_chained_transfers_keep_single_owner() {
    let arena = arena();
    let mut a = ExclusiveHandle::new_in(&arena, String::from("payload")).unwrap();
    let block = a.block().unwrap();

    let mut b = ExclusiveHandle::transfer_from(&mut a);
    let c = ExclusiveHandle::transfer_from(&mut b);

    assert!(a.is_vacant());
    assert!(b.is_vacant());
    assert_eq!(c.block(), Some(block));
    assert_eq!(c.try_ref().unwrap(), "payload");

    drop(a);
    drop(b);
    assert_eq!(arena.live_count(), 1);
    drop(c);
    assert_eq!(arena.live_count(), 0);
    assert_eq!(arena.stats().total_deallocations, 1);
}

#[test]
fn test_null_access_is_an_error() {
    let arena = arena();
    let mut handle = ExclusiveHandle::new_in(&arena, 3i32).unwrap();
    handle.reset(None).unwrap();

    let err: OwnershipError = handle.try_mut().unwrap_err().into();
    assert_eq!(err.kind(), "null_access");
}

#[test]
fn test_allocation_failure_leaves_arena_untouched() {
    let arena = Arc::new(Arena::with_capacity(4));
    let err = ExclusiveHandle::new_in(&arena, 0u64).unwrap_err();

    assert!(matches!(
        err,
        HandleError::Arena(ArenaError::OutOfMemory { requested: 8, .. })
    ));
    assert_eq!(arena.live_count(), 0);
    assert_eq!(arena.used_bytes(), 0);
}

#[test]
fn test_reset_reuses_freed_budget() {
    let arena = Arc::new(Arena::with_capacity(8));
    let mut handle = ExclusiveHandle::new_in(&arena, [0u8; 8]).unwrap();

    // The old block is released before the replacement is charged
    handle.reset(Some([1u8; 8])).unwrap();
    assert_eq!(arena.live_count(), 1);
    assert_eq!(handle.try_ref().unwrap(), &[1u8; 8]);

    assert!(ExclusiveHandle::new_in(&arena, 0u8).is_err());
    drop(handle);
    assert!(ExclusiveHandle::new_in(&arena, 0u8).is_ok());
}

#[test]
fn test_leak_report_names_type() {
    let arena = arena();
    let handle = ExclusiveHandle::new_in(&arena, 1u32).unwrap();

    let report = arena.leak_report();
    assert_eq!(report.len(), 1);
    assert_eq!(report[0].label, "u32");
    drop(handle);
}
