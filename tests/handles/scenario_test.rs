/*!
 * Ownership Scenarios
 *
 * End-to-end walks through transfer, sharing and manual release
 */

use ownership_kernel::{Arena, ArenaError, ExclusiveHandle, Handle, HandleError, SharedHandle};
use pretty_assertions::assert_eq;
use std::sync::Arc;

#[test]
fn test_transfer_then_destroy() {
    let arena = Arc::new(Arena::with_capacity(1024));

    let mut h1 = ExclusiveHandle::new_in(&arena, [0u8; 8]).unwrap();
    assert_eq!(h1.block().unwrap().size, 8);

    let h2 = ExclusiveHandle::transfer_from(&mut h1);
    assert!(h1.is_vacant());
    assert!(!h2.is_vacant());
    assert_eq!(arena.live_count(), 1);

    drop(h2);
    assert_eq!(arena.live_count(), 0);
}

#[test]
fn test_shared_copies_release_on_last_drop() {
    let arena = Arc::new(Arena::with_capacity(1024));

    let s1 = SharedHandle::new_in(&arena, 100i32).unwrap();
    let s2 = s1.clone();
    assert_eq!(s1.use_count(), 2);

    drop(s1);
    assert_eq!(s2.use_count(), 1);
    assert_eq!(arena.live_count(), 1);

    drop(s2);
    assert_eq!(arena.live_count(), 0);
}

#[test]
fn test_release_then_manual_deallocate() {
    let arena = Arc::new(Arena::with_capacity(1024));

    let mut handle = ExclusiveHandle::new_in(&arena, 888u32).unwrap();
    let released = handle.release().unwrap();
    assert_eq!(released.value, 888);
    assert!(handle.is_vacant());

    arena.deallocate(released.block).unwrap();
    drop(handle);

    assert_eq!(arena.live_count(), 0);
    assert_eq!(arena.stats().total_deallocations, 1);
    assert_eq!(
        arena.deallocate(released.block),
        Err(ArenaError::DoubleFree {
            block: released.block.id
        })
    );
}

#[test]
fn test_release_then_adopt() {
    let arena = Arc::new(Arena::with_capacity(1024));

    let mut p1 = ExclusiveHandle::new_in(&arena, 7u64).unwrap();
    let p2 = ExclusiveHandle::from_released(&arena, p1.release().unwrap()).unwrap();
    assert!(p1.is_vacant());
    assert_eq!(*p2.try_ref().unwrap(), 7);
    assert_eq!(arena.live_count(), 1);

    drop(p1);
    drop(p2);
    assert_eq!(arena.live_count(), 0);
    assert_eq!(arena.stats().total_deallocations, 1);
}

#[test]
fn test_adopting_freed_block_fails() {
    let arena = Arc::new(Arena::with_capacity(1024));

    let mut handle = ExclusiveHandle::new_in(&arena, 9u16).unwrap();
    let released = handle.release().unwrap();
    let block = released.block;
    arena.deallocate(block).unwrap();

    let err = ExclusiveHandle::from_released(&arena, released).unwrap_err();
    assert_eq!(
        err,
        HandleError::Arena(ArenaError::UseAfterFree { block: block.id })
    );
    assert_eq!(arena.live_count(), 0);
    assert_eq!(arena.stats().total_deallocations, 1);
}
