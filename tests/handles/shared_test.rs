/*!
 * Shared Handle Tests
 */

use ownership_kernel::{Arena, ExclusiveHandle, Handle, SharedHandle, SharedRef};
use pretty_assertions::assert_eq;
use std::sync::{Arc, Barrier};
use std::thread;

fn arena() -> Arc<Arena> {
    Arc::new(Arena::with_capacity(4096))
}

fn total_uses<R: SharedRef>(handles: &[R]) -> usize {
    handles.first().map_or(0, |handle| handle.use_count())
}

#[test]
fn test_use_count_follows_copies() {
    let arena = arena();
    let first = SharedHandle::new_in(&arena, vec![1u8, 2, 3]).unwrap();

    let mut copies: Vec<_> = (0..4).map(|_| first.clone()).collect();
    assert_eq!(total_uses(&copies), 5);

    copies.truncate(1);
    assert_eq!(first.use_count(), 2);
    assert_eq!(arena.live_count(), 1);

    drop(copies);
    assert!(first.is_last_ref());
    drop(first);
    assert_eq!(arena.live_count(), 0);
}

#[test]
fn test_copy_of_empty_is_empty() {
    let empty = SharedHandle::<u8>::default();
    let copy = empty.clone();
    assert!(copy.is_vacant());
    assert_eq!(copy.use_count(), 0);
    assert!(copy.try_ref().is_err());
}

#[test]
fn test_exclusive_to_shared_conversion() {
    let arena = arena();
    let exclusive = ExclusiveHandle::new_in(&arena, 10u16).unwrap();
    let block = exclusive.block().unwrap();

    let shared = SharedHandle::from_exclusive(exclusive);
    let copy = shared.clone();
    assert_eq!(copy.block(), Some(block));
    assert_eq!(arena.stats().total_allocations, 1);

    drop(shared);
    drop(copy);
    assert!(!arena.is_live(block.id));
}

#[test]
fn test_concurrent_clone_and_drop() {
    let arena = arena();
    let shared = SharedHandle::new_in(&arena, 5u64).unwrap();
    let barrier = Arc::new(Barrier::new(8));

    let workers: Vec<_> = (0..8)
        .map(|_| {
            let local = shared.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..1000 {
                    let copy = local.clone();
                    assert_eq!(*copy.try_ref().unwrap(), 5);
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(shared.use_count(), 1);
    assert_eq!(arena.live_count(), 1);
    drop(shared);
    assert_eq!(arena.live_count(), 0);
    assert_eq!(arena.stats().total_deallocations, 1);
}
