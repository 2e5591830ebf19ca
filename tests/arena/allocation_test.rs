/*!
 * Arena Allocation Tests
 */

use ownership_kernel::{Arena, ArenaConfig, ArenaError, BlockId, MemoryPressure};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::thread;

#[test]
fn test_live_set_tracks_allocations() {
    let arena = Arena::with_capacity(1024);

    let a = arena.allocate(16).unwrap();
    let b = arena.allocate(32).unwrap();
    let c = arena.allocate(64).unwrap();
    assert_eq!(arena.live_count(), 3);
    assert_eq!(arena.used_bytes(), 112);

    arena.deallocate(b).unwrap();
    assert_eq!(arena.live_count(), 2);
    assert!(arena.is_live(a.id));
    assert!(!arena.is_live(b.id));
    assert!(arena.is_live(c.id));

    let leaked: Vec<BlockId> = arena.leak_report().iter().map(|block| block.id).collect();
    assert_eq!(leaked, vec![a.id, c.id]);

    arena.deallocate(a).unwrap();
    arena.deallocate(c).unwrap();
    assert_eq!(arena.live_count(), 0);
    assert!(arena.leak_report().is_empty());
}

#[test]
fn test_out_of_memory_is_recoverable() {
    let arena = Arena::with_capacity(100);
    let first = arena.allocate(60).unwrap();

    let err = arena.allocate(50).unwrap_err();
    assert_eq!(
        err,
        ArenaError::OutOfMemory {
            requested: 50,
            available: 40,
            used: 60,
            total: 100,
        }
    );
    assert_eq!(arena.live_count(), 1);
    assert_eq!(arena.used_bytes(), 60);

    arena.deallocate(first).unwrap();
    assert!(arena.allocate(100).is_ok());
}

#[test]
fn test_double_free_detected() {
    let arena = Arena::with_capacity(128);
    let block = arena.allocate(8).unwrap();

    arena.deallocate(block).unwrap();
    assert_eq!(
        arena.deallocate(block),
        Err(ArenaError::DoubleFree { block: block.id })
    );
    assert_eq!(arena.stats().total_deallocations, 1);
}

#[test]
fn test_double_free_detected_after_collection() {
    let arena = Arena::with_config(ArenaConfig::with_capacity(128).with_gc_threshold(1)).unwrap();
    let block = arena.allocate(8).unwrap();

    arena.deallocate(block).unwrap();
    assert!(arena.block(block.id).is_none(), "tombstone collected");
    assert_eq!(
        arena.deallocate(block),
        Err(ArenaError::DoubleFree { block: block.id })
    );
}

#[test]
fn test_stats_and_pressure() {
    let arena = Arena::with_capacity(100);
    let blocks: Vec<_> = (0..9).map(|_| arena.allocate(10).unwrap()).collect();

    let stats = arena.stats();
    assert_eq!(stats.used_bytes, 90);
    assert_eq!(stats.available_bytes, 10);
    assert_eq!(stats.peak_bytes, 90);
    assert_eq!(stats.total_allocations, 9);
    assert_eq!(stats.pressure, MemoryPressure::High);

    for block in blocks {
        arena.deallocate(block).unwrap();
    }
    let stats = arena.stats();
    assert_eq!(stats.used_bytes, 0);
    assert_eq!(stats.peak_bytes, 90);
    assert_eq!(stats.pressure, MemoryPressure::Low);
}

#[test]
fn test_concurrent_allocation_respects_capacity() {
    let arena = Arc::new(Arena::with_capacity(64 * 100));

    let workers: Vec<_> = (0..8)
        .map(|_| {
            let arena = Arc::clone(&arena);
            thread::spawn(move || {
                let mut owned = Vec::new();
                while let Ok(block) = arena.allocate(64) {
                    owned.push(block);
                }
                owned
            })
        })
        .collect();

    let mut all = Vec::new();
    for worker in workers {
        all.extend(worker.join().unwrap());
    }

    assert_eq!(all.len(), 100);
    assert_eq!(arena.live_count(), 100);
    assert_eq!(arena.used_bytes(), 64 * 100);

    let mut ids: Vec<_> = all.iter().map(|block| block.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 100, "every block has a distinct id");

    for block in all {
        arena.deallocate(block).unwrap();
    }
    assert_eq!(arena.live_count(), 0);
}
