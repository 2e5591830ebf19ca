/*!
 * Process-Wide Arena Tests
 */

use ownership_kernel::arena::global;
use ownership_kernel::{ArenaConfig, ExclusiveHandle};
use serial_test::serial;

#[test]
#[serial]
fn test_init_then_shutdown_clean() {
    global::shutdown();

    let arena = global::init(ArenaConfig::with_capacity(512)).unwrap();
    assert_eq!(arena.config().capacity, 512);
    assert!(global::init(ArenaConfig::default()).is_err());

    {
        let handle = ExclusiveHandle::new_in(&global::arena(), 1u64).unwrap();
        assert_eq!(arena.live_count(), 1);
        drop(handle);
    }

    let report = global::shutdown().unwrap();
    assert!(report.is_clean());
    assert_eq!(report.stats.total_allocations, 1);
    assert!(!global::is_initialized());
}

#[test]
#[serial]
fn test_shutdown_reports_leaks() {
    global::shutdown();

    let arena = global::arena();
    let mut handle = ExclusiveHandle::new_in(&arena, [0u8; 24]).unwrap();
    let released = handle.release().unwrap();

    let report = global::shutdown().unwrap();
    assert_eq!(report.leaked.len(), 1);
    assert_eq!(report.leaked[0].id, released.block.id);
    assert_eq!(report.leaked[0].size, 24);

    // Handles keep their own reference, so the block can still be freed
    arena.deallocate(released.block).unwrap();
    assert!(global::shutdown().is_none());
}
