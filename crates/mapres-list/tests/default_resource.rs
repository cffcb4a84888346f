//! Integration test: replacing the process-wide default resource.
//!
//! Lives in its own test binary because it mutates process-global state.

use std::sync::LazyLock;

use mapres_arena::MapResource;
use mapres_core::{default_resource, same_resource, set_default_resource, system_resource};
use mapres_list::SList;

static ARENA: LazyLock<MapResource> = LazyLock::new(|| MapResource::new(64 * 1024));

#[test]
fn new_lists_follow_the_installed_default() {
    let mut before: SList<'static, u32> = SList::new();
    assert!(same_resource(before.resource(), system_resource()));

    let previous = set_default_resource(&*ARENA);
    assert!(same_resource(previous, system_resource()));
    assert!(same_resource(default_resource(), &*ARENA));

    let mut after: SList<'static, u32> = SList::default();
    assert!(same_resource(after.resource(), &*ARENA));
    after.push_front(1).unwrap();
    after.push_front(2).unwrap();
    let used = ARENA.used();
    assert!(used > 0);

    // Lists built earlier keep the resource they were built with.
    before.push_front(3).unwrap();
    assert_eq!(ARENA.used(), used);

    drop(after);
    assert_eq!(ARENA.stats().free_blocks, 2);

    let restored = set_default_resource(previous);
    assert!(same_resource(restored, &*ARENA));
    assert!(same_resource(default_resource(), system_resource()));
}
