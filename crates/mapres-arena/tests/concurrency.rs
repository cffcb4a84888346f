//! Integration test: one `MapResource` shared by many threads.
//!
//! Threads allocate concurrently and hand their blocks to a single
//! releasing thread over a channel. Every block must be aligned and
//! distinct while live, and every released block must come back.

use std::alloc::Layout;
use std::collections::HashSet;
use std::ptr::NonNull;
use std::thread;

use crossbeam_channel::unbounded;
use mapres_arena::{MapResource, MemoryResource};

const THREADS: usize = 8;
const PER_THREAD: usize = 64;
const BLOCK: usize = 48;
const ALIGN: usize = 16;

/// A block address moved between threads.
struct SendPtr(NonNull<u8>);

// SAFETY: the pointer is only used as an address to release; the resource
// is `Sync` and the block is never dereferenced.
unsafe impl Send for SendPtr {}

fn block_layout() -> Layout {
    Layout::from_size_align(BLOCK, ALIGN).unwrap()
}

fn allocate_round(res: &MapResource) -> Vec<usize> {
    thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                s.spawn(|| {
                    (0..PER_THREAD)
                        .map(|_| res.allocate(block_layout()).unwrap().as_ptr() as usize)
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect()
    })
}

#[test]
fn concurrent_allocations_are_aligned_and_distinct() {
    let _ = env_logger::builder().is_test(true).try_init();

    let res = MapResource::new(THREADS * PER_THREAD * (BLOCK + ALIGN));
    let addrs = allocate_round(&res);

    assert_eq!(addrs.len(), THREADS * PER_THREAD);
    assert!(addrs.iter().all(|a| a % ALIGN == 0));
    let distinct: HashSet<_> = addrs.iter().collect();
    assert_eq!(distinct.len(), addrs.len());
    let mut sorted = addrs.clone();
    sorted.sort_unstable();
    assert!(sorted.windows(2).all(|w| w[1] - w[0] >= BLOCK));
}

#[test]
fn blocks_released_on_another_thread_are_recycled() {
    let res = MapResource::new(THREADS * PER_THREAD * (BLOCK + ALIGN));
    let (tx, rx) = unbounded::<SendPtr>();

    thread::scope(|s| {
        let releaser = s.spawn(|| {
            let mut released = 0usize;
            for SendPtr(ptr) in rx.iter() {
                // SAFETY: every pointer on the channel was allocated from
                // `res` with `block_layout()` and is released once.
                unsafe { res.deallocate(ptr, block_layout()) };
                released += 1;
            }
            released
        });

        for _ in 0..THREADS {
            let tx = tx.clone();
            s.spawn(|| {
                let tx = tx;
                for _ in 0..PER_THREAD {
                    let ptr = res.allocate(block_layout()).unwrap();
                    tx.send(SendPtr(ptr)).unwrap();
                }
            });
        }
        drop(tx);

        assert_eq!(releaser.join().unwrap(), THREADS * PER_THREAD);
    });

    // Every carved block was released exactly once and is now on file.
    let used = res.used();
    let stats = res.stats();
    assert!(stats.free_blocks > 0);
    assert_eq!(stats.free_blocks * BLOCK, used);

    for _ in 0..stats.free_blocks {
        res.allocate(block_layout()).unwrap();
    }
    assert_eq!(res.used(), used, "recycling must not touch the bump offset");
    assert_eq!(res.stats().free_blocks, 0);
}

#[test]
fn exhaustion_under_contention_is_clean() {
    let res = MapResource::new(PER_THREAD * BLOCK);
    let successes: usize = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                s.spawn(|| {
                    (0..PER_THREAD)
                        .filter(|_| res.allocate(block_layout()).is_ok())
                        .count()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).sum()
    });

    assert!(successes <= PER_THREAD);
    assert!(res.used() <= res.capacity());
    assert!(res.allocate(block_layout()).is_err());
}
