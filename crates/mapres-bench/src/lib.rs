//! Benchmark workloads for mapres.
//!
//! Provides deterministic allocate/release sequences that can be replayed
//! against any [`MemoryResource`]:
//!
//! - [`Workload::generate`]: a seeded mix of allocations and releases with
//!   a bounded number of live blocks
//! - [`Workload::run`]: replay the sequence, releasing anything still live
//!   at the end
//!
//! The same seed always yields the same sequence, so two resources can be
//! compared on identical traffic.

#![deny(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::alloc::Layout;
use std::ptr::NonNull;

use mapres_core::MemoryResource;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Request sizes drawn by [`Workload::generate`], in bytes.
pub const SIZES: [usize; 8] = [8, 16, 24, 32, 48, 64, 128, 256];

/// Request alignments drawn by [`Workload::generate`].
pub const ALIGNS: [usize; 5] = [1, 2, 4, 8, 16];

/// One step of a workload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    /// Allocate a block and store it in `slot`.
    Alloc { slot: usize, layout: Layout },
    /// Release the block stored in `slot`.
    Free { slot: usize },
}

/// A replayable allocate/release sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Workload {
    pub ops: Vec<Op>,
    /// Number of distinct slots referenced by `ops`.
    pub slots: usize,
}

/// Outcome of [`Workload::run`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub allocated: usize,
    pub released: usize,
    pub failed: usize,
}

impl Workload {
    /// Generate `len` operations from `seed`, never holding more than
    /// `max_live` blocks at once.
    ///
    /// Allocations are twice as likely as releases until `max_live` is
    /// reached, which forces a release.
    pub fn generate(seed: u64, len: usize, max_live: usize) -> Self {
        assert!(max_live > 0, "max_live must be non-zero");
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut ops = Vec::with_capacity(len);
        let mut live: Vec<usize> = Vec::with_capacity(max_live);
        let mut slots = 0;

        for _ in 0..len {
            let release = !live.is_empty() && (live.len() == max_live || rng.random_ratio(1, 3));
            if release {
                let idx = rng.random_range(0..live.len());
                ops.push(Op::Free {
                    slot: live.swap_remove(idx),
                });
            } else {
                let size = SIZES[rng.random_range(0..SIZES.len())];
                let align = ALIGNS[rng.random_range(0..ALIGNS.len())];
                let layout = Layout::from_size_align(size, align)
                    .unwrap_or_else(|_| Layout::new::<u8>());
                ops.push(Op::Alloc {
                    slot: slots,
                    layout,
                });
                live.push(slots);
                slots += 1;
            }
        }

        Self { ops, slots }
    }

    /// Replay against `resource`. Blocks still live at the end are released,
    /// so the resource ends with no outstanding allocations.
    ///
    /// A refused allocation is counted in [`RunSummary::failed`] and its
    /// later release is skipped.
    #[allow(unsafe_code)]
    pub fn run(&self, resource: &dyn MemoryResource) -> RunSummary {
        let mut held: Vec<Option<(NonNull<u8>, Layout)>> = vec![None; self.slots];
        let mut summary = RunSummary::default();

        for op in &self.ops {
            match *op {
                Op::Alloc { slot, layout } => match resource.allocate(layout) {
                    Ok(ptr) => {
                        held[slot] = Some((ptr, layout));
                        summary.allocated += 1;
                    }
                    Err(_) => summary.failed += 1,
                },
                Op::Free { slot } => {
                    if let Some((ptr, layout)) = held[slot].take() {
                        // SAFETY: `ptr` was allocated from `resource` with
                        // `layout` and is released once.
                        unsafe { resource.deallocate(ptr, layout) };
                        summary.released += 1;
                    }
                }
            }
        }

        for (ptr, layout) in held.into_iter().flatten() {
            // SAFETY: as above; these blocks were never released.
            unsafe { resource.deallocate(ptr, layout) };
            summary.released += 1;
        }
        summary
    }

    /// Number of allocation steps.
    pub fn allocs(&self) -> usize {
        self.slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapres_arena::MapResource;
    use mapres_test_utils::{FailingResource, TrackingResource};

    #[test]
    fn generation_is_deterministic() {
        let a = Workload::generate(42, 500, 16);
        let b = Workload::generate(42, 500, 16);
        assert_eq!(a, b);
        assert_ne!(a, Workload::generate(43, 500, 16));
    }

    #[test]
    fn live_blocks_stay_bounded() {
        let w = Workload::generate(7, 2000, 8);
        let mut live = 0usize;
        for op in &w.ops {
            match op {
                Op::Alloc { .. } => live += 1,
                Op::Free { .. } => live -= 1,
            }
            assert!(live <= 8);
        }
    }

    #[test]
    fn every_slot_is_freed_at_most_once() {
        let w = Workload::generate(3, 1000, 32);
        let mut freed = vec![false; w.slots];
        for op in &w.ops {
            if let Op::Free { slot } = *op {
                assert!(!freed[slot], "slot {slot} freed twice");
                freed[slot] = true;
            }
        }
    }

    #[test]
    fn run_leaves_nothing_live() {
        let w = Workload::generate(11, 1000, 64);
        let res = TrackingResource::new();
        let summary = w.run(&res);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.allocated, w.allocs());
        assert_eq!(summary.released, summary.allocated);
        assert_eq!(res.live_count(), 0);
    }

    #[test]
    fn run_on_arena_recycles_blocks() {
        let w = Workload::generate(5, 4000, 16);
        let res = MapResource::new(1 << 20);
        let summary = w.run(&res);
        assert_eq!(summary.failed, 0);
        // Far fewer bytes are carved than the workload requests in total.
        let requested: usize = w
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Alloc { layout, .. } => Some(layout.size()),
                Op::Free { .. } => None,
            })
            .sum();
        assert!(res.used() < requested);
    }

    #[test]
    fn refused_allocations_are_counted_and_skipped() {
        let w = Workload::generate(9, 200, 4);
        let res = FailingResource::after(10);
        let summary = w.run(&res);
        assert_eq!(summary.allocated, 10);
        assert_eq!(summary.failed, w.allocs() - 10);
        assert_eq!(summary.released, 10);
    }
}
