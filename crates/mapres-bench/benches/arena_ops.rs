//! Criterion micro-benchmarks for arena allocation and recycling.

use std::alloc::Layout;
use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use mapres_arena::{MapResource, MemoryResource};
use mapres_bench::Workload;
use mapres_core::SystemResource;

const CAPACITY: usize = 1 << 20;

fn layout(size: usize, align: usize) -> Layout {
    Layout::from_size_align(size, align).unwrap()
}

/// Benchmark: 1024 fresh 64-byte bump allocations from a new arena.
fn bench_bump_1k(c: &mut Criterion) {
    c.bench_function("arena_bump_1k", |b| {
        b.iter_batched(
            || MapResource::new(CAPACITY),
            |res| {
                for _ in 0..1024 {
                    black_box(res.allocate(layout(64, 8)).unwrap());
                }
                res
            },
            BatchSize::SmallInput,
        );
    });
}

/// Benchmark: allocate/release of one block, served from the registry.
fn bench_recycle_hit(c: &mut Criterion) {
    let res = MapResource::new(CAPACITY);
    let warm = res.allocate(layout(64, 8)).unwrap();
    // SAFETY: `warm` came from `res` with this layout.
    unsafe { res.deallocate(warm, layout(64, 8)) };

    c.bench_function("arena_recycle_hit", |b| {
        b.iter(|| {
            let p = res.allocate(layout(64, 8)).unwrap();
            // SAFETY: `p` came from `res` with this layout.
            unsafe { res.deallocate(black_box(p), layout(64, 8)) };
        });
    });
}

/// Benchmark: mixed seeded workload, arena against the global allocator.
fn bench_workload(c: &mut Criterion) {
    let workload = Workload::generate(42, 10_000, 256);

    let mut group = c.benchmark_group("workload_10k");
    group.bench_function("map_resource", |b| {
        b.iter_batched(
            || MapResource::new(CAPACITY * 4),
            |res| {
                black_box(workload.run(&res));
                res
            },
            BatchSize::SmallInput,
        );
    });
    group.bench_function("system_resource", |b| {
        b.iter(|| black_box(workload.run(&SystemResource)));
    });
    group.finish();
}

criterion_group!(benches, bench_bump_1k, bench_recycle_hit, bench_workload);
criterion_main!(benches);
