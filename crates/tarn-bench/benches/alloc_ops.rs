//! Criterion micro-benchmarks for raw allocation: heap control, fixed page,
//! and growing arena.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use tarn_arena::{GrowingAllocator, PageAllocator, PAGE_SIZE};
use tarn_bench::{fill_with_blocks, BLOCK_BYTES};
use tarn_collections::new_value;
use tarn_core::Allocator;

const BLOCKS_PER_RESET: usize = 1000;

/// Heap baseline: one boxed page-sized buffer per iteration.
fn bench_heap_control(c: &mut Criterion) {
    c.bench_function("heap_box_page", |b| {
        b.iter(|| {
            let page = Box::new([0u64; PAGE_SIZE / 8]);
            black_box(page);
        });
    });
}

/// Fill a page with 8-byte values, then reset.
fn bench_page_fill_reset(c: &mut Criterion) {
    let mut page = PageAllocator::boxed();
    c.bench_function("page_fill_u64_reset", |b| {
        b.iter(|| {
            for i in 0..(PAGE_SIZE / 8) as u64 {
                new_value::<u64>(&*page).unwrap().set(black_box(i)).unwrap();
            }
            page.reset();
        });
    });
}

/// Reserve 1000 × 1 KiB blocks per reset. The first iteration pays for
/// the relocations; later ones reuse the grown buffer.
fn bench_growing_blocks(c: &mut Criterion) {
    let mut arena = GrowingAllocator::default();
    c.bench_function("growing_1000x1k_reset", |b| {
        b.iter(|| {
            black_box(fill_with_blocks(&arena, BLOCKS_PER_RESET).unwrap());
            arena.reset();
        });
    });
}

/// Same workload on a fresh arena every iteration, so every relocation is
/// paid each time.
fn bench_growing_blocks_cold(c: &mut Criterion) {
    c.bench_function("growing_1000x1k_cold", |b| {
        b.iter_batched(
            GrowingAllocator::default,
            |arena| {
                black_box(fill_with_blocks(&arena, BLOCKS_PER_RESET).unwrap());
                black_box(arena.used() / BLOCK_BYTES);
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    bench_heap_control,
    bench_page_fill_reset,
    bench_growing_blocks,
    bench_growing_blocks_cold,
);
criterion_main!(benches);
