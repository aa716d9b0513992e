//! AvlSet operation benchmarks.
//!
//! Measures incremental construction (sorted vs shuffled input), lookup,
//! chain iteration and the constructive set operations across sizes.
//!
//! Pre-generated Vecs are reused via clone() in setup to avoid
//! regeneration overhead and keep benchmark data consistent across
//! iterations.

use chainset::ordered::AvlSet;
use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

const SIZES: [i32; 3] = [100, 1000, 10000];

/// Pre-generates input in ascending order.
fn generate_sorted_vec(size: i32) -> Vec<i32> {
    (0..size).collect()
}

/// Pre-generates input in a deterministic shuffled order.
fn generate_shuffled_vec(size: i32) -> Vec<i32> {
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    let mut elements = generate_sorted_vec(size);
    for index in (1..elements.len()).rev() {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        elements.swap(index, (state % (index as u64 + 1)) as usize);
    }
    elements
}

fn build_set(elements: &[i32]) -> AvlSet<i32> {
    elements.iter().copied().collect()
}

fn benchmark_insert(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("avl_set_insert");

    for size in SIZES {
        let sorted = generate_sorted_vec(size);
        group.bench_with_input(BenchmarkId::new("sorted", size), &size, |bencher, _| {
            bencher.iter_batched(
                || sorted.clone(),
                |elements| black_box(build_set(&elements)),
                BatchSize::SmallInput,
            );
        });

        let shuffled = generate_shuffled_vec(size);
        group.bench_with_input(BenchmarkId::new("shuffled", size), &size, |bencher, _| {
            bencher.iter_batched(
                || shuffled.clone(),
                |elements| black_box(build_set(&elements)),
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn benchmark_contains(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("avl_set_contains");

    for size in SIZES {
        let set = build_set(&generate_shuffled_vec(size));
        group.bench_with_input(BenchmarkId::new("hit_and_miss", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let hit = set.contains(black_box(&(size / 2)));
                let miss = set.contains(black_box(&size));
                black_box((hit, miss))
            });
        });
    }

    group.finish();
}

fn benchmark_iteration(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("avl_set_iteration");

    for size in SIZES {
        let set = build_set(&generate_shuffled_vec(size));
        group.bench_with_input(BenchmarkId::new("ascending", size), &size, |bencher, _| {
            bencher.iter(|| black_box(set.iter().copied().sum::<i32>()));
        });
    }

    group.finish();
}

fn benchmark_set_operations(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("avl_set_operations");

    for size in SIZES {
        let left = build_set(&generate_shuffled_vec(size));
        let right: AvlSet<i32> = ((size / 2)..(size + size / 2)).collect();

        group.bench_with_input(BenchmarkId::new("union", size), &size, |bencher, _| {
            bencher.iter(|| black_box(&left | &right));
        });
        group.bench_with_input(
            BenchmarkId::new("intersection", size),
            &size,
            |bencher, _| {
                bencher.iter(|| black_box(&left & &right));
            },
        );
        group.bench_with_input(BenchmarkId::new("difference", size), &size, |bencher, _| {
            bencher.iter(|| black_box(&left - &right));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_insert,
    benchmark_contains,
    benchmark_iteration,
    benchmark_set_operations
);
criterion_main!(benches);
