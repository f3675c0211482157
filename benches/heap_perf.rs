//! Criterion benchmarks for the core heap operations
//!
//! Run with `cargo bench`. Use Criterion's filter to run subsets, e.g.
//! `cargo bench -- extract_min`.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use fibheap::FibonacciHeap;

const SIZES: [usize; 3] = [1_000, 10_000, 100_000];

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for size in SIZES {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let mut heap = FibonacciHeap::with_capacity(size);
                for i in 0..size {
                    heap.insert(black_box((i * 2_654_435_761) % size), i);
                }
                heap
            });
        });
    }
    group.finish();
}

fn bench_extract_min(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_min");
    for size in SIZES {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter_batched(
                || {
                    let mut heap = FibonacciHeap::with_capacity(size);
                    for i in 0..size {
                        heap.insert((i * 2_654_435_761) % size, i);
                    }
                    heap
                },
                |mut heap| {
                    while let Some(pair) = heap.pop() {
                        black_box(pair);
                    }
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_decrease_key(c: &mut Criterion) {
    let mut group = c.benchmark_group("decrease_key");
    for size in SIZES {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter_batched(
                || {
                    let mut heap = FibonacciHeap::with_capacity(size);
                    let handles: Vec<_> = (0..size)
                        .map(|i| heap.insert((size + i) as i64, i))
                        .collect();
                    // Consolidate so decreases hit nodes inside trees;
                    // this stales handles[0]
                    heap.pop();
                    (heap, handles)
                },
                |(mut heap, handles)| {
                    for (i, handle) in handles.iter().enumerate().skip(1) {
                        heap.decrease_key(*handle, i as i64).unwrap();
                    }
                    heap
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");
    for size in SIZES {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter_batched(
                || {
                    let mut a = FibonacciHeap::with_capacity(size);
                    let mut d = FibonacciHeap::with_capacity(size);
                    for i in 0..size {
                        a.insert(i * 2, i);
                        d.insert(i * 2 + 1, i);
                    }
                    (a, d)
                },
                |(mut a, d)| {
                    a.merge(d);
                    a
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_insert,
    bench_extract_min,
    bench_decrease_key,
    bench_merge
);
criterion_main!(benches);
