//! Flat primitive microbenchmarks
//!
//! Run with: cargo bench --bench kernels
//!
//! Metrics:
//! - ns/element
//! - throughput (elements/s) on the process-wide gang

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use flatseg::{bpermute, fold, pack, permute, randoms, scan, Array};

const SIZES: [usize; 4] = [1_000, 10_000, 100_000, 1_000_000];

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");

    for size in SIZES.iter() {
        let data: Array<i64> = (0..*size as i64).collect();

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let result = scan(|x, y| x + y, 0, black_box(&data));
                black_box(result);
            });
        });
    }

    group.finish();
}

fn bench_fold(c: &mut Criterion) {
    let mut group = c.benchmark_group("fold");

    for size in SIZES.iter() {
        let data: Array<f64> = randoms(*size, 1);

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(fold(|x, y| x + y, 0.0, black_box(&data))));
        });
    }

    group.finish();
}

fn bench_pack(c: &mut Criterion) {
    let mut group = c.benchmark_group("pack");

    for size in SIZES.iter() {
        let data: Array<i64> = (0..*size as i64).collect();
        let flags: Array<bool> = randoms(*size, 2);

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let result = pack(black_box(&data), black_box(&flags));
                black_box(result.ok());
            });
        });
    }

    group.finish();
}

fn bench_permute(c: &mut Criterion) {
    let mut group = c.benchmark_group("permute");

    let size = 1_000_000;
    let data: Array<i64> = (0..size as i64).collect();
    // stride coprime with the size: a bijection with poor locality
    let map: Array<usize> = (0..size).map(|i| (i * 7_919) % size).collect();

    group.throughput(Throughput::Elements(size as u64));
    group.bench_function("bpermute_1M", |b| {
        b.iter(|| black_box(bpermute(black_box(&data), black_box(&map)).ok()));
    });
    group.bench_function("permute_1M", |b| {
        b.iter(|| black_box(permute(black_box(&data), black_box(&map)).ok()));
    });

    group.finish();
}

criterion_group!(benches, bench_scan, bench_fold, bench_pack, bench_permute);
criterion_main!(benches);
