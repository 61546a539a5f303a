//! Segmented primitive benchmarks
//!
//! Run with: cargo bench --bench segmented
//!
//! Segment lengths are drawn uniformly from a range, so one chunk usually
//! spans many segments and some segments span chunk boundaries.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use flatseg::{append_s, fold_s, random_rs, replicate_s, Array, Segd};

fn segd_up_to(segments: usize, max_len: usize) -> Segd {
    let lens = random_rs(segments, 0..=max_len, 7).unwrap_or_default();
    Segd::from_lengths(lens)
}

fn bench_fold_s(c: &mut Criterion) {
    let mut group = c.benchmark_group("fold_s");

    for max_len in [2usize, 16, 256, 65_536].iter() {
        let segd = segd_up_to(1_000_000 / (*max_len / 2 + 1), *max_len);
        let data: Array<i64> = (0..segd.elements() as i64).collect();

        group.throughput(Throughput::Elements(segd.elements() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(max_len), max_len, |b, _| {
            b.iter(|| {
                let result = fold_s(|x, y| x + y, 0, black_box(&segd), black_box(&data));
                black_box(result.ok());
            });
        });
    }

    group.finish();
}

fn bench_replicate_s(c: &mut Criterion) {
    let mut group = c.benchmark_group("replicate_s");

    let segd = segd_up_to(100_000, 20);
    let values: Array<f64> = (0..segd.len()).map(|i| i as f64).collect();

    group.throughput(Throughput::Elements(segd.elements() as u64));
    group.bench_function("100k_segments", |b| {
        b.iter(|| black_box(replicate_s(black_box(&segd), black_box(&values)).ok()));
    });

    group.finish();
}

fn bench_append_s(c: &mut Criterion) {
    let mut group = c.benchmark_group("append_s");

    let segd = segd_up_to(100_000, 20);
    let data: Array<i64> = (0..segd.elements() as i64).collect();

    group.throughput(Throughput::Elements(2 * segd.elements() as u64));
    group.bench_function("100k_segments", |b| {
        b.iter(|| black_box(append_s(&segd, black_box(&data), &segd, black_box(&data)).ok()));
    });

    group.finish();
}

criterion_group!(benches, bench_fold_s, bench_replicate_s, bench_append_s);
criterion_main!(benches);
