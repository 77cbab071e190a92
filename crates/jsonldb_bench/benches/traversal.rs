//! Append and traversal benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use jsonldb_bench::utils::{generate_records, populated_file};
use jsonldb_core::JsonlFile;
use serde_json::json;
use std::ops::ControlFlow;
use tempfile::TempDir;

/// Benchmark single record appends.
fn bench_append_one(c: &mut Criterion) {
    let mut group = c.benchmark_group("append_one");

    for size in [64, 256, 1024].iter() {
        group.throughput(Throughput::Bytes(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let temp_dir = TempDir::new().unwrap();
            let file = JsonlFile::new(temp_dir.path().join("bench.jsonl"));
            let record = generate_records(1, size).remove(0);

            b.iter(|| {
                file.append(black_box(&record)).unwrap();
            });
        });
    }
    group.finish();
}

/// Benchmark batch appends.
fn bench_append_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("append_batch");

    for batch_size in [10, 100, 1000].iter() {
        group.throughput(Throughput::Elements(*batch_size as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(batch_size),
            batch_size,
            |b, &batch_size| {
                let temp_dir = TempDir::new().unwrap();
                let file = JsonlFile::new(temp_dir.path().join("bench.jsonl"));
                let records = generate_records(batch_size, 128);

                b.iter(|| {
                    let written = file.append_all(black_box(&records)).unwrap();
                    black_box(written);
                });
            },
        );
    }
    group.finish();
}

/// Benchmark full scans.
fn bench_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("count");
    group.sample_size(30);

    for count in [1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            let temp_dir = TempDir::new().unwrap();
            let file = populated_file(&temp_dir.path().join("bench.jsonl"), count, 128);

            b.iter(|| {
                black_box(file.count().unwrap());
            });
        });
    }
    group.finish();
}

/// Benchmark batched reads.
fn bench_read_by_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_by_batch");
    group.sample_size(30);

    let temp_dir = TempDir::new().unwrap();
    let file = populated_file(&temp_dir.path().join("bench.jsonl"), 10_000, 128);

    for batch_size in [1, 100, 1000].iter() {
        group.throughput(Throughput::Elements(10_000));
        group.bench_with_input(
            BenchmarkId::from_parameter(batch_size),
            batch_size,
            |b, &batch_size| {
                b.iter(|| {
                    file.read_by_batch(batch_size, |batch| {
                        black_box(batch);
                        ControlFlow::Continue(())
                    })
                    .unwrap();
                });
            },
        );
    }
    group.finish();
}

/// Benchmark lookups that stop early versus scanning to the end.
fn bench_find_where(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_where");

    let temp_dir = TempDir::new().unwrap();
    let file = populated_file(&temp_dir.path().join("bench.jsonl"), 10_000, 128);

    for (label, id) in [("head", 10), ("middle", 5_000), ("missing", 20_000)] {
        group.bench_function(label, |b| {
            let target = json!(id);
            b.iter(|| {
                black_box(file.find_where("id", black_box(&target)).unwrap());
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_append_one,
    bench_append_batch,
    bench_count,
    bench_read_by_batch,
    bench_find_where,
);

criterion_main!(benches);
