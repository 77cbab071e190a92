//! Line codec benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use jsonldb_bench::utils::random_record;
use jsonldb_codec::{decode_line, encode_record, strict_equals};
use serde_json::json;

/// Benchmark record encoding.
fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_record");

    for size in [16, 256, 4096].iter() {
        group.throughput(Throughput::Bytes(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let record = random_record(0, size);
            b.iter(|| black_box(encode_record(black_box(&record)).unwrap()));
        });
    }
    group.finish();
}

/// Benchmark line decoding.
fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_line");

    for size in [16, 256, 4096].iter() {
        let line = encode_record(&random_record(0, *size)).unwrap();
        group.throughput(Throughput::Bytes(line.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &line, |b, line| {
            b.iter(|| black_box(decode_line(black_box(line.as_bytes())).unwrap()));
        });
    }
    group.bench_function("malformed", |b| {
        b.iter(|| black_box(decode_line(black_box(b"{\"name\": \"Alice\", oops")).is_err()));
    });
    group.finish();
}

/// Benchmark strict equality on numbers and strings.
fn bench_strict_equals(c: &mut Criterion) {
    let mut group = c.benchmark_group("strict_equals");
    let cases = [
        ("int_int", json!(42), json!(42)),
        ("int_float", json!(42), json!(42.0)),
        ("string", json!("abcdefgh"), json!("abcdefgh")),
    ];
    for (label, a, b) in cases {
        group.bench_function(label, |bench| {
            bench.iter(|| black_box(strict_equals(black_box(&a), black_box(&b))));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode, bench_strict_equals);

criterion_main!(benches);
