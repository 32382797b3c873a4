//! Criterion benchmarks for the zero-copy iterator and the appending
//! builder.
//!
//! Run with:
//!   cargo bench --bench iter_and_build

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use bsoncore::raw::{RawDocument, RawDocumentBuf};

fn build_flat_document(fields: usize) -> RawDocumentBuf {
    let mut b = RawDocumentBuf::new();
    for i in 0..fields {
        b.append_i32(&i.to_string(), i as i32).unwrap();
    }
    b
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_flat_document");
    for &fields in &[16usize, 256, 4096] {
        group.throughput(Throughput::Elements(fields as u64));
        group.bench_with_input(BenchmarkId::new("append_i32", fields), &fields, |b, &fields| {
            b.iter(|| build_flat_document(fields));
        });
    }
    group.finish();
}

fn bench_iterate(c: &mut Criterion) {
    let mut group = c.benchmark_group("iterate_flat_document");
    for &fields in &[16usize, 256, 4096] {
        let built = build_flat_document(fields);
        let bytes = built.as_bytes();
        group.throughput(Throughput::Elements(fields as u64));
        group.bench_with_input(BenchmarkId::new("advance_all", fields), bytes, |b, bytes| {
            b.iter(|| {
                let doc = RawDocument::from_bytes(bytes).unwrap();
                let mut iter = doc.iter();
                let mut count = 0;
                while iter.advance().unwrap().is_some() {
                    count += 1;
                }
                count
            });
        });
    }
    group.finish();
}

fn bench_nested_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_nested_document");
    for &depth in &[1usize, 8, 32] {
        group.bench_with_input(BenchmarkId::new("nested_scopes", depth), &depth, |b, &depth| {
            b.iter(|| {
                let mut builder = RawDocumentBuf::new();
                for level in 0..depth {
                    builder.start_document(&level.to_string()).unwrap();
                }
                for level in (0..depth).rev() {
                    let _ = level;
                    builder.finish_document().unwrap();
                }
                builder
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_iterate, bench_nested_build);
criterion_main!(benches);
