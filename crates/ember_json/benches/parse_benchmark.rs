//! # JSON Parse Benchmark
//!
//! ENGINE REQUIREMENTS:
//! - Config files parse in one pass, no re-scanning
//! - Query cost stays flat as documents grow
//!
//! Run with: `cargo bench --package ember_json`

// Benchmarks don't need docs and may have intentionally unused code
#![allow(missing_docs)]
#![allow(dead_code)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ember_json::parse;

/// Builds a level-manifest-shaped document with `count` entries.
fn synthetic_manifest(count: usize) -> String {
    let mut out = String::from("{\"entries\": [");
    for i in 0..count {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&format!(
            "{{\"id\": {i}, \"name\": \"entity{i}\", \"solid\": true, \"pos\": [{i}.5, 2.25, -3.0]}}"
        ));
    }
    out.push_str("]}");
    out
}

/// Benchmark: full parse of growing manifests.
fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_manifest");

    for count in [10usize, 100, 1_000] {
        let source = synthetic_manifest(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &source, |b, source| {
            b.iter(|| {
                let doc = parse(black_box(source.as_str()));
                black_box(doc.is_valid())
            });
        });
    }
    group.finish();
}

/// Benchmark: repeated lookups against one parsed document.
fn bench_query(c: &mut Criterion) {
    let source = synthetic_manifest(1_000);
    let doc = parse(&source);
    let root = doc.root().expect("benchmark source is valid");
    let entries = doc.lookup(root, "entries").expect("entries array");

    c.bench_function("query_indexed_lookup", |b| {
        let mut i = 0usize;
        b.iter(|| {
            i = (i + 1) % 1_000;
            let entry = doc.index(entries, i).expect("in range");
            black_box(doc.lookup(entry, "name").map(|v| doc.as_string(v)))
        });
    });
}

criterion_group!(benches, bench_parse, bench_query);
criterion_main!(benches);
