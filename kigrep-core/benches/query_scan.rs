//! Criterion benchmark for table scans over a synthetic index.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kigrep_core::index::IndexTables;
use kigrep_core::query::SearchIndex;
use kigrep_core::records::{FootprintRecord, PartRecord};

fn synthetic_index(rows: usize) -> SearchIndex {
    let parts = (0..rows)
        .map(|i| PartRecord {
            part_name: format!("PART{i}"),
            pin_count: (i % 24) as u32,
            location: format!("lib{}.lib", i % 40),
            alias_of: format!("PART{i}"),
        })
        .collect();
    let footprints = (0..rows)
        .map(|i| FootprintRecord {
            name: format!("FP{i}-{}", i % 24),
            pad_count: (i % 24) as u32,
            location: format!("Lib_{}.pretty", i % 40),
        })
        .collect();
    SearchIndex::from_tables(IndexTables { parts, footprints })
}

fn bench_query_scans(c: &mut Criterion) {
    let index = synthetic_index(10_000);

    c.bench_function("query_part first match", |b| {
        b.iter(|| index.query_part(black_box(7), black_box("PART7")).unwrap())
    });

    c.bench_function("query_part_all scan", |b| {
        b.iter(|| index.query_part_all(black_box(7), black_box("PART9")).unwrap())
    });

    c.bench_function("query_footprint_all pads first", |b| {
        b.iter(|| index.query_footprint_all(black_box(7), black_box("FP"), true).unwrap())
    });

    c.bench_function("query_footprint_all name first", |b| {
        b.iter(|| index.query_footprint_all(black_box(7), black_box("FP"), false).unwrap())
    });
}

criterion_group!(benches, bench_query_scans);
criterion_main!(benches);
