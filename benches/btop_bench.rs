//! BTOP decoding and read evaluation benchmarks

use std::sync::Arc;

use btopcall::{
    evaluate_read, AlignmentRecord, CallerConfig, ReferenceAlignment, VariantBoundary,
    VariantCaller, VariantTable,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const BTOP: &str = "23AG14_3_40C-11^250^9TC30";

fn benchmark_decoding(c: &mut Criterion) {
    c.bench_function("decode_btop", |b| {
        b.iter(|| ReferenceAlignment::from_btop(black_box(BTOP)))
    });

    let record = AlignmentRecord::new("rs1", 0, 130, BTOP).expect("non-empty BTOP");
    let boundary = VariantBoundary::new(60, 62);
    c.bench_function("evaluate_read", |b| {
        b.iter(|| evaluate_read(black_box(&record), black_box(&boundary)))
    });
}

fn benchmark_dataset(c: &mut Criterion) {
    let table: VariantTable = (0..50)
        .map(|idx| (format!("rs{idx}"), VariantBoundary::new(40 + idx, 41 + idx)))
        .collect();
    let records: Vec<AlignmentRecord> = (0..10_000u64)
        .map(|idx| {
            AlignmentRecord::new(format!("rs{}", idx % 50), idx % 7, 130, BTOP)
                .expect("non-empty BTOP")
        })
        .collect();
    let caller = VariantCaller::new(Arc::new(table), CallerConfig::new());

    c.bench_function("call_dataset_10k_reads", |b| {
        b.iter(|| caller.call_dataset("SRR_BENCH", black_box(&records)))
    });
}

criterion_group!(benches, benchmark_decoding, benchmark_dataset);
criterion_main!(benches);
