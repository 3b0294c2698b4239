//! Benchmarks for pipeline synthesis.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use eecflow::prelude::*;
use eecflow::testing::sample_snapshot;
use std::path::Path;

fn pipeline_benchmark(c: &mut Criterion) {
    let snapshot = sample_snapshot();
    let root = Path::new("/eec/bin");
    let workspace = Path::new("/work");

    c.bench_function("build_device_pipeline", |b| {
        b.iter(|| {
            PipelineBuilder::new(black_box(&snapshot), root, workspace).build(PipelineMode::Device)
        })
    });

    c.bench_function("build_fallback_pipeline", |b| {
        b.iter(|| PipelineBuilder::fallback(black_box(workspace)))
    });

    c.bench_function("resolve_flags", |b| {
        b.iter(|| resolve_flags(black_box(&snapshot.options)))
    });
}

criterion_group!(benches, pipeline_benchmark);
criterion_main!(benches);
