//! Performance benchmarks for decisions and parameter search

use adaptcomp_engine::{BoundsTable, DecisionOrchestrator, InMemoryLedger, ParameterOptimizer};
use adaptcomp_types::{AlgorithmVariant, ContentClass, ContentProfile, EngineConfig};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

fn inputs() -> Vec<(&'static str, Vec<u8>)> {
    let json: String = (0..200)
        .map(|i| format!("{{\"id\": {i}, \"name\": \"item{i}\", \"active\": true}}"))
        .collect::<Vec<_>>()
        .join(",");

    vec![
        ("repeated", "A".repeat(64 * 1024).into_bytes()),
        (
            "prose",
            "The quick brown fox jumps over the lazy dog. ".repeat(1024).into_bytes(),
        ),
        (
            "rust",
            "pub fn add(a: i32, b: i32) -> i32 {\n    a + b\n}\n".repeat(512).into_bytes(),
        ),
        ("json", format!("[{json}]").into_bytes()),
        ("binary", (0..65_536u32).map(|i| (i * 7919 % 251) as u8).collect()),
    ]
}

fn bench_decide(c: &mut Criterion) {
    let config = EngineConfig {
        seed: Some(42),
        ..EngineConfig::default()
    };
    let engine = DecisionOrchestrator::new(config, Arc::new(InMemoryLedger::new())).unwrap();

    let mut group = c.benchmark_group("decide");
    for (name, content) in inputs() {
        group.bench_with_input(BenchmarkId::from_parameter(name), &content, |b, content| {
            b.iter(|| black_box(engine.decide(black_box(content))));
        });
    }
    group.finish();
}

fn bench_strategies(c: &mut Criterion) {
    let table = BoundsTable::standard();
    let bounds = table.get(AlgorithmVariant::Zstd).unwrap();
    let base = table.default_parameters(AlgorithmVariant::Zstd);
    let optimizer = ParameterOptimizer::new();

    // One profile per complexity band
    let profiles = [
        ("grid", [1.0, 0.1, 0.0, 0.1, 0.2, 0.1, 0.3, 0.7]),
        ("sampling", [5.0, 0.4, 0.2, 0.5, 0.4, 0.2, 0.6, 0.7]),
        ("genetic", [6.5, 0.7, 0.6, 0.7, 0.6, 0.3, 0.8, 0.8]),
        ("bandit", [7.8, 0.9, 0.9, 0.9, 0.8, 0.4, 0.9, 0.9]),
    ];

    let mut group = c.benchmark_group("optimize");
    for (name, dims) in profiles {
        let profile = ContentProfile::new(dims, ContentClass::Code, None);
        group.bench_function(name, |b| {
            let mut rng = StdRng::seed_from_u64(7);
            b.iter(|| {
                black_box(optimizer.optimize(
                    AlgorithmVariant::Zstd,
                    &profile,
                    bounds,
                    &base,
                    &mut rng,
                ))
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_decide, bench_strategies);
criterion_main!(benches);
