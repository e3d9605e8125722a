//! Benchmark for full room generation.
//!
//! TARGET: a default 70x70 room (classify + separate + place) well under
//! one frame, since generation runs synchronously on a door trigger.
//!
//! Run with: cargo bench --package delve_procedural --bench generation_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use delve_procedural::{
    GenerationConfig, LayoutMode, PieceCatalog, RoomContext, RoomGenerator, RoomSeed,
};

fn generator(layout: LayoutMode) -> RoomGenerator {
    let config = GenerationConfig {
        layout,
        ..GenerationConfig::default()
    };
    RoomGenerator::new(config, PieceCatalog::standard()).expect("default config is valid")
}

fn benchmark_noise_room(c: &mut Criterion) {
    let gen = generator(LayoutMode::Noise);

    c.bench_function("noise_room_70x70", |b| {
        let mut raw = 0i64;
        b.iter(|| {
            raw = (raw + 7_919) % 9_999_999;
            let seed = RoomSeed::new(raw).expect("seed in range");
            black_box(gen.build(seed, RoomContext::at(1)))
        });
    });
}

fn benchmark_classification_only(c: &mut Criterion) {
    let gen = generator(LayoutMode::Noise);
    let seed = RoomSeed::new(42).expect("seed in range");

    c.bench_function("classify_and_separate_70x70", |b| {
        b.iter(|| black_box(gen.generate_with_seed(black_box(seed))));
    });
}

fn benchmark_bordered_room(c: &mut Criterion) {
    let gen = generator(LayoutMode::Bordered);
    let seed = RoomSeed::new(42).expect("seed in range");

    c.bench_function("bordered_room_70x70", |b| {
        b.iter(|| black_box(gen.build(black_box(seed), RoomContext::at(2))));
    });
}

criterion_group!(
    benches,
    benchmark_noise_room,
    benchmark_classification_only,
    benchmark_bordered_room
);
criterion_main!(benches);
