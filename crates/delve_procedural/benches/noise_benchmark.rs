//! Benchmark for noise sampling.
//!
//! A default 70x70 room samples three fields per inside cell.
//!
//! Run with: cargo bench --package delve_procedural --bench noise_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use delve_procedural::noise::{RoomSeed, SimplexNoise, STREAM_SHAPE};

fn noise(seed: i64) -> SimplexNoise {
    let seed = RoomSeed::new(seed).expect("benchmark seed in range");
    SimplexNoise::new(seed.stream(STREAM_SHAPE))
}

fn benchmark_single_sample(c: &mut Criterion) {
    let noise = noise(42);

    c.bench_function("single_noise_sample", |b| {
        let mut x = 0.0f64;
        b.iter(|| {
            x += 0.1;
            black_box(noise.sample01(black_box(x), black_box(x * 0.7)))
        });
    });
}

fn benchmark_room_worth_of_samples(c: &mut Criterion) {
    let noise = noise(42);

    let mut group = c.benchmark_group("room_samples");
    group.throughput(Throughput::Elements(3 * 70 * 70));

    group.bench_function("3x70x70_noise_samples", |b| {
        b.iter(|| {
            for field in 0..3u32 {
                let offset = f64::from(field) * 100.0;
                for y in 0..70u32 {
                    for x in 0..70u32 {
                        let fx = (f64::from(x) + offset) * 0.1;
                        let fy = (f64::from(y) + offset) * 0.1;
                        black_box(noise.sample01(fx, fy));
                    }
                }
            }
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_single_sample, benchmark_room_worth_of_samples);
criterion_main!(benches);
