//! Benchmarks for CPU-side particle generation and the flow math.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use windglobe::wind::{displace, generate_particles, particle_color};
use windglobe::WindConfig;

fn bench_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_particles");

    for count in [1_000u32, 18_000, 100_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let config = WindConfig::new().with_particle_count(count);
            b.iter(|| {
                let mut rng = SmallRng::seed_from_u64(42);
                black_box(generate_particles(&config, &mut rng))
            })
        });
    }

    group.finish();
}

fn bench_displacement(c: &mut Criterion) {
    let config = WindConfig::default();
    let mut rng = SmallRng::seed_from_u64(42);
    let particles = generate_particles(&config, &mut rng);

    // One frame of the full default cloud, the work the vertex shader does.
    c.bench_function("displace_18k", |b| {
        let mut t = 0.0f32;
        b.iter(|| {
            t += 0.016;
            for p in &particles {
                black_box(displace(p.position(), p.speed, t, &config));
            }
        })
    });
}

fn bench_color_ramp(c: &mut Criterion) {
    let config = WindConfig::default();
    let mut rng = SmallRng::seed_from_u64(42);
    let particles = generate_particles(&config, &mut rng);

    c.bench_function("particle_color_18k", |b| {
        b.iter(|| {
            for p in &particles {
                black_box(particle_color(p.position(), &config));
            }
        })
    });
}

criterion_group!(benches, bench_generation, bench_displacement, bench_color_ramp);
criterion_main!(benches);
