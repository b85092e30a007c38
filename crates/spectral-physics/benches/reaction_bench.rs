// ─────────────────────────────────────────────────────────────────────
// SCPN Spectral Core — Reaction-Diffusion Benchmark
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────

use criterion::{criterion_group, criterion_main, Criterion};
use ndarray::{ArrayD, IxDyn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use spectral_core::stepper::EtdrkStepper;
use spectral_physics::reaction::{AllenCahn, BelousovZhabotinsky};
use spectral_physics::transport::KolmogorovFlow;
use spectral_types::config::StepperConfig;

fn random_state(shape: &[usize], seed: u64) -> ArrayD<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    ArrayD::from_shape_simple_fn(IxDyn(shape), || rng.gen_range(-0.1..0.1))
}

/// 100 Allen-Cahn steps on a 2D 64×64 grid, order 2.
fn bench_allen_cahn_2d(c: &mut Criterion) {
    let config = StepperConfig::new(2, 1.0, 64, 1e-2).with_order(2);
    let stepper = EtdrkStepper::from_equation(&config, &AllenCahn::default())
        .expect("stepper should build");
    let u0 = random_state(&[1, 64, 64], 7);
    c.bench_function("allen_cahn_2d_100_steps_64", |b| {
        b.iter(|| std::hint::black_box(stepper.rollout(&u0, 100, false)))
    });
}

/// Single three-species step, order 4.
fn bench_bz_step(c: &mut Criterion) {
    let config = StepperConfig::new(2, 1.0, 64, 1e-2).with_order(4);
    let stepper = EtdrkStepper::from_equation(&config, &BelousovZhabotinsky::default())
        .expect("stepper should build");
    let u0 = random_state(&[3, 64, 64], 11);
    c.bench_function("bz_2d_step_64", |b| {
        b.iter(|| std::hint::black_box(stepper.step(&u0)))
    });
}

/// Single Kolmogorov-flow step at 128×128.
fn bench_kolmogorov_step(c: &mut Criterion) {
    let config = StepperConfig::new(2, 1.0, 128, 1e-3).with_order(2);
    let stepper = EtdrkStepper::from_equation(&config, &KolmogorovFlow::default())
        .expect("stepper should build");
    let u0 = random_state(&[1, 128, 128], 13);
    c.bench_function("kolmogorov_step_128", |b| {
        b.iter(|| std::hint::black_box(stepper.step(&u0)))
    });
}

criterion_group!(
    benches,
    bench_allen_cahn_2d,
    bench_bz_step,
    bench_kolmogorov_step
);
criterion_main!(benches);
