// ─────────────────────────────────────────────────────────────────────
// SCPN Spectral Core — ETDRK Stepper Benchmark
// © 1998–2026 Miroslav Šotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────

use criterion::{criterion_group, criterion_main, Criterion};
use ndarray::{ArrayD, IxDyn};
use spectral_core::nonlinear::NonlinearFun;
use spectral_core::stepper::EtdrkStepper;
use spectral_math::spectral::{build_derivative_operator, build_laplace_operator};
use spectral_types::config::StepperConfig;
use std::f64::consts::PI;
use std::hint::black_box;

fn burgers_stepper(dims: usize, n: usize, order: usize) -> EtdrkStepper {
    let config = StepperConfig::new(dims, 1.0, n, 1e-3).with_order(order);
    let grid = config.grid().expect("valid grid");
    let laplace = build_laplace_operator(&build_derivative_operator(&grid), 2)
        .expect("laplace operator");
    let nonlin = NonlinearFun::convection(&grid, dims, 2.0 / 3.0, 1.0, false)
        .expect("convection term");
    EtdrkStepper::new(&config, dims, laplace * 0.01, nonlin).expect("stepper")
}

fn sine_state(dims: usize, n: usize) -> ArrayD<f64> {
    let mut shape = vec![dims];
    shape.extend(std::iter::repeat(n).take(dims));
    ArrayD::from_shape_fn(IxDyn(&shape), |idx| {
        (2.0 * PI * idx[dims] as f64 / n as f64).sin() + 0.1 * idx[0] as f64
    })
}

fn bench_burgers_1d(c: &mut Criterion) {
    let mut group = c.benchmark_group("burgers_1d_step");
    let u0 = sine_state(1, 256);
    for order in [1, 2, 4] {
        let stepper = burgers_stepper(1, 256, order);
        group.bench_function(format!("order_{order}_n256"), |b| {
            b.iter(|| black_box(stepper.step(&u0).expect("step should succeed")))
        });
    }
    group.finish();
}

fn bench_burgers_2d(c: &mut Criterion) {
    let stepper = burgers_stepper(2, 64, 2);
    let u0 = sine_state(2, 64);
    c.bench_function("burgers_2d_order_2_n64", |b| {
        b.iter(|| black_box(stepper.step(&u0).expect("step should succeed")))
    });
}

fn bench_batch_2d(c: &mut Criterion) {
    let stepper = burgers_stepper(2, 64, 2);
    let batch: Vec<ArrayD<f64>> = (0..16).map(|_| sine_state(2, 64)).collect();
    c.bench_function("burgers_2d_batch16_n64", |b| {
        b.iter(|| black_box(stepper.step_batch(&batch).expect("batch should succeed")))
    });
}

criterion_group!(benches, bench_burgers_1d, bench_burgers_2d, bench_batch_2d);
criterion_main!(benches);
