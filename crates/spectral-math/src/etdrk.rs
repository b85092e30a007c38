// ─────────────────────────────────────────────────────────────────────
// SCPN Spectral Core — ETDRK Coefficients
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Exponential time-differencing Runge–Kutta coefficients.
//!
//! Every φ-type coefficient is evaluated as the mean of its closed form over
//! `num_circle_points` points on a circle of radius `circle_radius` centred
//! at `z = L·dt` (Kassam & Trefethen 2005). The removable singularity at
//! `z = 0` never gets sampled, so no small-argument branch is needed.

use std::f64::consts::PI;

use ndarray::ArrayD;
use num_complex::Complex64;
use spectral_types::constants::MAX_ORDER;
use spectral_types::error::{SpectralError, SpectralResult};

/// `exp(2πi (j - 1/2) / M)` for `j = 1..=M`. Conjugate-symmetric, never
/// lands on the real axis for even `M`.
pub fn roots_of_unity(num_points: usize) -> Vec<Complex64> {
    (1..=num_points)
        .map(|j| {
            let theta = 2.0 * PI * (j as f64 - 0.5) / num_points as f64;
            Complex64::from_polar(1.0, theta)
        })
        .collect()
}

/// Mean of `f` over the circle `z + radius·roots`.
pub fn contour_mean<F>(z: Complex64, roots: &[Complex64], radius: f64, f: F) -> Complex64
where
    F: Fn(Complex64) -> Complex64,
{
    let sum: Complex64 = roots.iter().map(|&w| f(z + w * radius)).sum();
    sum / roots.len() as f64
}

/// Closed-form `φ_k(z) = (eᶻ - Σ_{j<k} zʲ/j!) / zᵏ`, `φ_0 = eᶻ`.
///
/// Suffers cancellation near `z = 0` (0/0 at the origin); use
/// [`phi_contour`] there.
pub fn phi(k: usize, z: Complex64) -> Complex64 {
    let mut taylor = Complex64::new(0.0, 0.0);
    let mut term = Complex64::new(1.0, 0.0);
    for j in 0..k {
        taylor += term;
        term = term * z / (j + 1) as f64;
    }
    (z.exp() - taylor) / z.powu(k as u32)
}

/// `φ_k(z)` via contour quadrature; finite for every `z`.
pub fn phi_contour(k: usize, z: Complex64, num_circle_points: usize, circle_radius: f64) -> Complex64 {
    let roots = roots_of_unity(num_circle_points);
    contour_mean(z, &roots, circle_radius, |w| phi(k, w))
}

/// Precomputed coefficient set of one ETDRK scheme, shaped like the linear
/// operator. `h = dt`, `z = L·h`.
#[derive(Debug, Clone)]
pub enum EtdrkCoefficients {
    /// Exact linear propagation; nonlinear term ignored.
    Order0 { exp_term: ArrayD<Complex64> },
    /// `coef_1 = h·φ1(z)`
    Order1 {
        exp_term: ArrayD<Complex64>,
        coef_1: ArrayD<Complex64>,
    },
    /// `coef_1 = h·φ1(z)`, `coef_2 = h·φ2(z)`
    Order2 {
        exp_term: ArrayD<Complex64>,
        coef_1: ArrayD<Complex64>,
        coef_2: ArrayD<Complex64>,
    },
    Order3 {
        exp_term: ArrayD<Complex64>,
        half_exp_term: ArrayD<Complex64>,
        coef_1: ArrayD<Complex64>,
        coef_2: ArrayD<Complex64>,
        coef_3: ArrayD<Complex64>,
        coef_4: ArrayD<Complex64>,
        coef_5: ArrayD<Complex64>,
    },
    /// Cox–Matthews ETDRK4.
    Order4 {
        exp_term: ArrayD<Complex64>,
        half_exp_term: ArrayD<Complex64>,
        coef_1: ArrayD<Complex64>,
        coef_4: ArrayD<Complex64>,
        coef_5: ArrayD<Complex64>,
        coef_6: ArrayD<Complex64>,
    },
}

impl EtdrkCoefficients {
    pub fn new(
        linear_operator: &ArrayD<Complex64>,
        dt: f64,
        order: usize,
        num_circle_points: usize,
        circle_radius: f64,
    ) -> SpectralResult<Self> {
        if order > MAX_ORDER {
            return Err(SpectralError::ConfigError(format!(
                "ETDRK order must be in 0..={MAX_ORDER}, got {order}"
            )));
        }
        if num_circle_points == 0 || !circle_radius.is_finite() || circle_radius <= 0.0 {
            return Err(SpectralError::ConfigError(format!(
                "invalid contour quadrature: {num_circle_points} points, radius {circle_radius}"
            )));
        }
        log::debug!(
            "etdrk: order={order}, dt={dt:.3e}, modes={}, contour M={num_circle_points} r={circle_radius}",
            linear_operator.len()
        );

        let roots = roots_of_unity(num_circle_points);
        let coef = |f: &dyn Fn(Complex64) -> Complex64| {
            linear_operator.mapv(|l| dt * contour_mean(l * dt, &roots, circle_radius, f))
        };
        let exp_term = linear_operator.mapv(|l| (l * dt).exp());
        let half_exp_term = || linear_operator.mapv(|l| (l * dt * 0.5).exp());

        let coefficients = match order {
            0 => EtdrkCoefficients::Order0 { exp_term },
            1 => EtdrkCoefficients::Order1 {
                exp_term,
                coef_1: coef(&|z| phi(1, z)),
            },
            2 => EtdrkCoefficients::Order2 {
                exp_term,
                coef_1: coef(&|z| phi(1, z)),
                coef_2: coef(&|z| phi(2, z)),
            },
            3 => EtdrkCoefficients::Order3 {
                exp_term,
                half_exp_term: half_exp_term(),
                coef_1: coef(&|z| ((z / 2.0).exp() - 1.0) / z),
                coef_2: coef(&|z| phi(1, z)),
                coef_3: coef(&|z| (-4.0 - z + z.exp() * (4.0 - 3.0 * z + z * z)) / z.powu(3)),
                coef_4: coef(&|z| 4.0 * (2.0 + z + z.exp() * (z - 2.0)) / z.powu(3)),
                coef_5: coef(&|z| (-4.0 - 3.0 * z - z * z + z.exp() * (4.0 - z)) / z.powu(3)),
            },
            _ => EtdrkCoefficients::Order4 {
                exp_term,
                half_exp_term: half_exp_term(),
                coef_1: coef(&|z| ((z / 2.0).exp() - 1.0) / z),
                coef_4: coef(&|z| (-4.0 - z + z.exp() * (4.0 - 3.0 * z + z * z)) / z.powu(3)),
                coef_5: coef(&|z| (2.0 + z + z.exp() * (z - 2.0)) / z.powu(3)),
                coef_6: coef(&|z| (-4.0 - 3.0 * z - z * z + z.exp() * (4.0 - z)) / z.powu(3)),
            },
        };
        Ok(coefficients)
    }

    pub fn order(&self) -> usize {
        match self {
            EtdrkCoefficients::Order0 { .. } => 0,
            EtdrkCoefficients::Order1 { .. } => 1,
            EtdrkCoefficients::Order2 { .. } => 2,
            EtdrkCoefficients::Order3 { .. } => 3,
            EtdrkCoefficients::Order4 { .. } => 4,
        }
    }

    /// Nonlinear evaluations per step.
    pub fn num_nonlinear_evaluations(&self) -> usize {
        self.order()
    }

    /// `exp(L·dt)`, present for every order.
    pub fn exp_term(&self) -> &ArrayD<Complex64> {
        match self {
            EtdrkCoefficients::Order0 { exp_term }
            | EtdrkCoefficients::Order1 { exp_term, .. }
            | EtdrkCoefficients::Order2 { exp_term, .. }
            | EtdrkCoefficients::Order3 { exp_term, .. }
            | EtdrkCoefficients::Order4 { exp_term, .. } => exp_term,
        }
    }
}
