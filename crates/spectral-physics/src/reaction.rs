// ─────────────────────────────────────────────────────────────────────
// SCPN Spectral Core — Reaction-Diffusion Presets
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Reaction-diffusion equations: Allen-Cahn, Fisher-KPP and a
//! three-species Belousov-Zhabotinsky model.

use std::sync::Arc;

use ndarray::{ArrayD, Axis, Zip};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use spectral_core::nonlinear::{NonlinearFun, PointwiseMap};
use spectral_core::stepper::Equation;
use spectral_math::spectral::build_laplace_operator;
use spectral_types::constants::{DEALIASING_CUBIC, DEALIASING_QUADRATIC};
use spectral_types::error::{SpectralError, SpectralResult};
use spectral_types::state::SpectralGrid;

/// `∂_t u = ν Δu + c1 u + c3 u³`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AllenCahn {
    pub diffusivity: f64,
    pub first_order_coefficient: f64,
    pub third_order_coefficient: f64,
    pub dealiasing_fraction: f64,
}

impl Default for AllenCahn {
    fn default() -> Self {
        AllenCahn {
            diffusivity: 5e-3,
            first_order_coefficient: 1.0,
            third_order_coefficient: -1.0,
            dealiasing_fraction: DEALIASING_CUBIC,
        }
    }
}

impl Equation for AllenCahn {
    fn num_channels(&self, _grid: &SpectralGrid) -> usize {
        1
    }

    fn build_linear_operator(
        &self,
        _grid: &SpectralGrid,
        derivative_operator: &ArrayD<Complex64>,
    ) -> SpectralResult<ArrayD<Complex64>> {
        let laplace = build_laplace_operator(derivative_operator, 2)?;
        Ok(laplace * self.diffusivity + Complex64::new(self.first_order_coefficient, 0.0))
    }

    fn build_nonlinear_fun(&self, grid: &SpectralGrid) -> SpectralResult<NonlinearFun> {
        NonlinearFun::polynomial(
            grid,
            1,
            self.dealiasing_fraction,
            vec![0.0, 0.0, 0.0, self.third_order_coefficient],
        )
    }
}

/// `∂_t u = ν Δu + r u (1 - u)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FisherKpp {
    pub diffusivity: f64,
    pub reactivity: f64,
    pub dealiasing_fraction: f64,
}

impl Default for FisherKpp {
    fn default() -> Self {
        FisherKpp {
            diffusivity: 1.0,
            reactivity: 1.0,
            dealiasing_fraction: DEALIASING_QUADRATIC,
        }
    }
}

impl Equation for FisherKpp {
    fn num_channels(&self, _grid: &SpectralGrid) -> usize {
        1
    }

    fn build_linear_operator(
        &self,
        _grid: &SpectralGrid,
        derivative_operator: &ArrayD<Complex64>,
    ) -> SpectralResult<ArrayD<Complex64>> {
        let laplace = build_laplace_operator(derivative_operator, 2)?;
        Ok(laplace * self.diffusivity + Complex64::new(self.reactivity, 0.0))
    }

    fn build_nonlinear_fun(&self, grid: &SpectralGrid) -> SpectralResult<NonlinearFun> {
        NonlinearFun::polynomial(
            grid,
            1,
            self.dealiasing_fraction,
            vec![0.0, 0.0, -self.reactivity],
        )
    }
}

/// Three-species oscillator with per-species diffusion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BelousovZhabotinsky {
    pub diffusivities: [f64; 3],
    pub dealiasing_fraction: f64,
}

impl Default for BelousovZhabotinsky {
    fn default() -> Self {
        BelousovZhabotinsky {
            diffusivities: [1e-5, 2e-5, 1e-5],
            dealiasing_fraction: DEALIASING_CUBIC,
        }
    }
}

impl Equation for BelousovZhabotinsky {
    fn num_channels(&self, _grid: &SpectralGrid) -> usize {
        3
    }

    fn build_linear_operator(
        &self,
        _grid: &SpectralGrid,
        derivative_operator: &ArrayD<Complex64>,
    ) -> SpectralResult<ArrayD<Complex64>> {
        let laplace = build_laplace_operator(derivative_operator, 2)?;
        let blocks: Vec<_> = self
            .diffusivities
            .iter()
            .map(|&nu| laplace.mapv(|l| l * nu))
            .collect();
        let views: Vec<_> = blocks.iter().map(|b| b.view()).collect();
        Ok(ndarray::concatenate(Axis(0), &views)?)
    }

    fn build_nonlinear_fun(&self, grid: &SpectralGrid) -> SpectralResult<NonlinearFun> {
        NonlinearFun::pointwise(
            grid,
            3,
            self.dealiasing_fraction,
            Arc::new(BelousovZhabotinskyReaction::new(3)?),
        )
    }
}

/// Reaction kinetics of [`BelousovZhabotinsky`]:
///
/// ```text
/// u0' = u0 + u1 - u0 u1 - u0²
/// u1' = u2 - u1 - u0 u1
/// u2' = u0 - u2
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BelousovZhabotinskyReaction;

impl BelousovZhabotinskyReaction {
    pub fn new(num_channels: usize) -> SpectralResult<Self> {
        if num_channels != 3 {
            return Err(SpectralError::ConfigError(format!(
                "Belousov-Zhabotinsky needs 3 channels, got {num_channels}"
            )));
        }
        Ok(BelousovZhabotinskyReaction)
    }
}

impl PointwiseMap for BelousovZhabotinskyReaction {
    fn required_channels(&self) -> Option<usize> {
        Some(3)
    }

    fn apply(&self, u: &ArrayD<f64>) -> SpectralResult<ArrayD<f64>> {
        let mut expected = u.shape().to_vec();
        match expected.first_mut() {
            Some(channels) => *channels = 3,
            None => expected.push(3),
        }
        SpectralError::check_shape(&expected, u.shape())?;
        let (u0, u1, u2) = (
            u.index_axis(Axis(0), 0),
            u.index_axis(Axis(0), 1),
            u.index_axis(Axis(0), 2),
        );
        let r0 = Zip::from(&u0)
            .and(&u1)
            .map_collect(|&a, &b| a + b - a * b - a * a);
        let r1 = Zip::from(&u0)
            .and(&u1)
            .and(&u2)
            .map_collect(|&a, &b, &c| c - b - a * b);
        let r2 = Zip::from(&u0).and(&u2).map_collect(|&a, &c| a - c);
        Ok(ndarray::stack(Axis(0), &[r0.view(), r1.view(), r2.view()])?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::IxDyn;
    use spectral_core::stepper::EtdrkStepper;
    use spectral_math::fft::RealFft;
    use spectral_types::config::StepperConfig;
    use std::f64::consts::PI;

    fn allen_cahn_run(offset: f64) -> Vec<ArrayD<f64>> {
        let n = 64;
        let config = StepperConfig::new(1, 1.0, n, 1e-2).with_order(2);
        let stepper = EtdrkStepper::from_equation(&config, &AllenCahn::default()).unwrap();
        let u0 = ArrayD::from_shape_fn(IxDyn(&[1, n]), |idx| {
            offset + 0.05 * (2.0 * PI * idx[1] as f64 / n as f64).sin()
        });
        stepper.rollout(&u0, 2000, true).unwrap()
    }

    #[test]
    fn test_allen_cahn_settles_to_plus_one() {
        let trajectory = allen_cahn_run(0.1);
        for state in &trajectory {
            assert!(state.iter().all(|v| v.is_finite() && v.abs() <= 1.0 + 1e-3));
        }
        let last = trajectory.last().unwrap();
        assert!(last.iter().all(|v| (v - 1.0).abs() < 1e-4), "not settled at +1");
    }

    #[test]
    fn test_allen_cahn_settles_to_minus_one() {
        let trajectory = allen_cahn_run(-0.1);
        for state in &trajectory {
            assert!(state.iter().all(|v| v.is_finite() && v.abs() <= 1.0 + 1e-3));
        }
        let last = trajectory.last().unwrap();
        assert!(last.iter().all(|v| (v + 1.0).abs() < 1e-4), "not settled at -1");
    }

    #[test]
    fn test_fisher_kpp_homogeneous_logistic() {
        // u(t) = 1 / (1 + e^{-t}) from u(0) = ½
        let n = 16;
        let config = StepperConfig::new(1, 10.0, n, 1e-2).with_order(4);
        let stepper = EtdrkStepper::from_equation(&config, &FisherKpp::default()).unwrap();
        let u0 = ArrayD::from_elem(IxDyn(&[1, n]), 0.5);
        let trajectory = stepper.rollout(&u0, 100, false).unwrap();
        let exact = 1.0 / (1.0 + (-1.0f64).exp());
        for &v in trajectory[99].iter() {
            assert!((v - exact).abs() < 1e-8, "{v} vs {exact}");
        }
    }

    #[test]
    fn test_bz_reaction_requires_three_channels() {
        assert!(matches!(
            BelousovZhabotinskyReaction::new(2),
            Err(SpectralError::ConfigError(_))
        ));
        assert!(BelousovZhabotinskyReaction::new(3).is_ok());
    }

    #[test]
    fn test_allen_cahn_damps_high_wavenumbers() {
        // L̂ = 1 - ν(2π·20)² ≈ -78 at mode 20; the cubic term only sees
        // the dealiased field, which keeps modes 0..=15.
        let n = 64;
        let config = StepperConfig::new(1, 1.0, n, 1e-2).with_order(2);
        let stepper = EtdrkStepper::from_equation(&config, &AllenCahn::default()).unwrap();
        let u0 = ArrayD::from_shape_fn(IxDyn(&[1, n]), |idx| {
            0.1 + 0.05 * (2.0 * PI * (20 * idx[1]) as f64 / n as f64).sin()
        });
        let fft = RealFft::new(1, n);
        let initial = fft.rfftn(&u0).unwrap()[[0, 20]].norm();
        let u = stepper.rollout(&u0, 50, false).unwrap().pop().unwrap();
        let u_hat = fft.rfftn(&u).unwrap();
        assert!(u_hat[[0, 20]].norm() < 1e-8 * initial, "mode 20: {}", u_hat[[0, 20]]);
        let mean = u_hat[[0, 0]].re / n as f64;
        assert!(mean > 0.1, "mean should grow towards +1, got {mean}");
    }

    #[test]
    fn test_bz_reaction_rejects_wrong_channel_count_at_call() {
        let u = ArrayD::zeros(IxDyn(&[2, 4]));
        assert!(matches!(
            BelousovZhabotinskyReaction.apply(&u),
            Err(SpectralError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_bz_reaction_values() {
        let u = ArrayD::from_shape_vec(IxDyn(&[3, 1]), vec![0.5, 0.25, 0.1]).unwrap();
        let r = BelousovZhabotinskyReaction.apply(&u).unwrap();
        assert!((r[[0, 0]] - (0.5 + 0.25 - 0.125 - 0.25)).abs() < 1e-15);
        assert!((r[[1, 0]] - (0.1 - 0.25 - 0.125)).abs() < 1e-15);
        assert!((r[[2, 0]] - (0.5 - 0.1)).abs() < 1e-15);
    }

    #[test]
    fn test_bz_stepper_keeps_fixed_point() {
        let n = 16;
        let config = StepperConfig::new(2, 1.0, n, 1e-2).with_order(3);
        let stepper =
            EtdrkStepper::from_equation(&config, &BelousovZhabotinsky::default()).unwrap();
        assert_eq!(stepper.num_channels(), 3);
        let u0 = ArrayD::zeros(IxDyn(&[3, n, n]));
        let u1 = stepper.step(&u0).unwrap();
        assert!(u1.iter().all(|v| v.abs() < 1e-15));
    }

    #[test]
    fn test_bz_rejects_wrong_state_shape() {
        let config = StepperConfig::new(1, 1.0, 16, 1e-2);
        let stepper =
            EtdrkStepper::from_equation(&config, &BelousovZhabotinsky::default()).unwrap();
        assert!(stepper.step(&ArrayD::zeros(IxDyn(&[1, 16]))).is_err());
    }
}
