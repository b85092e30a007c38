//! Transport and pattern-forming equations: linear diffusion, viscous
//! Burgers, Kuramoto-Sivashinsky and forced 2D Kolmogorov flow.

use ndarray::ArrayD;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use spectral_core::nonlinear::NonlinearFun;
use spectral_core::stepper::Equation;
use spectral_math::spectral::build_laplace_operator;
use spectral_types::constants::DEALIASING_QUADRATIC;
use spectral_types::error::{SpectralError, SpectralResult};
use spectral_types::state::SpectralGrid;

/// `∂_t u = ν Δu`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Diffusion {
    pub diffusivity: f64,
}

impl Default for Diffusion {
    fn default() -> Self {
        Diffusion { diffusivity: 0.01 }
    }
}

impl Equation for Diffusion {
    fn num_channels(&self, _grid: &SpectralGrid) -> usize {
        1
    }

    fn build_linear_operator(
        &self,
        _grid: &SpectralGrid,
        derivative_operator: &ArrayD<Complex64>,
    ) -> SpectralResult<ArrayD<Complex64>> {
        Ok(build_laplace_operator(derivative_operator, 2)? * self.diffusivity)
    }

    fn build_nonlinear_fun(&self, grid: &SpectralGrid) -> SpectralResult<NonlinearFun> {
        NonlinearFun::zero(grid, 1)
    }
}

/// `∂_t u = ν Δu - b · ½ ∇·(u ⊗ u)`.
///
/// The state is a velocity with one channel per spatial dimension, or a
/// single scalar channel when `single_channel` is set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Burgers {
    pub diffusivity: f64,
    pub convection_scale: f64,
    pub single_channel: bool,
    pub dealiasing_fraction: f64,
}

impl Default for Burgers {
    fn default() -> Self {
        Burgers {
            diffusivity: 0.1,
            convection_scale: 1.0,
            single_channel: false,
            dealiasing_fraction: DEALIASING_QUADRATIC,
        }
    }
}

impl Equation for Burgers {
    fn num_channels(&self, grid: &SpectralGrid) -> usize {
        if self.single_channel {
            1
        } else {
            grid.num_spatial_dims
        }
    }

    fn build_linear_operator(
        &self,
        _grid: &SpectralGrid,
        derivative_operator: &ArrayD<Complex64>,
    ) -> SpectralResult<ArrayD<Complex64>> {
        Ok(build_laplace_operator(derivative_operator, 2)? * self.diffusivity)
    }

    fn build_nonlinear_fun(&self, grid: &SpectralGrid) -> SpectralResult<NonlinearFun> {
        NonlinearFun::convection(
            grid,
            self.num_channels(grid),
            self.dealiasing_fraction,
            self.convection_scale,
            self.single_channel,
        )
    }
}

/// `∂_t u = -s2 Δu - s4 Δ²u - g · ½ |∇u|²` (combustion form).
///
/// The mean of the gradient-norm term is dropped so the spatial mean of
/// `u` stays constant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KuramotoSivashinsky {
    pub gradient_norm_scale: f64,
    pub second_order_scale: f64,
    pub fourth_order_scale: f64,
    pub dealiasing_fraction: f64,
}

impl Default for KuramotoSivashinsky {
    fn default() -> Self {
        KuramotoSivashinsky {
            gradient_norm_scale: 1.0,
            second_order_scale: 1.0,
            fourth_order_scale: 1.0,
            dealiasing_fraction: DEALIASING_QUADRATIC,
        }
    }
}

impl Equation for KuramotoSivashinsky {
    fn num_channels(&self, _grid: &SpectralGrid) -> usize {
        1
    }

    fn build_linear_operator(
        &self,
        _grid: &SpectralGrid,
        derivative_operator: &ArrayD<Complex64>,
    ) -> SpectralResult<ArrayD<Complex64>> {
        let laplace = build_laplace_operator(derivative_operator, 2)?;
        let bilaplace = build_laplace_operator(derivative_operator, 4)?;
        Ok(laplace * (-self.second_order_scale) - bilaplace * self.fourth_order_scale)
    }

    fn build_nonlinear_fun(&self, grid: &SpectralGrid) -> SpectralResult<NonlinearFun> {
        NonlinearFun::gradient_norm(
            grid,
            1,
            self.dealiasing_fraction,
            self.gradient_norm_scale,
            true,
        )
    }
}

/// 2D vorticity form of Navier-Stokes with linear drag and a steady
/// shear forcing at `injection_mode`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KolmogorovFlow {
    pub diffusivity: f64,
    pub drag: f64,
    pub injection_mode: usize,
    pub injection_scale: f64,
    pub convection_scale: f64,
    pub dealiasing_fraction: f64,
}

impl Default for KolmogorovFlow {
    fn default() -> Self {
        KolmogorovFlow {
            diffusivity: 1e-3,
            drag: -0.1,
            injection_mode: 4,
            injection_scale: 1.0,
            convection_scale: 1.0,
            dealiasing_fraction: DEALIASING_QUADRATIC,
        }
    }
}

impl Equation for KolmogorovFlow {
    fn num_channels(&self, _grid: &SpectralGrid) -> usize {
        1
    }

    fn build_linear_operator(
        &self,
        grid: &SpectralGrid,
        derivative_operator: &ArrayD<Complex64>,
    ) -> SpectralResult<ArrayD<Complex64>> {
        if grid.num_spatial_dims != 2 {
            return Err(SpectralError::ConfigError(format!(
                "Kolmogorov flow is only defined in 2D, got {}D",
                grid.num_spatial_dims
            )));
        }
        let laplace = build_laplace_operator(derivative_operator, 2)?;
        Ok(laplace * self.diffusivity + Complex64::new(self.drag, 0.0))
    }

    fn build_nonlinear_fun(&self, grid: &SpectralGrid) -> SpectralResult<NonlinearFun> {
        NonlinearFun::kolmogorov_vorticity_convection(
            grid,
            self.dealiasing_fraction,
            self.convection_scale,
            self.injection_mode,
            self.injection_scale,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Axis, IxDyn};
    use spectral_core::stepper::EtdrkStepper;
    use spectral_types::config::StepperConfig;
    use std::f64::consts::PI;

    #[test]
    fn test_diffusion_matches_heat_kernel() {
        let n = 32;
        let config = StepperConfig::new(1, 2.0, n, 0.05).with_order(1);
        let stepper = EtdrkStepper::from_equation(&config, &Diffusion::default()).unwrap();
        let u0 = ArrayD::from_shape_fn(IxDyn(&[1, n]), |idx| {
            (2.0 * PI * 3.0 * idx[1] as f64 / n as f64).cos()
        });
        let u = stepper.rollout(&u0, 20, false).unwrap().pop().unwrap();
        // k = 2π·3 / 2
        let decay = (-0.01 * (3.0 * PI).powi(2) * 1.0).exp();
        for (a, b) in u.iter().zip(u0.iter()) {
            assert!((a - decay * b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_burgers_channels_follow_dimension() {
        let grid = SpectralGrid::new(2, 1.0, 16).unwrap();
        assert_eq!(Burgers::default().num_channels(&grid), 2);
        let scalar = Burgers {
            single_channel: true,
            ..Burgers::default()
        };
        assert_eq!(scalar.num_channels(&grid), 1);
    }

    #[test]
    fn test_burgers_2d_conserves_momentum() {
        let n = 16;
        let config = StepperConfig::new(2, 1.0, n, 1e-3).with_order(2);
        let stepper = EtdrkStepper::from_equation(&config, &Burgers::default()).unwrap();
        let xy = stepper.grid().coordinates(false);
        let u0 = ArrayD::from_shape_fn(IxDyn(&[2, n, n]), |idx| {
            let (x, y) = (xy[[0, idx[1], idx[2]]], xy[[1, idx[1], idx[2]]]);
            if idx[0] == 0 {
                0.2 + (2.0 * PI * y).sin()
            } else {
                -0.1 + (2.0 * PI * x).cos() * (2.0 * PI * y).sin()
            }
        });
        let u = stepper.rollout(&u0, 50, false).unwrap().pop().unwrap();
        let means = u.mean_axis(Axis(2)).unwrap().mean_axis(Axis(1)).unwrap();
        assert!((means[[0]] - 0.2).abs() < 1e-10);
        assert!((means[[1]] + 0.1).abs() < 1e-10);
    }

    #[test]
    fn test_kuramoto_sivashinsky_stays_bounded() {
        let n = 128;
        let config = StepperConfig::new(1, 60.0, n, 0.05).with_order(2);
        let stepper =
            EtdrkStepper::from_equation(&config, &KuramotoSivashinsky::default()).unwrap();
        let u0 = ArrayD::from_shape_fn(IxDyn(&[1, n]), |idx| {
            let x = 60.0 * idx[1] as f64 / n as f64;
            0.1 * (2.0 * PI * x / 60.0).cos() + 0.05 * (2.0 * PI * 3.0 * x / 60.0).sin()
        });
        let trajectory = stepper.rollout(&u0, 600, false).unwrap();
        for state in &trajectory {
            assert!(state.iter().all(|v| v.is_finite() && v.abs() < 50.0));
        }
        let mean = trajectory.last().unwrap().sum() / n as f64;
        assert!(mean.abs() < 1e-10, "mean drifted to {mean}");
    }

    #[test]
    fn test_kolmogorov_requires_2d() {
        let config = StepperConfig::new(1, 1.0, 16, 1e-2);
        let result = EtdrkStepper::from_equation(&config, &KolmogorovFlow::default());
        assert!(matches!(result, Err(SpectralError::ConfigError(_))));
    }

    #[test]
    fn test_kolmogorov_from_rest_follows_forcing() {
        // From ω = 0 one step gives dt·φ1(L̂ dt)·f on the forced mode.
        let n = 32;
        let dt = 1e-3;
        let config = StepperConfig::new(2, 1.0, n, dt).with_order(2);
        let flow = KolmogorovFlow::default();
        let stepper = EtdrkStepper::from_equation(&config, &flow).unwrap();
        let omega = stepper.step(&ArrayD::zeros(IxDyn(&[1, n, n]))).unwrap();
        let z = (-flow.diffusivity * (2.0 * PI * 4.0).powi(2) + flow.drag) * dt;
        let phi_1 = (z.exp() - 1.0) / z;
        for j in 0..n {
            let forcing = (2.0 * PI * 4.0 * j as f64 / n as f64).cos();
            assert!((omega[[0, 5, j]] - dt * phi_1 * forcing).abs() < 1e-12);
        }
    }
}
