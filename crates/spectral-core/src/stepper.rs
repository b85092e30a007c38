// ─────────────────────────────────────────────────────────────────────
// SCPN Spectral Core — ETDRK Stepper
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Exponential time differencing Runge-Kutta stepper for
//! `∂_t u = L u + N(u)` on a periodic box.
//!
//! `L` is diagonal in Fourier space and integrated exactly; `N` enters
//! through the contour-quadrature coefficients of order 0..=4. Each step
//! maps the state forward by exactly `dt`.

use ndarray::{ArrayD, IxDyn};
use num_complex::Complex64;
use rayon::prelude::*;
use spectral_math::etdrk::EtdrkCoefficients;
use spectral_math::fft::RealFft;
use spectral_math::spectral::build_derivative_operator;
use spectral_types::config::StepperConfig;
use spectral_types::error::{SpectralError, SpectralResult};
use spectral_types::state::SpectralGrid;

use crate::nonlinear::NonlinearFun;

/// A semi-linear PDE: supplies its linear operator and nonlinear term.
pub trait Equation {
    fn num_channels(&self, grid: &SpectralGrid) -> usize;

    /// Diagonal Fourier symbol `L̂`, shape `[1 or C, N, ..., N/2 + 1]`.
    fn build_linear_operator(
        &self,
        grid: &SpectralGrid,
        derivative_operator: &ArrayD<Complex64>,
    ) -> SpectralResult<ArrayD<Complex64>>;

    fn build_nonlinear_fun(&self, grid: &SpectralGrid) -> SpectralResult<NonlinearFun>;
}

/// Fixed-step ETDRK integrator. Immutable after construction.
#[derive(Debug, Clone)]
pub struct EtdrkStepper {
    grid: SpectralGrid,
    dt: f64,
    num_channels: usize,
    transform: RealFft,
    linear_operator: ArrayD<Complex64>,
    nonlinear_fun: NonlinearFun,
    coefficients: EtdrkCoefficients,
}

impl EtdrkStepper {
    /// Precompute all step coefficients for `linear_operator`.
    ///
    /// A single-channel operator is broadcast to `num_channels`.
    pub fn new(
        config: &StepperConfig,
        num_channels: usize,
        linear_operator: ArrayD<Complex64>,
        nonlinear_fun: NonlinearFun,
    ) -> SpectralResult<Self> {
        config.validate()?;
        let grid = config.grid()?;
        if num_channels == 0 {
            return Err(SpectralError::ConfigError(
                "stepper needs at least one channel".to_string(),
            ));
        }
        if nonlinear_fun.grid() != &grid {
            return Err(SpectralError::ConfigError(format!(
                "nonlinear term grid {:?} differs from stepper grid {grid:?}",
                nonlinear_fun.grid()
            )));
        }
        if nonlinear_fun.num_channels() != num_channels {
            return Err(SpectralError::ConfigError(format!(
                "nonlinear term has {} channels, stepper has {num_channels}",
                nonlinear_fun.num_channels()
            )));
        }

        let fourier_shape = grid.fourier_state_shape(num_channels);
        let leading = linear_operator.shape().first().copied().unwrap_or(0);
        let wavenumber_shape = grid.wavenumber_shape();
        if (leading != 1 && leading != num_channels)
            || linear_operator.shape()[1..] != wavenumber_shape[..]
        {
            return Err(SpectralError::ConfigError(format!(
                "linear operator shape {:?} does not fit {fourier_shape:?}",
                linear_operator.shape()
            )));
        }
        let linear_operator = match linear_operator.broadcast(IxDyn(&fourier_shape)) {
            Some(view) => view.to_owned(),
            None => {
                return Err(SpectralError::ShapeMismatch {
                    expected: fourier_shape,
                    actual: linear_operator.shape().to_vec(),
                })
            }
        };

        let coefficients = EtdrkCoefficients::new(
            &linear_operator,
            config.dt,
            config.order,
            config.num_circle_points,
            config.circle_radius,
        )?;
        log::debug!(
            "stepper: D={} N={} L={} C={num_channels} dt={:.3e} order={}",
            grid.num_spatial_dims,
            grid.num_points,
            grid.domain_extent,
            config.dt,
            config.order
        );

        Ok(EtdrkStepper {
            grid,
            dt: config.dt,
            num_channels,
            transform: RealFft::new(grid.num_spatial_dims, grid.num_points),
            linear_operator,
            nonlinear_fun,
            coefficients,
        })
    }

    /// Build from an [`Equation`] description.
    pub fn from_equation<E: Equation + ?Sized>(
        config: &StepperConfig,
        equation: &E,
    ) -> SpectralResult<Self> {
        let grid = config.grid()?;
        let derivative_operator = build_derivative_operator(&grid);
        let linear_operator = equation.build_linear_operator(&grid, &derivative_operator)?;
        let nonlinear_fun = equation.build_nonlinear_fun(&grid)?;
        Self::new(config, equation.num_channels(&grid), linear_operator, nonlinear_fun)
    }

    pub fn grid(&self) -> &SpectralGrid {
        &self.grid
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn order(&self) -> usize {
        self.coefficients.order()
    }

    pub fn num_channels(&self) -> usize {
        self.num_channels
    }

    /// `L̂` broadcast to `[C, N, ..., N/2 + 1]`.
    pub fn linear_operator(&self) -> &ArrayD<Complex64> {
        &self.linear_operator
    }

    pub fn nonlinear_fun(&self) -> &NonlinearFun {
        &self.nonlinear_fun
    }

    pub fn coefficients(&self) -> &EtdrkCoefficients {
        &self.coefficients
    }

    /// Advance a Fourier state by one step of `dt`.
    pub fn step_fourier(&self, u_hat: &ArrayD<Complex64>) -> SpectralResult<ArrayD<Complex64>> {
        SpectralError::check_shape(&self.grid.fourier_state_shape(self.num_channels), u_hat.shape())?;
        let n = |v: &ArrayD<Complex64>| self.nonlinear_fun.evaluate(v);

        match &self.coefficients {
            EtdrkCoefficients::Order0 { exp_term } => Ok(exp_term * u_hat),
            EtdrkCoefficients::Order1 { exp_term, coef_1 } => {
                let nu = n(u_hat)?;
                Ok(exp_term * u_hat + coef_1 * &nu)
            }
            EtdrkCoefficients::Order2 {
                exp_term,
                coef_1,
                coef_2,
            } => {
                let nu = n(u_hat)?;
                let a = exp_term * u_hat + coef_1 * &nu;
                let na = n(&a)?;
                Ok(a + coef_2 * &(na - &nu))
            }
            EtdrkCoefficients::Order3 {
                exp_term,
                half_exp_term,
                coef_1,
                coef_2,
                coef_3,
                coef_4,
                coef_5,
            } => {
                let nu = n(u_hat)?;
                let a = half_exp_term * u_hat + coef_1 * &nu;
                let na = n(&a)?;
                let b = exp_term * u_hat + coef_2 * &(&na * 2.0 - &nu);
                let nb = n(&b)?;
                Ok(exp_term * u_hat + coef_3 * &nu + coef_4 * &na + coef_5 * &nb)
            }
            EtdrkCoefficients::Order4 {
                exp_term,
                half_exp_term,
                coef_1,
                coef_4,
                coef_5,
                coef_6,
            } => {
                let nu = n(u_hat)?;
                let a = half_exp_term * u_hat + coef_1 * &nu;
                let na = n(&a)?;
                let b = half_exp_term * u_hat + coef_1 * &na;
                let nb = n(&b)?;
                let c = half_exp_term * &a + coef_1 * &(&nb * 2.0 - &nu);
                let nc = n(&c)?;
                Ok(exp_term * u_hat
                    + coef_4 * &nu
                    + coef_5 * &((na + &nb) * 2.0)
                    + coef_6 * &nc)
            }
        }
    }

    /// Advance a physical state `[C, N, ..., N]` by one step of `dt`.
    pub fn step(&self, u: &ArrayD<f64>) -> SpectralResult<ArrayD<f64>> {
        SpectralError::check_shape(&self.grid.state_shape(self.num_channels), u.shape())?;
        let u_hat = self.transform.rfftn(u)?;
        let u_next_hat = self.step_fourier(&u_hat)?;
        self.transform.irfftn(&u_next_hat)
    }

    /// Repeated stepping; stays in Fourier space between steps.
    ///
    /// Returns `num_steps` states, or `num_steps + 1` with the initial
    /// state first when `include_init` is set.
    pub fn rollout(
        &self,
        u_0: &ArrayD<f64>,
        num_steps: usize,
        include_init: bool,
    ) -> SpectralResult<Vec<ArrayD<f64>>> {
        SpectralError::check_shape(&self.grid.state_shape(self.num_channels), u_0.shape())?;
        let mut trajectory = Vec::with_capacity(num_steps + usize::from(include_init));
        if include_init {
            trajectory.push(u_0.clone());
        }
        let mut u_hat = self.transform.rfftn(u_0)?;
        for _ in 0..num_steps {
            u_hat = self.step_fourier(&u_hat)?;
            trajectory.push(self.transform.irfftn(&u_hat)?);
        }
        Ok(trajectory)
    }

    /// Step independent states in parallel.
    pub fn step_batch(&self, states: &[ArrayD<f64>]) -> SpectralResult<Vec<ArrayD<f64>>> {
        states.par_iter().map(|u| self.step(u)).collect()
    }

    pub fn step_fourier_batch(
        &self,
        states: &[ArrayD<Complex64>],
    ) -> SpectralResult<Vec<ArrayD<Complex64>>> {
        states.par_iter().map(|u_hat| self.step_fourier(u_hat)).collect()
    }
}
