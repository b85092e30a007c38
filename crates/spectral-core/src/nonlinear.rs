// ─────────────────────────────────────────────────────────────────────
// SCPN Spectral Core — Nonlinear Terms
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Pseudo-spectral evaluation of the nonlinear term `N(u)`.
//!
//! Every variant follows the same path: dealias the Fourier state, inverse
//! transform to physical space, apply the pointwise map, transform back.
//! Only the pointwise map (and where derivative factors enter) differs.

use std::f64::consts::PI;
use std::fmt;
use std::sync::Arc;

use ndarray::{ArrayD, Axis, IxDyn};
use num_complex::Complex64;
use spectral_math::fft::RealFft;
use spectral_math::spectral::{build_derivative_operator, build_laplace_operator, DealiasingMask};
use spectral_types::error::{SpectralError, SpectralResult};
use spectral_types::state::SpectralGrid;

/// User-supplied pointwise map on the physical-space field `[C, N, ..., N]`.
pub trait PointwiseMap: Send + Sync + fmt::Debug {
    /// Channel count the map is defined for, `None` if it works for any.
    fn required_channels(&self) -> Option<usize> {
        None
    }

    /// Returns an array of the same shape as `u`.
    fn apply(&self, u: &ArrayD<f64>) -> SpectralResult<ArrayD<f64>>;
}

/// Closed set of supported nonlinearities.
#[derive(Debug, Clone)]
pub enum NonlinearKind {
    Zero,
    /// `Σ_i c_i u^i` per channel.
    Polynomial { coefficients: Vec<f64> },
    /// `-scale · ½ ∇·(u ⊗ u)`; with `single_channel` the scalar form
    /// `-scale · ½ (Σ_d ∂_d)(u²)`.
    Convection { scale: f64, single_channel: bool },
    /// `-scale · ½ |∇u|²`.
    GradientNorm { scale: f64, zero_mode_fix: bool },
    /// 2D vorticity advection `-scale · (u·∇)ω` with optional fixed forcing.
    VorticityConvection {
        scale: f64,
        inv_laplace: ArrayD<Complex64>,
        forcing: Option<ArrayD<Complex64>>,
    },
    /// `q·u² + c·½(u²)_x + g·½(u_x)²` for `scales = [q, c, g]`.
    General1d {
        scales: [f64; 3],
        zero_mode_fix: bool,
    },
    Pointwise(Arc<dyn PointwiseMap>),
}

/// Nonlinear term evaluator bound to one grid and channel count.
#[derive(Debug, Clone)]
pub struct NonlinearFun {
    grid: SpectralGrid,
    num_channels: usize,
    transform: RealFft,
    derivative_operator: ArrayD<Complex64>,
    dealiasing_mask: DealiasingMask,
    kind: NonlinearKind,
}

impl NonlinearFun {
    fn with_kind(
        grid: &SpectralGrid,
        num_channels: usize,
        dealiasing_fraction: f64,
        kind: NonlinearKind,
    ) -> SpectralResult<Self> {
        if num_channels == 0 {
            return Err(SpectralError::ConfigError(
                "nonlinear term needs at least one channel".to_string(),
            ));
        }
        Ok(NonlinearFun {
            grid: *grid,
            num_channels,
            transform: RealFft::new(grid.num_spatial_dims, grid.num_points),
            derivative_operator: build_derivative_operator(grid),
            dealiasing_mask: DealiasingMask::new(grid, dealiasing_fraction)?,
            kind,
        })
    }

    /// `N ≡ 0`, for purely linear equations.
    pub fn zero(grid: &SpectralGrid, num_channels: usize) -> SpectralResult<Self> {
        Self::with_kind(grid, num_channels, 1.0, NonlinearKind::Zero)
    }

    pub fn polynomial(
        grid: &SpectralGrid,
        num_channels: usize,
        dealiasing_fraction: f64,
        coefficients: Vec<f64>,
    ) -> SpectralResult<Self> {
        Self::with_kind(
            grid,
            num_channels,
            dealiasing_fraction,
            NonlinearKind::Polynomial { coefficients },
        )
    }

    /// Without `single_channel` the state is a velocity field and must have
    /// one channel per spatial dimension.
    pub fn convection(
        grid: &SpectralGrid,
        num_channels: usize,
        dealiasing_fraction: f64,
        scale: f64,
        single_channel: bool,
    ) -> SpectralResult<Self> {
        if !single_channel && num_channels != grid.num_spatial_dims {
            return Err(SpectralError::ConfigError(format!(
                "convection needs {} channels (one per spatial dim), got {num_channels}",
                grid.num_spatial_dims
            )));
        }
        Self::with_kind(
            grid,
            num_channels,
            dealiasing_fraction,
            NonlinearKind::Convection {
                scale,
                single_channel,
            },
        )
    }

    pub fn gradient_norm(
        grid: &SpectralGrid,
        num_channels: usize,
        dealiasing_fraction: f64,
        scale: f64,
        zero_mode_fix: bool,
    ) -> SpectralResult<Self> {
        Self::with_kind(
            grid,
            num_channels,
            dealiasing_fraction,
            NonlinearKind::GradientNorm {
                scale,
                zero_mode_fix,
            },
        )
    }

    /// Vorticity advection on a 2D grid; the state is the scalar vorticity.
    pub fn vorticity_convection(
        grid: &SpectralGrid,
        dealiasing_fraction: f64,
        scale: f64,
    ) -> SpectralResult<Self> {
        Self::vorticity(grid, dealiasing_fraction, scale, None)
    }

    /// Vorticity advection plus the time-independent Kolmogorov forcing
    /// `injection_scale · cos(2π m y / L)`, `m = injection_mode`, `y` the
    /// second axis.
    pub fn kolmogorov_vorticity_convection(
        grid: &SpectralGrid,
        dealiasing_fraction: f64,
        scale: f64,
        injection_mode: usize,
        injection_scale: f64,
    ) -> SpectralResult<Self> {
        if injection_mode > grid.num_points / 2 {
            return Err(SpectralError::ConfigError(format!(
                "injection mode {injection_mode} exceeds Nyquist {}",
                grid.num_points / 2
            )));
        }
        let n = grid.num_points;
        let field = ArrayD::from_shape_fn(IxDyn(&grid.state_shape(1)), |idx| {
            injection_scale * (2.0 * PI * (injection_mode * idx[2]) as f64 / n as f64).cos()
        });
        let forcing = RealFft::new(grid.num_spatial_dims, n).rfftn(&field)?;
        Self::vorticity(grid, dealiasing_fraction, scale, Some(forcing))
    }

    fn vorticity(
        grid: &SpectralGrid,
        dealiasing_fraction: f64,
        scale: f64,
        forcing: Option<ArrayD<Complex64>>,
    ) -> SpectralResult<Self> {
        if grid.num_spatial_dims != 2 {
            return Err(SpectralError::ConfigError(format!(
                "vorticity convection is only defined in 2D, got {}D",
                grid.num_spatial_dims
            )));
        }
        let laplace = build_laplace_operator(&build_derivative_operator(grid), 2)?;
        let inv_laplace = laplace.mapv(|l| {
            if l.norm() == 0.0 {
                Complex64::new(1.0, 0.0)
            } else {
                l.inv()
            }
        });
        Self::with_kind(
            grid,
            1,
            dealiasing_fraction,
            NonlinearKind::VorticityConvection {
                scale,
                inv_laplace,
                forcing,
            },
        )
    }

    /// Single-equation 1D combination of quadratic, convective and
    /// gradient-norm terms with independent scales.
    pub fn general_1d(
        grid: &SpectralGrid,
        dealiasing_fraction: f64,
        scales: [f64; 3],
        zero_mode_fix: bool,
    ) -> SpectralResult<Self> {
        if grid.num_spatial_dims != 1 {
            return Err(SpectralError::ConfigError(format!(
                "general nonlinear term is 1D only, got {}D",
                grid.num_spatial_dims
            )));
        }
        Self::with_kind(
            grid,
            1,
            dealiasing_fraction,
            NonlinearKind::General1d {
                scales,
                zero_mode_fix,
            },
        )
    }

    pub fn pointwise(
        grid: &SpectralGrid,
        num_channels: usize,
        dealiasing_fraction: f64,
        map: Arc<dyn PointwiseMap>,
    ) -> SpectralResult<Self> {
        if let Some(required) = map.required_channels() {
            if required != num_channels {
                return Err(SpectralError::ConfigError(format!(
                    "pointwise map {map:?} expects {required} channels, got {num_channels}"
                )));
            }
        }
        Self::with_kind(
            grid,
            num_channels,
            dealiasing_fraction,
            NonlinearKind::Pointwise(map),
        )
    }

    pub fn grid(&self) -> &SpectralGrid {
        &self.grid
    }

    pub fn num_channels(&self) -> usize {
        self.num_channels
    }

    pub fn kind(&self) -> &NonlinearKind {
        &self.kind
    }

    pub fn dealiasing_mask(&self) -> &DealiasingMask {
        &self.dealiasing_mask
    }

    pub fn derivative_operator(&self) -> &ArrayD<Complex64> {
        &self.derivative_operator
    }

    /// `N̂(û)` for a Fourier state of shape `[C, N, ..., N/2 + 1]`.
    pub fn evaluate(&self, u_hat: &ArrayD<Complex64>) -> SpectralResult<ArrayD<Complex64>> {
        SpectralError::check_shape(
            &self.grid.fourier_state_shape(self.num_channels),
            u_hat.shape(),
        )?;
        match &self.kind {
            NonlinearKind::Zero => Ok(ArrayD::zeros(u_hat.raw_dim())),
            NonlinearKind::Polynomial { coefficients } => {
                let u = self.to_physical(u_hat)?;
                // Horner
                let u_power = u.mapv(|v| coefficients.iter().rev().fold(0.0, |acc, &c| acc * v + c));
                self.transform.rfftn(&u_power)
            }
            NonlinearKind::Convection {
                scale,
                single_channel,
            } => {
                if *single_channel {
                    self.convection_single(u_hat, *scale)
                } else {
                    self.convection_vector(u_hat, *scale)
                }
            }
            NonlinearKind::GradientNorm {
                scale,
                zero_mode_fix,
            } => {
                let grad = self.to_physical(&self.gradient_hat(u_hat))?;
                let norm_sq = grad.mapv(|g| g * g).sum_axis(Axis(1));
                let mut norm_sq_hat = self.transform.rfftn(&norm_sq)?;
                if *zero_mode_fix {
                    zero_mean_mode(&mut norm_sq_hat);
                }
                Ok(norm_sq_hat * (-0.5 * scale))
            }
            NonlinearKind::VorticityConvection {
                scale,
                inv_laplace,
                forcing,
            } => {
                let neg_convection = self.vorticity_advection(u_hat, *scale, inv_laplace)?;
                Ok(match forcing {
                    Some(f) => neg_convection + f,
                    None => neg_convection,
                })
            }
            NonlinearKind::General1d {
                scales,
                zero_mode_fix,
            } => self.general_1d_term(u_hat, *scales, *zero_mode_fix),
            NonlinearKind::Pointwise(map) => {
                let u = self.to_physical(u_hat)?;
                let mapped = map.apply(&u)?;
                SpectralError::check_shape(u.shape(), mapped.shape())?;
                self.transform.rfftn(&mapped)
            }
        }
    }

    /// Dealias, then inverse transform.
    fn to_physical(&self, u_hat: &ArrayD<Complex64>) -> SpectralResult<ArrayD<f64>> {
        self.transform.irfftn(&self.dealiasing_mask.apply(u_hat)?)
    }

    /// `[C, D, ...]` spectral gradient of a `[C, ...]` state.
    fn gradient_hat(&self, u_hat: &ArrayD<Complex64>) -> ArrayD<Complex64> {
        let u = u_hat.view().insert_axis(Axis(1));
        let d = self.derivative_operator.view().insert_axis(Axis(0));
        &u * &d
    }

    fn convection_single(
        &self,
        u_hat: &ArrayD<Complex64>,
        scale: f64,
    ) -> SpectralResult<ArrayD<Complex64>> {
        let u = self.to_physical(u_hat)?;
        let u_square_hat = self.transform.rfftn(&u.mapv(|v| v * v))?;
        let sum_of_derivatives = self.derivative_operator.sum_axis(Axis(0));
        Ok(&u_square_hat * &sum_of_derivatives * (-0.5 * scale))
    }

    fn convection_vector(
        &self,
        u_hat: &ArrayD<Complex64>,
        scale: f64,
    ) -> SpectralResult<ArrayD<Complex64>> {
        let u = self.to_physical(u_hat)?;
        // u_i u_j, shape [C, C, N, ...]
        let outer = &u.view().insert_axis(Axis(1)) * &u.view().insert_axis(Axis(0));
        let outer_hat = self.transform.rfftn(&outer)?;
        let d = self.derivative_operator.view().insert_axis(Axis(0));
        let divergence = (&outer_hat * &d).sum_axis(Axis(1));
        Ok(divergence * (-0.5 * scale))
    }

    fn vorticity_advection(
        &self,
        omega_hat: &ArrayD<Complex64>,
        scale: f64,
        inv_laplace: &ArrayD<Complex64>,
    ) -> SpectralResult<ArrayD<Complex64>> {
        let dx = self.derivative_operator.index_axis(Axis(0), 0);
        let dy = self.derivative_operator.index_axis(Axis(0), 1);

        // ψ̂ = -Δ⁻¹ ω̂, velocity (∂_y ψ, -∂_x ψ)
        let psi_hat = -(inv_laplace * omega_hat);
        let u_vel = self.to_physical(&(&psi_hat * &dy))?;
        let v_vel = self.to_physical(&(&psi_hat * &dx).mapv(|c| -c))?;
        let domega_dx = self.to_physical(&(omega_hat * &dx))?;
        let domega_dy = self.to_physical(&(omega_hat * &dy))?;

        let convection = &u_vel * &domega_dx + &v_vel * &domega_dy;
        Ok(self.transform.rfftn(&convection)? * (-scale))
    }

    fn general_1d_term(
        &self,
        u_hat: &ArrayD<Complex64>,
        scales: [f64; 3],
        zero_mode_fix: bool,
    ) -> SpectralResult<ArrayD<Complex64>> {
        let [quadratic, convection, gradient_norm] = scales;
        let u_hat_dealiased = self.dealiasing_mask.apply(u_hat)?;
        let dx = self.derivative_operator.index_axis(Axis(0), 0);

        let u = self.transform.irfftn(&u_hat_dealiased)?;
        let u_square_hat = self.transform.rfftn(&u.mapv(|v| v * v))?;
        let u_x = self.transform.irfftn(&(&u_hat_dealiased * &dx))?;
        let mut u_x_square_hat = self.transform.rfftn(&u_x.mapv(|v| v * v))?;
        if zero_mode_fix {
            zero_mean_mode(&mut u_x_square_hat);
        }

        Ok(&u_square_hat * quadratic
            + &u_square_hat * &dx * (0.5 * convection)
            + u_x_square_hat * (0.5 * gradient_norm))
    }
}

/// Zero the `k = 0` coefficient of every channel.
fn zero_mean_mode(u_hat: &mut ArrayD<Complex64>) {
    for mut channel in u_hat.outer_iter_mut() {
        if let Some(mean) = channel.first_mut() {
            *mean = Complex64::new(0.0, 0.0);
        }
    }
}
