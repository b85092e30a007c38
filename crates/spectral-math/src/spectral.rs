// ─────────────────────────────────────────────────────────────────────
// SCPN Spectral Core — Spectral Operators
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Wavenumber grids, derivative / Laplace operators and dealiasing masks.
//!
//! All arrays use the half-spectrum layout `[.., N, ..., N, N/2 + 1]`.
//! Along every axis but the last the wavenumbers follow FFT ordering
//! `0, 1, ..., N/2 - 1, -N/2, ..., -1`; along the last axis `0, ..., N/2`.

use std::f64::consts::PI;

use ndarray::{ArrayD, Axis, IxDyn, Zip};
use num_complex::Complex64;
use spectral_types::error::{SpectralError, SpectralResult};
use spectral_types::state::SpectralGrid;

/// Integer wavenumber of FFT bin `index` on an `n`-point axis.
fn wavenumber(index: usize, n: usize, half_axis: bool) -> f64 {
    if half_axis || index < n / 2 {
        index as f64
    } else {
        index as f64 - n as f64
    }
}

fn wavenumber_grid_shape(num_spatial_dims: usize, num_points: usize) -> Vec<usize> {
    let mut shape = vec![num_points; num_spatial_dims];
    shape[num_spatial_dims - 1] = num_points / 2 + 1;
    shape
}

/// Integer wavenumbers, shape `[D, N, ..., N/2 + 1]`.
pub fn build_wavenumbers(num_spatial_dims: usize, num_points: usize) -> ArrayD<f64> {
    let mut shape = vec![num_spatial_dims];
    shape.extend(wavenumber_grid_shape(num_spatial_dims, num_points));
    ArrayD::from_shape_fn(IxDyn(&shape), |idx| {
        let d = idx[0];
        wavenumber(idx[1 + d], num_points, d == num_spatial_dims - 1)
    })
}

/// Physical wavenumbers `2π k / L`.
pub fn build_scaled_wavenumbers(grid: &SpectralGrid) -> ArrayD<f64> {
    let scale = 2.0 * PI / grid.domain_extent;
    build_wavenumbers(grid.num_spatial_dims, grid.num_points).mapv(|k| k * scale)
}

/// Derivative operator `i·2πk/L`, shape `[D, N, ..., N/2 + 1]`.
///
/// Component `d` applied to a Fourier state differentiates along axis `d`.
pub fn build_derivative_operator(grid: &SpectralGrid) -> ArrayD<Complex64> {
    build_scaled_wavenumbers(grid).mapv(|k| Complex64::new(0.0, k))
}

/// Laplace power `(Σ_d D_d²)^(order/2)`, shape `[1, N, ..., N/2 + 1]`.
///
/// `order = 2` gives `-|k|²`, `order = 4` the biharmonic `|k|⁴`.
pub fn build_laplace_operator(
    derivative_operator: &ArrayD<Complex64>,
    order: usize,
) -> SpectralResult<ArrayD<Complex64>> {
    if order == 0 || order % 2 != 0 {
        return Err(SpectralError::ConfigError(format!(
            "Laplace operator order must be even and >= 2, got {order}"
        )));
    }
    if derivative_operator.ndim() < 2 {
        return Err(SpectralError::ConfigError(
            "derivative operator needs a leading component axis".to_string(),
        ));
    }
    let power = (order / 2) as i32;
    let laplace = derivative_operator
        .mapv(|d| d * d)
        .sum_axis(Axis(0))
        .mapv(|l| l.powi(power));
    Ok(laplace.insert_axis(Axis(0)))
}

/// Binary low-pass mask over the wavenumber shape `[N, ..., N/2 + 1]`.
///
/// With `axis_separate` a mode survives iff `|k_d| <= cutoff` on every axis,
/// otherwise iff `|k| <= cutoff`.
pub fn low_pass_filter_mask(
    num_spatial_dims: usize,
    num_points: usize,
    cutoff: f64,
    axis_separate: bool,
) -> ArrayD<f64> {
    let shape = wavenumber_grid_shape(num_spatial_dims, num_points);
    ArrayD::from_shape_fn(IxDyn(&shape), |idx| {
        let ks = (0..num_spatial_dims)
            .map(|d| wavenumber(idx[d], num_points, d == num_spatial_dims - 1));
        let keep = if axis_separate {
            ks.map(f64::abs).all(|k| k <= cutoff)
        } else {
            ks.map(|k| k * k).sum::<f64>().sqrt() <= cutoff
        };
        if keep {
            1.0
        } else {
            0.0
        }
    })
}

/// Fourier-space dealiasing mask, computed once per nonlinear evaluator.
#[derive(Debug, Clone)]
pub struct DealiasingMask {
    fraction: f64,
    mask: ArrayD<f64>,
}

impl DealiasingMask {
    /// Axis-separate mask keeping `|k_d| <= fraction · N/2 - 1`.
    ///
    /// The boundary mode `fraction · N/2` itself is dropped; a degree-p
    /// product of it would fold back onto itself.
    pub fn new(grid: &SpectralGrid, fraction: f64) -> SpectralResult<Self> {
        Self::build(grid, fraction, true)
    }

    /// Isotropic variant: same cutoff applied to `|k|`.
    pub fn radial(grid: &SpectralGrid, fraction: f64) -> SpectralResult<Self> {
        Self::build(grid, fraction, false)
    }

    fn build(grid: &SpectralGrid, fraction: f64, axis_separate: bool) -> SpectralResult<Self> {
        if !fraction.is_finite() || fraction <= 0.0 || fraction > 1.0 {
            return Err(SpectralError::ConfigError(format!(
                "dealiasing fraction must be in (0, 1], got {fraction}"
            )));
        }
        // 1e-9 absorbs round-off in fractions such as 2/3
        let cutoff = fraction * (grid.num_points / 2) as f64 - 1.0 + 1e-9;
        Ok(DealiasingMask {
            fraction,
            mask: low_pass_filter_mask(
                grid.num_spatial_dims,
                grid.num_points,
                cutoff,
                axis_separate,
            ),
        })
    }

    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    pub fn as_array(&self) -> &ArrayD<f64> {
        &self.mask
    }

    /// Number of retained modes in the half spectrum.
    pub fn num_retained(&self) -> usize {
        self.mask.iter().filter(|&&m| m > 0.0).count()
    }

    /// Multiply `u_hat` by the mask, broadcasting over its leading axes.
    pub fn apply(&self, u_hat: &ArrayD<Complex64>) -> SpectralResult<ArrayD<Complex64>> {
        let mask = self
            .mask
            .broadcast(u_hat.raw_dim())
            .ok_or_else(|| SpectralError::ShapeMismatch {
                expected: self.mask.shape().to_vec(),
                actual: u_hat.shape().to_vec(),
            })?;
        let mut out = u_hat.clone();
        Zip::from(&mut out).and(&mask).for_each(|c, &m| *c *= m);
        Ok(out)
    }
}
