// ─────────────────────────────────────────────────────────────────────
// SCPN Spectral Core — State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::constants::MAX_SPATIAL_DIMS;
use crate::error::{SpectralError, SpectralResult};
use ndarray::{concatenate, Array1, ArrayD, Axis, IxDyn, Slice};
use serde::{Deserialize, Serialize};

/// Periodic grid on `[0, domain_extent)^D` with `num_points` per axis.
///
/// Real states are laid out as `[C, N, ..., N]` and Fourier states as
/// `[C, N, ..., N, N/2 + 1]` (real-input transform along the last axis).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectralGrid {
    pub num_spatial_dims: usize,
    pub domain_extent: f64,
    pub num_points: usize,
}

impl SpectralGrid {
    pub fn new(
        num_spatial_dims: usize,
        domain_extent: f64,
        num_points: usize,
    ) -> SpectralResult<Self> {
        if num_spatial_dims == 0 || num_spatial_dims > MAX_SPATIAL_DIMS {
            return Err(SpectralError::ConfigError(format!(
                "num_spatial_dims must be in 1..={MAX_SPATIAL_DIMS}, got {num_spatial_dims}"
            )));
        }
        if !domain_extent.is_finite() || domain_extent <= 0.0 {
            return Err(SpectralError::ConfigError(format!(
                "domain_extent must be finite and > 0, got {domain_extent}"
            )));
        }
        if num_points < 2 || num_points % 2 != 0 {
            return Err(SpectralError::ConfigError(format!(
                "num_points must be even and >= 2, got {num_points}"
            )));
        }
        Ok(SpectralGrid {
            num_spatial_dims,
            domain_extent,
            num_points,
        })
    }

    /// Grid spacing `L / N`.
    pub fn spacing(&self) -> f64 {
        self.domain_extent / self.num_points as f64
    }

    /// Number of modes kept along the last axis of a real transform.
    pub fn num_half_modes(&self) -> usize {
        self.num_points / 2 + 1
    }

    pub fn spatial_shape(&self) -> Vec<usize> {
        vec![self.num_points; self.num_spatial_dims]
    }

    pub fn wavenumber_shape(&self) -> Vec<usize> {
        let mut shape = self.spatial_shape();
        if let Some(last) = shape.last_mut() {
            *last = self.num_half_modes();
        }
        shape
    }

    /// `[C, N, ..., N]`
    pub fn state_shape(&self, num_channels: usize) -> Vec<usize> {
        let mut shape = vec![num_channels];
        shape.extend(self.spatial_shape());
        shape
    }

    /// `[C, N, ..., N/2 + 1]`
    pub fn fourier_state_shape(&self, num_channels: usize) -> Vec<usize> {
        let mut shape = vec![num_channels];
        shape.extend(self.wavenumber_shape());
        shape
    }

    /// 1D coordinates of the grid points. With `full` the right boundary
    /// point `x = L` is included.
    pub fn coordinates_1d(&self, full: bool) -> Array1<f64> {
        let n = if full {
            self.num_points + 1
        } else {
            self.num_points
        };
        let dx = self.spacing();
        Array1::from_shape_fn(n, |i| i as f64 * dx)
    }

    /// Meshgrid (ij indexing) of shape `[D, N, ..., N]`; component `d` holds
    /// the coordinate along axis `d`.
    pub fn coordinates(&self, full: bool) -> ArrayD<f64> {
        let axis = self.coordinates_1d(full);
        let n = axis.len();
        let mut shape = vec![self.num_spatial_dims];
        shape.extend(std::iter::repeat(n).take(self.num_spatial_dims));
        ArrayD::from_shape_fn(IxDyn(&shape), |idx| axis[idx[1 + idx[0]]])
    }
}

/// Append the first slice along every spatial axis so that periodic data can
/// be drawn on the closed interval `[0, L]`. The leading channel axis is left
/// untouched. Presentation only.
pub fn wrap_bc(state: &ArrayD<f64>) -> SpectralResult<ArrayD<f64>> {
    let mut wrapped = state.clone();
    for ax in 1..state.ndim() {
        let first = wrapped
            .slice_axis(Axis(ax), Slice::from(0..1))
            .to_owned();
        wrapped = concatenate(Axis(ax), &[wrapped.view(), first.view()])?;
    }
    Ok(wrapped)
}
