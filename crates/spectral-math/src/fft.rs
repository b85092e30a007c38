// ─────────────────────────────────────────────────────────────────────
// SCPN Spectral Core — FFT
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! N-D real FFT wrappers around rustfft.
//!
//! Convention matches numpy:
//! - Forward (rfftn): unnormalized, last axis truncated to N/2 + 1 modes
//! - Inverse (irfftn): normalized by 1/N^D, Hermitian last axis
//!
//! Only the trailing `num_spatial_dims` axes are transformed; any leading
//! axes (channels, gradient components) are batch axes.

use std::fmt;
use std::sync::Arc;

use ndarray::{ArrayD, Axis, Slice, Zip};
use num_complex::Complex64;
use rustfft::{Fft, FftPlanner};
use spectral_types::error::{SpectralError, SpectralResult};

/// Planned real-input transform for a periodic grid with `num_points` per axis.
#[derive(Clone)]
pub struct RealFft {
    num_spatial_dims: usize,
    num_points: usize,
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
}

impl fmt::Debug for RealFft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RealFft")
            .field("num_spatial_dims", &self.num_spatial_dims)
            .field("num_points", &self.num_points)
            .finish()
    }
}

impl RealFft {
    pub fn new(num_spatial_dims: usize, num_points: usize) -> Self {
        let mut planner = FftPlanner::new();
        RealFft {
            num_spatial_dims,
            num_points,
            forward: planner.plan_fft_forward(num_points),
            inverse: planner.plan_fft_inverse(num_points),
        }
    }

    pub fn num_spatial_dims(&self) -> usize {
        self.num_spatial_dims
    }

    pub fn num_points(&self) -> usize {
        self.num_points
    }

    /// Forward transform. Matches `numpy.fft.rfftn(u, axes=spatial)`.
    pub fn rfftn(&self, field: &ArrayD<f64>) -> SpectralResult<ArrayD<Complex64>> {
        let first = self.check_trailing(field.shape(), self.num_points)?;
        let n = self.num_points;

        let mut data = field.mapv(|v| Complex64::new(v, 0.0));
        for ax in first..data.ndim() {
            transform_axis(&mut data, Axis(ax), &self.forward, n);
        }

        let last = Axis(data.ndim() - 1);
        Ok(data.slice_axis(last, Slice::from(0..n / 2 + 1)).to_owned())
    }

    /// Inverse transform. Matches `numpy.fft.irfftn(u_hat, s=spatial, axes=spatial)`.
    ///
    /// The imaginary parts of the self-conjugate modes along the last axis
    /// (zero and Nyquist) are discarded, as in numpy.
    pub fn irfftn(&self, spectrum: &ArrayD<Complex64>) -> SpectralResult<ArrayD<f64>> {
        let n = self.num_points;
        let half = n / 2 + 1;
        let first = self.check_trailing_fourier(spectrum.shape())?;

        let mut data = spectrum.clone();
        let last = data.ndim() - 1;
        for ax in first..last {
            transform_axis(&mut data, Axis(ax), &self.inverse, n);
        }

        let mut out_shape = data.shape().to_vec();
        out_shape[last] = n;
        let mut out = ArrayD::<f64>::zeros(out_shape);
        let norm = 1.0 / (n as f64).powi(self.num_spatial_dims as i32);

        let mut buffer = vec![Complex64::new(0.0, 0.0); n];
        Zip::from(out.lanes_mut(Axis(last)))
            .and(data.lanes(Axis(last)))
            .for_each(|mut out_lane, lane| {
                for (b, v) in buffer[..half].iter_mut().zip(lane.iter()) {
                    *b = *v;
                }
                // Hermitian completion: X[N-k] = conj(X[k])
                for k in 1..n / 2 {
                    buffer[n - k] = buffer[k].conj();
                }
                self.inverse.process(&mut buffer);
                for (o, b) in out_lane.iter_mut().zip(buffer.iter()) {
                    *o = b.re * norm;
                }
            });

        Ok(out)
    }

    /// Index of the first spatial axis, checking trailing axes have length `n`.
    fn check_trailing(&self, shape: &[usize], n: usize) -> SpectralResult<usize> {
        let d = self.num_spatial_dims;
        if shape.len() < d || shape[shape.len() - d..].iter().any(|&s| s != n) {
            return Err(SpectralError::ShapeMismatch {
                expected: vec![n; d],
                actual: shape.to_vec(),
            });
        }
        Ok(shape.len() - d)
    }

    fn check_trailing_fourier(&self, shape: &[usize]) -> SpectralResult<usize> {
        let d = self.num_spatial_dims;
        let n = self.num_points;
        let mut expected = vec![n; d];
        expected[d - 1] = n / 2 + 1;
        if shape.len() < d || shape[shape.len() - d..] != expected[..] {
            return Err(SpectralError::ShapeMismatch {
                expected,
                actual: shape.to_vec(),
            });
        }
        Ok(shape.len() - d)
    }
}

/// In-place complex FFT of every lane along `axis`.
fn transform_axis(data: &mut ArrayD<Complex64>, axis: Axis, plan: &Arc<dyn Fft<f64>>, n: usize) {
    let mut buffer = vec![Complex64::new(0.0, 0.0); n];
    for mut lane in data.lanes_mut(axis) {
        for (b, v) in buffer.iter_mut().zip(lane.iter()) {
            *b = *v;
        }
        plan.process(&mut buffer);
        for (v, b) in lane.iter_mut().zip(buffer.iter()) {
            *v = *b;
        }
    }
}
