// ─────────────────────────────────────────────────────────────────────
// SCPN Spectral Core — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::constants::{DEFAULT_CIRCLE_RADIUS, DEFAULT_NUM_CIRCLE_POINTS, DEFAULT_ORDER, MAX_ORDER};
use crate::error::{SpectralError, SpectralResult};
use crate::state::SpectralGrid;
use serde::{Deserialize, Serialize};

/// Construction parameters of an ETDRK stepper.
///
/// Equation-specific coefficients (diffusivities, reaction rates, ...) are
/// not part of this struct; they live on the equation presets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepperConfig {
    pub num_spatial_dims: usize,
    pub domain_extent: f64,
    pub num_points: usize,
    pub dt: f64,
    /// ETDRK order 0..=4; 0 integrates the linear part only.
    #[serde(default = "default_order")]
    pub order: usize,
    #[serde(default = "default_num_circle_points")]
    pub num_circle_points: usize,
    #[serde(default = "default_circle_radius")]
    pub circle_radius: f64,
}

fn default_order() -> usize {
    DEFAULT_ORDER
}
fn default_num_circle_points() -> usize {
    DEFAULT_NUM_CIRCLE_POINTS
}
fn default_circle_radius() -> f64 {
    DEFAULT_CIRCLE_RADIUS
}

impl StepperConfig {
    /// Config with default order and quadrature parameters.
    pub fn new(num_spatial_dims: usize, domain_extent: f64, num_points: usize, dt: f64) -> Self {
        StepperConfig {
            num_spatial_dims,
            domain_extent,
            num_points,
            dt,
            order: default_order(),
            num_circle_points: default_num_circle_points(),
            circle_radius: default_circle_radius(),
        }
    }

    pub fn with_order(mut self, order: usize) -> Self {
        self.order = order;
        self
    }

    pub fn with_quadrature(mut self, num_circle_points: usize, circle_radius: f64) -> Self {
        self.num_circle_points = num_circle_points;
        self.circle_radius = circle_radius;
        self
    }

    /// Load from a JSON file. Missing quadrature fields fall back to defaults.
    pub fn from_file(path: &str) -> SpectralResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> SpectralResult<()> {
        self.grid()?;
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(SpectralError::ConfigError(format!(
                "dt must be finite and > 0, got {}",
                self.dt
            )));
        }
        if self.order > MAX_ORDER {
            return Err(SpectralError::ConfigError(format!(
                "ETDRK order must be in 0..={MAX_ORDER}, got {}",
                self.order
            )));
        }
        if self.num_circle_points == 0 {
            return Err(SpectralError::ConfigError(
                "num_circle_points must be >= 1".to_string(),
            ));
        }
        if !self.circle_radius.is_finite() || self.circle_radius <= 0.0 {
            return Err(SpectralError::ConfigError(format!(
                "circle_radius must be finite and > 0, got {}",
                self.circle_radius
            )));
        }
        Ok(())
    }

    /// Validated grid descriptor for this config.
    pub fn grid(&self) -> SpectralResult<SpectralGrid> {
        SpectralGrid::new(self.num_spatial_dims, self.domain_extent, self.num_points)
    }
}
