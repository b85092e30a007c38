// ─────────────────────────────────────────────────────────────────────
// SCPN Spectral Core — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
/// Dealiasing fraction for quadratic / convective nonlinearities (2/3 rule).
pub const DEALIASING_QUADRATIC: f64 = 2.0 / 3.0;

/// Dealiasing fraction for cubic nonlinearities (1/2 rule).
pub const DEALIASING_CUBIC: f64 = 1.0 / 2.0;

/// Quadrature points on the contour around each `L·dt`.
pub const DEFAULT_NUM_CIRCLE_POINTS: usize = 16;

/// Radius of the quadrature contour in the complex plane.
pub const DEFAULT_CIRCLE_RADIUS: f64 = 1.0;

/// Default ETDRK order.
pub const DEFAULT_ORDER: usize = 2;

/// Highest supported ETDRK order.
pub const MAX_ORDER: usize = 4;

/// Highest supported spatial dimensionality.
pub const MAX_SPATIAL_DIMS: usize = 3;
