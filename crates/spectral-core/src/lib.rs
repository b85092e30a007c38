//! Nonlinear term evaluation and ETDRK time stepping.
//!
//! Stage 2: pseudo-spectral nonlinear terms
//! Stage 3: contour-quadrature ETDRK stepper (orders 0..=4)

pub mod nonlinear;
pub mod stepper;
