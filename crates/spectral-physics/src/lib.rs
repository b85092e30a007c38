//! Equation presets for SCPN Spectral Core.
//!
//! reaction: Allen-Cahn, Fisher-KPP, Belousov-Zhabotinsky
//! transport: diffusion, Burgers, Kuramoto-Sivashinsky, Kolmogorov flow

pub mod reaction;
pub mod transport;
