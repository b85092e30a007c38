// ─────────────────────────────────────────────────────────────────────
// SCPN Spectral Core — Errors
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpectralError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("Array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SpectralError {
    /// Shape-contract check used at every public array boundary.
    pub fn check_shape(expected: &[usize], actual: &[usize]) -> SpectralResult<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(SpectralError::ShapeMismatch {
                expected: expected.to_vec(),
                actual: actual.to_vec(),
            })
        }
    }
}

pub type SpectralResult<T> = Result<T, SpectralError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_shape_accepts_equal() {
        assert!(SpectralError::check_shape(&[1, 8, 5], &[1, 8, 5]).is_ok());
    }

    #[test]
    fn test_check_shape_reports_both_shapes() {
        let err = SpectralError::check_shape(&[3, 33], &[1, 33]).unwrap_err();
        match err {
            SpectralError::ShapeMismatch { expected, actual } => {
                assert_eq!(expected, vec![3, 33]);
                assert_eq!(actual, vec![1, 33]);
            }
            other => panic!("Expected ShapeMismatch, got {other:?}"),
        }
    }
}
