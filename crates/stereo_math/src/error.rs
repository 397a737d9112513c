//! Errors reported by the matrix builders and the inversion engine.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MatrixError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatrixError {
    #[error(
        "Invalid near and far distances ({near}, {far}): both must be positive and finite, with far exceeding near"
    )]
    InvalidDistance { near: f64, far: f64 },

    #[error("Field of view of {degrees} degrees is outside the open range (0, 180)")]
    FieldOfViewOutOfRange { degrees: f64 },

    #[error("Stereo separation ({separation}) and convergence ({convergence}) must be finite")]
    InvalidStereoParameter { separation: f64, convergence: f64 },

    #[error("Matrix is not invertible (determinant {determinant})")]
    NotInvertible { determinant: f64 },

    #[error("Matrix is not Euclidean (last column {last_column:?} instead of [0, 0, 0, 1])")]
    NotEuclidean { last_column: [f64; 4] },
}
