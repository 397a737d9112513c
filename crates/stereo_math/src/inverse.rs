//! Closed-form determinants and inverses of 4x4 matrices.
//!
//! Two families of formulas are provided. The general ones work for any
//! matrix. The Euclidean ones assume that the last column is exactly
//! `[0, 0, 0, 1]`, as for a model-view matrix, and only need the cofactors of
//! the upper-left 3x3 block. They are never selected automatically: callers
//! opt in through the `*_euclidean*` methods, which reject matrices that do
//! not satisfy the assumption.

use crate::{
    error::{MatrixError, Result},
    matrix::Matrix4,
};
use nalgebra::Vector4;
use std::fmt::Debug;

/// Relative threshold below which a determinant is treated as zero. The
/// determinant is compared against this value times the product of the row
/// norms, which bounds its magnitude (Hadamard's inequality) and scales with
/// each row independently.
pub const SINGULARITY_TOLERANCE: f64 = 1e-12;

/// Strategy for evaluating the Euclidean determinant and inverse formulas.
///
/// Implementations may assume that the matrix is Euclidean and that the
/// determinant they are given is non-zero; the checked entry points on
/// [`Matrix4`] ensure both before calling into the kernel.
pub trait EuclideanKernel: Debug {
    /// Computes the determinant of the upper-left 3x3 block.
    fn determinant(&self, matrix: &Matrix4) -> f64;

    /// Computes the inverse using the given determinant.
    fn inverse(&self, matrix: &Matrix4, determinant: f64) -> Matrix4;

    /// Computes only the first row of the inverse using the given
    /// determinant. The last component is always zero.
    fn inverse_row_0(&self, matrix: &Matrix4, determinant: f64) -> Vector4<f64>;
}

/// Evaluates the Euclidean formulas one scalar at a time. This is the
/// reference implementation.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScalarKernel;

impl Matrix4 {
    /// Computes the determinant as the full 24-term signed sum of products.
    pub fn determinant(&self) -> f64 {
        let m = self.to_rows();
        m[0][3] * m[1][2] * m[2][1] * m[3][0]
            - m[0][2] * m[1][3] * m[2][1] * m[3][0]
            - m[0][3] * m[1][1] * m[2][2] * m[3][0]
            + m[0][1] * m[1][3] * m[2][2] * m[3][0]
            + m[0][2] * m[1][1] * m[2][3] * m[3][0]
            - m[0][1] * m[1][2] * m[2][3] * m[3][0]
            - m[0][3] * m[1][2] * m[2][0] * m[3][1]
            + m[0][2] * m[1][3] * m[2][0] * m[3][1]
            + m[0][3] * m[1][0] * m[2][2] * m[3][1]
            - m[0][0] * m[1][3] * m[2][2] * m[3][1]
            - m[0][2] * m[1][0] * m[2][3] * m[3][1]
            + m[0][0] * m[1][2] * m[2][3] * m[3][1]
            + m[0][3] * m[1][1] * m[2][0] * m[3][2]
            - m[0][1] * m[1][3] * m[2][0] * m[3][2]
            - m[0][3] * m[1][0] * m[2][1] * m[3][2]
            + m[0][0] * m[1][3] * m[2][1] * m[3][2]
            + m[0][1] * m[1][0] * m[2][3] * m[3][2]
            - m[0][0] * m[1][1] * m[2][3] * m[3][2]
            - m[0][2] * m[1][1] * m[2][0] * m[3][3]
            + m[0][1] * m[1][2] * m[2][0] * m[3][3]
            + m[0][2] * m[1][0] * m[2][1] * m[3][3]
            - m[0][0] * m[1][2] * m[2][1] * m[3][3]
            - m[0][1] * m[1][0] * m[2][2] * m[3][3]
            + m[0][0] * m[1][1] * m[2][2] * m[3][3]
    }

    /// Computes the adjugate (the transposed cofactor matrix), using one
    /// six-term cofactor formula per element.
    pub fn adjugate(&self) -> Self {
        let m = self.to_rows();
        let a00 = m[1][2] * m[2][3] * m[3][1]
            - m[1][3] * m[2][2] * m[3][1]
            + m[1][3] * m[2][1] * m[3][2]
            - m[1][1] * m[2][3] * m[3][2]
            - m[1][2] * m[2][1] * m[3][3]
            + m[1][1] * m[2][2] * m[3][3];
        let a01 = m[0][3] * m[2][2] * m[3][1]
            - m[0][2] * m[2][3] * m[3][1]
            - m[0][3] * m[2][1] * m[3][2]
            + m[0][1] * m[2][3] * m[3][2]
            + m[0][2] * m[2][1] * m[3][3]
            - m[0][1] * m[2][2] * m[3][3];
        let a02 = m[0][2] * m[1][3] * m[3][1]
            - m[0][3] * m[1][2] * m[3][1]
            + m[0][3] * m[1][1] * m[3][2]
            - m[0][1] * m[1][3] * m[3][2]
            - m[0][2] * m[1][1] * m[3][3]
            + m[0][1] * m[1][2] * m[3][3];
        let a03 = m[0][3] * m[1][2] * m[2][1]
            - m[0][2] * m[1][3] * m[2][1]
            - m[0][3] * m[1][1] * m[2][2]
            + m[0][1] * m[1][3] * m[2][2]
            + m[0][2] * m[1][1] * m[2][3]
            - m[0][1] * m[1][2] * m[2][3];
        let a10 = m[1][3] * m[2][2] * m[3][0]
            - m[1][2] * m[2][3] * m[3][0]
            - m[1][3] * m[2][0] * m[3][2]
            + m[1][0] * m[2][3] * m[3][2]
            + m[1][2] * m[2][0] * m[3][3]
            - m[1][0] * m[2][2] * m[3][3];
        let a11 = m[0][2] * m[2][3] * m[3][0]
            - m[0][3] * m[2][2] * m[3][0]
            + m[0][3] * m[2][0] * m[3][2]
            - m[0][0] * m[2][3] * m[3][2]
            - m[0][2] * m[2][0] * m[3][3]
            + m[0][0] * m[2][2] * m[3][3];
        let a12 = m[0][3] * m[1][2] * m[3][0]
            - m[0][2] * m[1][3] * m[3][0]
            - m[0][3] * m[1][0] * m[3][2]
            + m[0][0] * m[1][3] * m[3][2]
            + m[0][2] * m[1][0] * m[3][3]
            - m[0][0] * m[1][2] * m[3][3];
        let a13 = m[0][2] * m[1][3] * m[2][0]
            - m[0][3] * m[1][2] * m[2][0]
            + m[0][3] * m[1][0] * m[2][2]
            - m[0][0] * m[1][3] * m[2][2]
            - m[0][2] * m[1][0] * m[2][3]
            + m[0][0] * m[1][2] * m[2][3];
        let a20 = m[1][1] * m[2][3] * m[3][0]
            - m[1][3] * m[2][1] * m[3][0]
            + m[1][3] * m[2][0] * m[3][1]
            - m[1][0] * m[2][3] * m[3][1]
            - m[1][1] * m[2][0] * m[3][3]
            + m[1][0] * m[2][1] * m[3][3];
        let a21 = m[0][3] * m[2][1] * m[3][0]
            - m[0][1] * m[2][3] * m[3][0]
            - m[0][3] * m[2][0] * m[3][1]
            + m[0][0] * m[2][3] * m[3][1]
            + m[0][1] * m[2][0] * m[3][3]
            - m[0][0] * m[2][1] * m[3][3];
        let a22 = m[0][1] * m[1][3] * m[3][0]
            - m[0][3] * m[1][1] * m[3][0]
            + m[0][3] * m[1][0] * m[3][1]
            - m[0][0] * m[1][3] * m[3][1]
            - m[0][1] * m[1][0] * m[3][3]
            + m[0][0] * m[1][1] * m[3][3];
        let a23 = m[0][3] * m[1][1] * m[2][0]
            - m[0][1] * m[1][3] * m[2][0]
            - m[0][3] * m[1][0] * m[2][1]
            + m[0][0] * m[1][3] * m[2][1]
            + m[0][1] * m[1][0] * m[2][3]
            - m[0][0] * m[1][1] * m[2][3];
        let a30 = m[1][2] * m[2][1] * m[3][0]
            - m[1][1] * m[2][2] * m[3][0]
            - m[1][2] * m[2][0] * m[3][1]
            + m[1][0] * m[2][2] * m[3][1]
            + m[1][1] * m[2][0] * m[3][2]
            - m[1][0] * m[2][1] * m[3][2];
        let a31 = m[0][1] * m[2][2] * m[3][0]
            - m[0][2] * m[2][1] * m[3][0]
            + m[0][2] * m[2][0] * m[3][1]
            - m[0][0] * m[2][2] * m[3][1]
            - m[0][1] * m[2][0] * m[3][2]
            + m[0][0] * m[2][1] * m[3][2];
        let a32 = m[0][2] * m[1][1] * m[3][0]
            - m[0][1] * m[1][2] * m[3][0]
            - m[0][2] * m[1][0] * m[3][1]
            + m[0][0] * m[1][2] * m[3][1]
            + m[0][1] * m[1][0] * m[3][2]
            - m[0][0] * m[1][1] * m[3][2];
        let a33 = m[0][1] * m[1][2] * m[2][0]
            - m[0][2] * m[1][1] * m[2][0]
            + m[0][2] * m[1][0] * m[2][1]
            - m[0][0] * m[1][2] * m[2][1]
            - m[0][1] * m[1][0] * m[2][2]
            + m[0][0] * m[1][1] * m[2][2];
        Self::new(
            a00, a01, a02, a03, a10, a11, a12, a13, a20, a21, a22, a23, a30, a31, a32, a33,
        )
    }

    /// Computes the inverse as the adjugate divided by the determinant.
    ///
    /// # Errors
    /// Returns [`MatrixError::NotInvertible`] if the determinant is zero or
    /// vanishingly small compared to the product of the row norms.
    pub fn inverted(&self) -> Result<Self> {
        let determinant = self.determinant();
        let rows = self.to_rows();
        ensure_invertible(determinant, row_norm_product(rows.iter().map(|row| &row[..])))?;
        Ok(self.adjugate() / determinant)
    }

    /// Computes the determinant assuming the last column is `[0, 0, 0, 1]`,
    /// which reduces it to the determinant of the upper-left 3x3 block.
    ///
    /// # Errors
    /// Returns [`MatrixError::NotEuclidean`] if the last column is not
    /// exactly `[0, 0, 0, 1]`.
    pub fn euclidean_determinant(&self) -> Result<f64> {
        self.euclidean_determinant_with(&ScalarKernel)
    }

    /// Like [`Self::euclidean_determinant`], but evaluated with the given
    /// kernel.
    pub fn euclidean_determinant_with(&self, kernel: &impl EuclideanKernel) -> Result<f64> {
        self.ensure_euclidean()?;
        Ok(kernel.determinant(self))
    }

    /// Computes the inverse assuming the last column is `[0, 0, 0, 1]`.
    ///
    /// Only the 3x3 cofactors of the upper-left block are needed; the
    /// translation row of the inverse follows from them. The last column of
    /// the result is exactly `[0, 0, 0, 1]`.
    ///
    /// # Errors
    /// Returns [`MatrixError::NotEuclidean`] if the last column is not
    /// exactly `[0, 0, 0, 1]`, or [`MatrixError::NotInvertible`] if the
    /// upper-left block is singular.
    pub fn inverted_euclidean(&self) -> Result<Self> {
        self.inverted_euclidean_with(&ScalarKernel)
    }

    /// Like [`Self::inverted_euclidean`], but evaluated with the given kernel.
    pub fn inverted_euclidean_with(&self, kernel: &impl EuclideanKernel) -> Result<Self> {
        let determinant = self.invertible_euclidean_determinant(kernel)?;
        Ok(kernel.inverse(self, determinant))
    }

    /// Computes only the first row of the Euclidean inverse. The last
    /// component is always zero.
    ///
    /// # Errors
    /// As for [`Self::inverted_euclidean`].
    pub fn euclidean_inverse_row_0(&self) -> Result<Vector4<f64>> {
        self.euclidean_inverse_row_0_with(&ScalarKernel)
    }

    /// Like [`Self::euclidean_inverse_row_0`], but evaluated with the given
    /// kernel.
    pub fn euclidean_inverse_row_0_with(
        &self,
        kernel: &impl EuclideanKernel,
    ) -> Result<Vector4<f64>> {
        let determinant = self.invertible_euclidean_determinant(kernel)?;
        Ok(kernel.inverse_row_0(self, determinant))
    }

    fn invertible_euclidean_determinant(&self, kernel: &impl EuclideanKernel) -> Result<f64> {
        let determinant = self.euclidean_determinant_with(kernel)?;
        ensure_invertible(determinant, self.block_row_norm_product())?;
        Ok(determinant)
    }

    fn ensure_euclidean(&self) -> Result<()> {
        if self.is_euclidean() {
            Ok(())
        } else {
            Err(MatrixError::NotEuclidean {
                last_column: self.last_column(),
            })
        }
    }

    fn block_row_norm_product(&self) -> f64 {
        let rows = self.to_rows();
        row_norm_product(rows[..3].iter().map(|row| &row[..3]))
    }
}

impl EuclideanKernel for ScalarKernel {
    fn determinant(&self, matrix: &Matrix4) -> f64 {
        let m = matrix.to_rows();
        m[0][0] * m[1][1] * m[2][2]
            - m[0][0] * m[1][2] * m[2][1]
            + m[0][1] * m[1][2] * m[2][0]
            - m[0][1] * m[1][0] * m[2][2]
            + m[0][2] * m[1][0] * m[2][1]
            - m[0][2] * m[1][1] * m[2][0]
    }

    fn inverse(&self, matrix: &Matrix4, determinant: f64) -> Matrix4 {
        let m = matrix.to_rows();

        // Adjugate of the upper-left block
        let b00 = m[1][1] * m[2][2] - m[1][2] * m[2][1];
        let b01 = m[0][2] * m[2][1] - m[0][1] * m[2][2];
        let b02 = m[0][1] * m[1][2] - m[0][2] * m[1][1];
        let b10 = m[1][2] * m[2][0] - m[1][0] * m[2][2];
        let b11 = m[0][0] * m[2][2] - m[0][2] * m[2][0];
        let b12 = m[0][2] * m[1][0] - m[0][0] * m[1][2];
        let b20 = m[1][0] * m[2][1] - m[1][1] * m[2][0];
        let b21 = m[0][1] * m[2][0] - m[0][0] * m[2][1];
        let b22 = m[0][0] * m[1][1] - m[0][1] * m[1][0];

        // The translation row maps back through the inverted block
        let [t0, t1, t2, _] = m[3];
        let b30 = -(t0 * b00 + t1 * b10 + t2 * b20);
        let b31 = -(t0 * b01 + t1 * b11 + t2 * b21);
        let b32 = -(t0 * b02 + t1 * b12 + t2 * b22);

        // The row expansion of the block is the determinant itself, so
        // element (3, 3) of the inverse is exactly one
        let expansion = m[0][0] * b00 + m[0][1] * b10 + m[0][2] * b20;
        debug_assert!(
            expansion_matches_determinant(matrix, expansion, determinant),
            "Block expansion {expansion} does not match determinant {determinant}"
        );

        let inv_det = determinant.recip();
        Matrix4::new(
            b00 * inv_det,
            b01 * inv_det,
            b02 * inv_det,
            0.0,
            b10 * inv_det,
            b11 * inv_det,
            b12 * inv_det,
            0.0,
            b20 * inv_det,
            b21 * inv_det,
            b22 * inv_det,
            0.0,
            b30 * inv_det,
            b31 * inv_det,
            b32 * inv_det,
            1.0,
        )
    }

    fn inverse_row_0(&self, matrix: &Matrix4, determinant: f64) -> Vector4<f64> {
        let m = matrix.to_rows();
        Vector4::new(
            (m[1][1] * m[2][2] - m[1][2] * m[2][1]) / determinant,
            (m[0][2] * m[2][1] - m[0][1] * m[2][2]) / determinant,
            (m[0][1] * m[1][2] - m[0][2] * m[1][1]) / determinant,
            0.0,
        )
    }
}

/// Whether a cofactor expansion of the upper-left block agrees with the
/// determinant up to rounding.
pub(crate) fn expansion_matches_determinant(
    matrix: &Matrix4,
    expansion: f64,
    determinant: f64,
) -> bool {
    (expansion - determinant).abs() <= 1e-9 * matrix.block_row_norm_product()
}

fn row_norm_product<'a>(rows: impl IntoIterator<Item = &'a [f64]>) -> f64 {
    rows.into_iter()
        .map(|row| row.iter().map(|element| element * element).sum::<f64>().sqrt())
        .product()
}

fn ensure_invertible(determinant: f64, scale: f64) -> Result<()> {
    if determinant.is_finite() && determinant.abs() > SINGULARITY_TOLERANCE * scale {
        Ok(())
    } else {
        log::debug!("Rejecting inversion of singular matrix (determinant {determinant})");
        Err(MatrixError::NotInvertible { determinant })
    }
}
