//! Matrices and homogeneous points.

use approx::{AbsDiffEq, RelativeEq};
use bytemuck::{Pod, Zeroable};
use nalgebra::Vector4;
use std::fmt;

/// A 4x4 matrix of `f64` elements.
///
/// Elements are addressed by row `i` and column `j`. Points are treated as row
/// vectors multiplied on the right by the matrix (`point * matrix`), so a
/// translation lives in row 3 and products compose left to right.
///
/// The storage is column-major, which is also the layout of shader constant
/// registers (see [`ColumnRegisters`](crate::register::ColumnRegisters)).
#[repr(transparent)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
#[derive(Clone, Copy, Debug, PartialEq, Zeroable, Pod)]
pub struct Matrix4 {
    inner: nalgebra::Matrix4<f64>,
}

/// A homogeneous coordinate `(x, y, z, w)`.
#[repr(transparent)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
#[derive(Clone, Copy, Debug, PartialEq, Zeroable, Pod)]
pub struct HomogeneousPoint {
    inner: Vector4<f64>,
}

impl Matrix4 {
    /// Creates a matrix with the given elements, listed row by row.
    #[inline]
    pub fn new(
        m00: f64,
        m01: f64,
        m02: f64,
        m03: f64,
        m10: f64,
        m11: f64,
        m12: f64,
        m13: f64,
        m20: f64,
        m21: f64,
        m22: f64,
        m23: f64,
        m30: f64,
        m31: f64,
        m32: f64,
        m33: f64,
    ) -> Self {
        Self::wrap(nalgebra::Matrix4::new(
            m00, m01, m02, m03, m10, m11, m12, m13, m20, m21, m22, m23, m30, m31, m32, m33,
        ))
    }

    /// Creates a matrix with the given rows.
    #[inline]
    pub fn from_rows(rows: [[f64; 4]; 4]) -> Self {
        let [r0, r1, r2, r3] = rows;
        Self::new(
            r0[0], r0[1], r0[2], r0[3], r1[0], r1[1], r1[2], r1[3], r2[0], r2[1], r2[2], r2[3],
            r3[0], r3[1], r3[2], r3[3],
        )
    }

    /// Creates the identity matrix.
    #[inline]
    pub fn identity() -> Self {
        Self::wrap(nalgebra::Matrix4::identity())
    }

    /// Creates a matrix with all zeros.
    #[inline]
    pub fn zeros() -> Self {
        Self::wrap(nalgebra::Matrix4::zeros())
    }

    /// Returns the element at row `i` and column `j`.
    ///
    /// # Panics
    /// If the indices are outside the matrix.
    #[inline]
    pub fn element(&self, i: usize, j: usize) -> f64 {
        self.inner[(i, j)]
    }

    /// Returns a mutable reference to the element at row `i` and column `j`.
    ///
    /// # Panics
    /// If the indices are outside the matrix.
    #[inline]
    pub fn element_mut(&mut self, i: usize, j: usize) -> &mut f64 {
        &mut self.inner[(i, j)]
    }

    /// Returns row `i` of the matrix.
    ///
    /// # Panics
    /// If the index is outside the matrix.
    #[inline]
    pub fn row(&self, i: usize) -> Vector4<f64> {
        self.inner.row(i).transpose()
    }

    /// Returns column `j` of the matrix.
    ///
    /// # Panics
    /// If the index is outside the matrix.
    #[inline]
    pub fn column(&self, j: usize) -> Vector4<f64> {
        self.inner.column(j).into_owned()
    }

    /// Returns the elements of the matrix, row by row.
    pub fn to_rows(&self) -> [[f64; 4]; 4] {
        [0, 1, 2, 3].map(|i| self.row(i).into())
    }

    /// Returns the last column as an array.
    #[inline]
    pub fn last_column(&self) -> [f64; 4] {
        self.column(3).into()
    }

    /// Whether the last column is exactly `[0, 0, 0, 1]`, meaning the matrix
    /// has no projective component.
    #[inline]
    pub fn is_euclidean(&self) -> bool {
        self.last_column() == [0.0, 0.0, 0.0, 1.0]
    }

    /// Returns the transpose of this matrix.
    #[inline]
    pub fn transposed(&self) -> Self {
        Self::wrap(self.inner.transpose())
    }

    /// Multiplies this matrix with the given matrix the way a shader does it
    /// with `dp4` instructions: the right operand is transposed, and each
    /// output element `(y, x)` is the dot product of row `y` of this matrix
    /// with row `x` of the transposed operand.
    ///
    /// The result is identical to `self * rhs`.
    pub fn mul_shader_style(&self, rhs: &Self) -> Self {
        let transposed = rhs.transposed();
        let mut product = Self::zeros();
        for y in 0..4 {
            let row = self.row(y);
            for x in 0..4 {
                *product.element_mut(y, x) = row.dot(&transposed.row(x));
            }
        }
        product
    }

    /// Returns the largest absolute value of any element.
    #[inline]
    pub fn max_abs_element(&self) -> f64 {
        self.inner.amax()
    }

    /// Returns the underlying [`nalgebra`] matrix.
    #[inline]
    pub fn as_nalgebra(&self) -> &nalgebra::Matrix4<f64> {
        &self.inner
    }

    #[inline]
    pub(crate) const fn wrap(inner: nalgebra::Matrix4<f64>) -> Self {
        Self { inner }
    }
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<nalgebra::Matrix4<f64>> for Matrix4 {
    fn from(matrix: nalgebra::Matrix4<f64>) -> Self {
        Self::wrap(matrix)
    }
}

/// Writes each row in fixed-point notation so that tiny values do not show up
/// in scientific notation.
impl fmt::Display for Matrix4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(6);
        for i in 0..4 {
            let row = self.row(i);
            writeln!(
                f,
                "[{:>w$.p$}, {:>w$.p$}, {:>w$.p$}, {:>w$.p$}]",
                row.x,
                row.y,
                row.z,
                row.w,
                w = precision + 7,
                p = precision,
            )?;
        }
        Ok(())
    }
}

impl_binop!(Mul, mul, Matrix4, Matrix4, Matrix4, |a, b| {
    Matrix4::wrap(a.inner * b.inner)
});

impl_binop!(Mul, mul, Matrix4, f64, Matrix4, |a, b| {
    Matrix4::wrap(a.inner * *b)
});

impl_binop!(Div, div, Matrix4, f64, Matrix4, |a, b| {
    Matrix4::wrap(a.inner / *b)
});

impl_binop!(Add, add, Matrix4, Matrix4, Matrix4, |a, b| {
    Matrix4::wrap(a.inner + b.inner)
});

impl_binop!(Sub, sub, Matrix4, Matrix4, Matrix4, |a, b| {
    Matrix4::wrap(a.inner - b.inner)
});

impl_unary_op!(Neg, neg, Matrix4, Matrix4, |val| {
    Matrix4::wrap(-val.inner)
});

impl_abs_diff_eq!(Matrix4, |a, b, epsilon| {
    a.inner.abs_diff_eq(&b.inner, epsilon)
});

impl_relative_eq!(Matrix4, |a, b, epsilon, max_relative| {
    a.inner.relative_eq(&b.inner, epsilon, max_relative)
});

impl HomogeneousPoint {
    /// Creates a new homogeneous point.
    #[inline]
    pub fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self::wrap(Vector4::new(x, y, z, w))
    }

    /// The origin of 3D space, `(0, 0, 0, 1)`.
    #[inline]
    pub fn origin() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.inner.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.inner.y
    }

    #[inline]
    pub fn z(&self) -> f64 {
        self.inner.z
    }

    #[inline]
    pub fn w(&self) -> f64 {
        self.inner.w
    }

    /// Returns a copy of this point with the x-component replaced.
    #[inline]
    pub fn with_x(&self, x: f64) -> Self {
        Self::new(x, self.y(), self.z(), self.w())
    }

    /// Returns the point scaled so that its w-component is one.
    ///
    /// The result is non-finite if w is zero.
    #[inline]
    pub fn normalized(&self) -> Self {
        Self::wrap(self.inner / self.inner.w)
    }

    /// Returns the components as a vector.
    #[inline]
    pub fn as_vector(&self) -> &Vector4<f64> {
        &self.inner
    }

    #[inline]
    pub(crate) const fn wrap(inner: Vector4<f64>) -> Self {
        Self { inner }
    }
}

impl From<[f64; 4]> for HomogeneousPoint {
    fn from([x, y, z, w]: [f64; 4]) -> Self {
        Self::new(x, y, z, w)
    }
}

impl From<HomogeneousPoint> for [f64; 4] {
    fn from(point: HomogeneousPoint) -> Self {
        point.inner.into()
    }
}

impl_binop!(Mul, mul, HomogeneousPoint, Matrix4, HomogeneousPoint, |p, m| {
    HomogeneousPoint::wrap(m.inner.tr_mul(&p.inner))
});

impl_abs_diff_eq!(HomogeneousPoint, |a, b, epsilon| {
    a.inner.abs_diff_eq(&b.inner, epsilon)
});

impl_relative_eq!(HomogeneousPoint, |a, b, epsilon, max_relative| {
    a.inner.relative_eq(&b.inner, epsilon, max_relative)
});
