//! Four-lane register emulation of the Euclidean formulas.
//!
//! Vertex shaders evaluate matrix algebra on four-component constant
//! registers using swizzled multiply-adds. [`RegisterKernel`] evaluates the
//! Euclidean determinant and inverse exactly that way, so that a shader
//! implementation can be checked against [`ScalarKernel`](crate::inverse::ScalarKernel).

use crate::{
    inverse::{EuclideanKernel, expansion_matches_determinant},
    matrix::Matrix4,
};
use bytemuck::{Pod, Zeroable};
use nalgebra::Vector4;
use std::ops::Neg;

/// A four-lane register with components `x, y, z, w`.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Zeroable, Pod)]
pub struct Register([f64; 4]);

/// The four columns of a matrix, each held in one register.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnRegisters {
    pub columns: [Register; 4],
}

/// Evaluates the Euclidean formulas with swizzled register operations.
#[derive(Clone, Copy, Debug, Default)]
pub struct RegisterKernel;

impl Register {
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self([x, y, z, w])
    }

    /// Creates a register with the value in every lane.
    #[inline]
    pub const fn broadcast(value: f64) -> Self {
        Self([value; 4])
    }

    #[inline]
    pub const fn x(&self) -> f64 {
        self.0[0]
    }

    #[inline]
    pub const fn y(&self) -> f64 {
        self.0[1]
    }

    #[inline]
    pub const fn z(&self) -> f64 {
        self.0[2]
    }

    #[inline]
    pub const fn w(&self) -> f64 {
        self.0[3]
    }

    #[inline]
    pub const fn lanes(&self) -> [f64; 4] {
        self.0
    }

    /// The `.yzx` swizzle. The w-lane is passed through.
    #[inline]
    pub const fn yzx(&self) -> Self {
        Self([self.0[1], self.0[2], self.0[0], self.0[3]])
    }

    /// The `.zxy` swizzle. The w-lane is passed through.
    #[inline]
    pub const fn zxy(&self) -> Self {
        Self([self.0[2], self.0[0], self.0[1], self.0[3]])
    }

    /// Returns a copy with the w-lane replaced.
    #[inline]
    pub const fn with_w(&self, w: f64) -> Self {
        Self([self.0[0], self.0[1], self.0[2], w])
    }

    /// Lane-wise product.
    #[inline]
    pub fn mul(&self, other: &Self) -> Self {
        self.zip(other, |a, b| a * b)
    }

    /// Lane-wise `self * factor + addend`.
    #[inline]
    pub fn mad(&self, factor: &Self, addend: &Self) -> Self {
        Self([0, 1, 2, 3].map(|lane| self.0[lane] * factor.0[lane] + addend.0[lane]))
    }

    /// Lane-wise reciprocal.
    #[inline]
    pub fn rcp(&self) -> Self {
        Self(self.0.map(f64::recip))
    }

    /// Dot product of the x, y and z lanes.
    #[inline]
    pub fn dp3(&self, other: &Self) -> f64 {
        let product = self.mul(other);
        product.x() + product.y() + product.z()
    }

    fn zip(&self, other: &Self, f: impl Fn(f64, f64) -> f64) -> Self {
        Self([0, 1, 2, 3].map(|lane| f(self.0[lane], other.0[lane])))
    }
}

impl Neg for Register {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self(self.0.map(f64::neg))
    }
}

impl From<[f64; 4]> for Register {
    fn from(lanes: [f64; 4]) -> Self {
        Self(lanes)
    }
}

impl ColumnRegisters {
    /// Loads the columns of the matrix into registers. The storage of
    /// [`Matrix4`] is column-major, so this is a plain reinterpretation.
    pub fn from_matrix(matrix: &Matrix4) -> Self {
        Self {
            columns: bytemuck::cast(*matrix),
        }
    }

    /// Assembles a matrix from rows held in registers.
    pub fn matrix_from_rows(rows: [Register; 4]) -> Matrix4 {
        Matrix4::from_rows(rows.map(|row| row.lanes()))
    }
}

impl EuclideanKernel for RegisterKernel {
    fn determinant(&self, matrix: &Matrix4) -> f64 {
        let [col0, col1, col2, _] = ColumnRegisters::from_matrix(matrix).columns;
        let tmp = col0.zxy().mul(&col1.yzx());
        let tmp = col0.yzx().mad(&col1.zxy(), &-tmp);
        tmp.dp3(&col2)
    }

    fn inverse(&self, matrix: &Matrix4, determinant: f64) -> Matrix4 {
        let [col0, col1, col2, _] = ColumnRegisters::from_matrix(matrix).columns;

        // Rows of the inverted block are cross products of the block columns
        let dst0 = col1.yzx().mad(&col2.zxy(), &-col1.zxy().mul(&col2.yzx()));
        let dst1 = col0.zxy().mad(&col2.yzx(), &-col0.yzx().mul(&col2.zxy()));
        let dst2 = col0.yzx().mad(&col1.zxy(), &-col0.zxy().mul(&col1.yzx()));

        // The translations sit in the w-lanes of the columns
        let dst3 = Register::broadcast(col0.w()).mul(&dst0);
        let dst3 = Register::broadcast(col1.w()).mad(&dst1, &dst3);
        let dst3 = -Register::broadcast(col2.w()).mad(&dst2, &dst3);

        // Expanding along the first column gives the determinant back, which
        // is what makes element (3, 3) of the inverse exactly one
        let expansion = dst0.dp3(&col0);
        debug_assert!(
            expansion_matches_determinant(matrix, expansion, determinant),
            "Block expansion {expansion} does not match determinant {determinant}"
        );

        let inv_det = Register::broadcast(determinant).rcp();
        ColumnRegisters::matrix_from_rows([
            dst0.mul(&inv_det).with_w(0.0),
            dst1.mul(&inv_det).with_w(0.0),
            dst2.mul(&inv_det).with_w(0.0),
            dst3.mul(&inv_det).with_w(1.0),
        ])
    }

    fn inverse_row_0(&self, matrix: &Matrix4, determinant: f64) -> Vector4<f64> {
        let [_, col1, col2, _] = ColumnRegisters::from_matrix(matrix).columns;
        let dst0 = col1.yzx().mad(&col2.zxy(), &-col1.zxy().mul(&col2.yzx()));
        let [x, y, z, _] = dst0.mul(&Register::broadcast(determinant).rcp()).lanes();
        Vector4::new(x, y, z, 0.0)
    }
}

/// Formats the rows of the matrix as shader constant definitions, one
/// `def c<N>, m0, m1, m2, m3` line per row, numbered from `first_register`.
pub fn shader_constant_definitions(matrix: &Matrix4, first_register: usize) -> Vec<String> {
    matrix
        .to_rows()
        .iter()
        .enumerate()
        .map(|(i, [m0, m1, m2, m3])| {
            format!("def c{}, {m0}, {m1}, {m2}, {m3}", first_register + i)
        })
        .collect()
}
