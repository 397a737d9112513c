//! Builders for affine transformation matrices.
//!
//! All matrices act on row vectors multiplied from the left, so a composite
//! `a * b` applies `a` first and `b` second.

use crate::{angle::Angle, matrix::Matrix4};

/// Creates a matrix translating points by `(x, y, z)`. The offset occupies
/// the first three columns of row 3.
pub fn translate(x: f64, y: f64, z: f64) -> Matrix4 {
    log::trace!("Translate: {x:<8} {y:<8} {z:<8}");
    Matrix4::new(
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        x, y, z, 1.0,
    )
}

/// Creates a matrix scaling points by the given factor along each axis.
pub fn scale(x: f64, y: f64, z: f64) -> Matrix4 {
    log::trace!("Scale: {x:<8} {y:<8} {z:<8}");
    Matrix4::new(
        x, 0.0, 0.0, 0.0, //
        0.0, y, 0.0, 0.0, //
        0.0, 0.0, z, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Creates a matrix rotating points about the x-axis.
pub fn rotate_x<A: Angle>(angle: A) -> Matrix4 {
    log::trace!("Rotate x: {}", angle.as_degrees());
    let (sin, cos) = angle.radians().sin_cos();
    Matrix4::new(
        1.0, 0.0, 0.0, 0.0, //
        0.0, cos, sin, 0.0, //
        0.0, -sin, cos, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Creates a matrix rotating points about the y-axis.
pub fn rotate_y<A: Angle>(angle: A) -> Matrix4 {
    log::trace!("Rotate y: {}", angle.as_degrees());
    let (sin, cos) = angle.radians().sin_cos();
    Matrix4::new(
        cos, 0.0, -sin, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        sin, 0.0, cos, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Creates a matrix rotating points about the z-axis.
pub fn rotate_z<A: Angle>(angle: A) -> Matrix4 {
    log::trace!("Rotate z: {}", angle.as_degrees());
    let (sin, cos) = angle.radians().sin_cos();
    Matrix4::new(
        cos, sin, 0.0, 0.0, //
        -sin, cos, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    )
}
