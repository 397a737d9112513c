//! Closed-form 4x4 homogeneous matrix algebra for stereoscopic 3D rendering.
//!
//! Points are row vectors multiplied from the left (`point * matrix`).

#[macro_use]
mod macros;

pub mod angle;
pub mod error;
pub mod inverse;
pub mod matrix;
pub mod projection;
pub mod register;
pub mod stereo;
pub mod transform;

#[cfg(test)]
mod strategies;

pub use angle::{Angle, Degrees, Radians};
pub use error::{MatrixError, Result};
pub use inverse::{EuclideanKernel, ScalarKernel};
pub use matrix::{HomogeneousPoint, Matrix4};
pub use register::RegisterKernel;
