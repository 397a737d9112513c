//! Stereoscopic corrections of projection matrices and clip-space points.
//!
//! The stereo model shifts the clip-space x-coordinate of each eye by
//! `separation * (w - convergence)`, where w is the view depth. Points at the
//! convergence depth coincide in both eyes. The left eye is shifted by the
//! negated amount of the right eye.
//!
//! The correction can be baked into the projection matrix directly
//! ([`projection_stereo_pair`]), appended to an existing projection or
//! composite matrix ([`stereo_multiplier`]), removed again
//! ([`stereo_multiplier_inverse`]), or applied per point
//! ([`point_correction`]).

use crate::{
    angle::Angle,
    error::{MatrixError, Result},
    inverse::{EuclideanKernel, SINGULARITY_TOLERANCE, ScalarKernel},
    matrix::{HomogeneousPoint, Matrix4},
    projection::{self, PerspectiveParameters},
};

/// Separation and convergence of a stereo view.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StereoParameters {
    separation: f64,
    convergence: f64,
}

/// A pair of matrices, one for each eye.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StereoPair {
    pub left: Matrix4,
    pub right: Matrix4,
}

/// A pair of points, one for each eye.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StereoPoints {
    pub left: HomogeneousPoint,
    pub right: HomogeneousPoint,
}

impl StereoParameters {
    /// Creates a new set of stereo parameters.
    ///
    /// # Errors
    /// Returns [`MatrixError::InvalidStereoParameter`] if either value is not
    /// finite.
    pub fn new(separation: f64, convergence: f64) -> Result<Self> {
        if separation.is_finite() && convergence.is_finite() {
            Ok(Self {
                separation,
                convergence,
            })
        } else {
            Err(MatrixError::InvalidStereoParameter {
                separation,
                convergence,
            })
        }
    }

    pub fn separation(&self) -> f64 {
        self.separation
    }

    pub fn convergence(&self) -> f64 {
        self.convergence
    }

    /// Returns the parameters for the opposite eye.
    pub fn mirrored(&self) -> Self {
        Self {
            separation: -self.separation,
            convergence: self.convergence,
        }
    }

    /// Computes the clip-space x-shift of the right eye for the given view
    /// depth.
    pub fn adjustment(&self, w: f64) -> f64 {
        self.separation * (w - self.convergence)
    }
}

impl PerspectiveParameters {
    /// Builds the projection matrices for the left and right eye.
    pub fn stereo_pair(&self, stereo: &StereoParameters) -> StereoPair {
        let mono = self.coefficients().matrix();
        let eye = |separation: f64| {
            let mut m = mono;
            *m.element_mut(2, 0) = separation;
            *m.element_mut(3, 0) = -separation * stereo.convergence;
            m
        };
        StereoPair {
            left: eye(-stereo.separation),
            right: eye(stereo.separation),
        }
    }
}

/// Builds perspective projection matrices for the left and right eye. Each is
/// the mono projection with a horizontal shear in elements `(2, 0)` and
/// `(3, 0)`: `-separation` and `separation * convergence` for the left eye,
/// and the negations for the right eye.
///
/// # Errors
/// See [`PerspectiveParameters::new`] and [`StereoParameters::new`].
pub fn projection_stereo_pair<A: Angle>(
    near_distance: f64,
    far_distance: f64,
    horizontal_field_of_view: A,
    vertical_field_of_view: A,
    separation: f64,
    convergence: f64,
) -> Result<StereoPair> {
    let parameters = PerspectiveParameters::new(
        near_distance,
        far_distance,
        horizontal_field_of_view,
        vertical_field_of_view,
    )?;
    let stereo = StereoParameters::new(separation, convergence)?;
    log::trace!("Stereo pair: separation: {separation} convergence: {convergence}");
    Ok(parameters.stereo_pair(&stereo))
}

/// Builds a matrix that adds the stereo correction of the right eye to a
/// projection matrix, or to any composite matrix ending with one, when
/// multiplied onto it from the right. Pass a negated separation for the left
/// eye.
///
/// # Errors
/// Returns [`MatrixError::InvalidDistance`] or
/// [`MatrixError::InvalidStereoParameter`] for invalid input.
pub fn stereo_multiplier(
    near_distance: f64,
    far_distance: f64,
    separation: f64,
    convergence: f64,
) -> Result<Matrix4> {
    let (shear_z, shear_w) =
        multiplier_shear(near_distance, far_distance, separation, convergence)?;
    Ok(multiplier_with_shear(shear_z, shear_w))
}

/// Builds the inverse of [`stereo_multiplier`], which removes the stereo
/// correction again. It only differs by the sign of the shear.
///
/// # Errors
/// As for [`stereo_multiplier`].
pub fn stereo_multiplier_inverse(
    near_distance: f64,
    far_distance: f64,
    separation: f64,
    convergence: f64,
) -> Result<Matrix4> {
    let (shear_z, shear_w) =
        multiplier_shear(near_distance, far_distance, separation, convergence)?;
    Ok(multiplier_with_shear(-shear_z, -shear_w))
}

/// Shifts the x-coordinate of a clip-space point for each eye, by
/// `separation * (w - convergence)` for the right eye and the negation for
/// the left eye.
pub fn point_correction(
    point: &HomogeneousPoint,
    separation: f64,
    convergence: f64,
) -> StereoPoints {
    let adjustment = separation * (point.w() - convergence);
    StereoPoints {
        left: point.with_x(point.x() - adjustment),
        right: point.with_x(point.x() + adjustment),
    }
}

/// Computes element `(0, 0)` of the inverse projection matrix from a
/// model-view matrix and the model-view-projection matrix built from it,
/// without inverting either matrix in full.
///
/// Only the first row of the inverse model-view matrix is needed. Its product
/// with the first column of the model-view-projection matrix is element
/// `(0, 0)` of the projection matrix, whose reciprocal is element `(0, 0)` of
/// the inverse projection for any projection of the canonical structure, also
/// off-center ones.
///
/// # Errors
/// Returns [`MatrixError::NotEuclidean`] if the model-view matrix has a
/// projective component, and [`MatrixError::NotInvertible`] if it is singular
/// or the recovered projection element vanishes.
pub fn mv_mvp_inverse_projection_00(
    model_view: &Matrix4,
    model_view_projection: &Matrix4,
) -> Result<f64> {
    mv_mvp_inverse_projection_00_with(&ScalarKernel, model_view, model_view_projection)
}

/// Like [`mv_mvp_inverse_projection_00`], but evaluated with the given
/// kernel.
pub fn mv_mvp_inverse_projection_00_with(
    kernel: &impl EuclideanKernel,
    model_view: &Matrix4,
    model_view_projection: &Matrix4,
) -> Result<f64> {
    let inverse_row_0 = model_view.euclidean_inverse_row_0_with(kernel)?.xyz();
    let projected_column_0 = model_view_projection.column(0).xyz();
    let projection_00 = inverse_row_0.dot(&projected_column_0);

    // Relative to the largest value the dot product could take
    let bound = inverse_row_0.norm() * projected_column_0.norm();
    if projection_00.is_finite() && projection_00.abs() > SINGULARITY_TOLERANCE * bound {
        Ok(projection_00.recip())
    } else {
        Err(MatrixError::NotInvertible {
            determinant: projection_00,
        })
    }
}

fn multiplier_shear(
    near_distance: f64,
    far_distance: f64,
    separation: f64,
    convergence: f64,
) -> Result<(f64, f64)> {
    projection::validate_near_and_far_distance(near_distance, far_distance)?;
    let stereo = StereoParameters::new(separation, convergence)?;
    let q = projection::depth_scale(near_distance, far_distance);
    let shift = stereo.separation * stereo.convergence;
    Ok((
        shift / (q * near_distance),
        stereo.separation - shift / near_distance,
    ))
}

fn multiplier_with_shear(shear_z: f64, shear_w: f64) -> Matrix4 {
    let mut m = Matrix4::identity();
    *m.element_mut(2, 0) = shear_z;
    *m.element_mut(3, 0) = shear_w;
    m
}
