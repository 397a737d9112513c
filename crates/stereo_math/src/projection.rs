//! Perspective projection matrices.

use crate::{
    angle::{Angle, Degrees, radians_to_degrees},
    error::{MatrixError, Result},
    matrix::{HomogeneousPoint, Matrix4},
};

/// Validated parameters of a perspective projection.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerspectiveParameters {
    near_distance: f64,
    far_distance: f64,
    horizontal_field_of_view: Degrees,
    vertical_field_of_view: Degrees,
}

/// The derived quantities a perspective projection matrix is built from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectionCoefficients {
    /// Horizontal scale, `1 / tan(fov_h / 2)`.
    pub w: f64,
    /// Vertical scale, `1 / tan(fov_v / 2)`.
    pub h: f64,
    /// Depth scale, `far / (far - near)`.
    pub q: f64,
    pub near_distance: f64,
}

impl PerspectiveParameters {
    /// Creates a new set of perspective parameters.
    ///
    /// # Errors
    /// Returns [`MatrixError::InvalidDistance`] unless both distances are
    /// finite and positive with the far distance exceeding the near distance,
    /// and [`MatrixError::FieldOfViewOutOfRange`] unless both fields of view
    /// lie strictly between 0 and 180 degrees.
    pub fn new<A: Angle>(
        near_distance: f64,
        far_distance: f64,
        horizontal_field_of_view: A,
        vertical_field_of_view: A,
    ) -> Result<Self> {
        let horizontal_field_of_view = horizontal_field_of_view.as_degrees();
        let vertical_field_of_view = vertical_field_of_view.as_degrees();

        validate_near_and_far_distance(near_distance, far_distance)?;
        validate_field_of_view(horizontal_field_of_view)?;
        validate_field_of_view(vertical_field_of_view)?;

        Ok(Self {
            near_distance,
            far_distance,
            horizontal_field_of_view,
            vertical_field_of_view,
        })
    }

    pub fn near_distance(&self) -> f64 {
        self.near_distance
    }

    pub fn far_distance(&self) -> f64 {
        self.far_distance
    }

    pub fn horizontal_field_of_view(&self) -> Degrees {
        self.horizontal_field_of_view
    }

    pub fn vertical_field_of_view(&self) -> Degrees {
        self.vertical_field_of_view
    }

    /// Computes the coefficients of the projection matrix.
    pub fn coefficients(&self) -> ProjectionCoefficients {
        ProjectionCoefficients {
            w: (0.5 * self.horizontal_field_of_view.radians()).tan().recip(),
            h: (0.5 * self.vertical_field_of_view.radians()).tan().recip(),
            q: depth_scale(self.near_distance, self.far_distance),
            near_distance: self.near_distance,
        }
    }

    /// Builds the projection matrix.
    pub fn matrix(&self) -> Matrix4 {
        log::trace!(
            "Projection: near: {} far: {} H FOV: {} V FOV: {}",
            self.near_distance,
            self.far_distance,
            self.horizontal_field_of_view,
            self.vertical_field_of_view
        );
        self.coefficients().matrix()
    }
}

impl ProjectionCoefficients {
    /// Builds the projection matrix, `diag(w, h, q, 0)` with 1 in element
    /// `(2, 3)` and `-q * near` in element `(3, 2)`.
    pub fn matrix(&self) -> Matrix4 {
        let Self {
            w,
            h,
            q,
            near_distance,
        } = *self;
        Matrix4::new(
            w, 0.0, 0.0, 0.0, //
            0.0, h, 0.0, 0.0, //
            0.0, 0.0, q, 1.0, //
            0.0, 0.0, -q * near_distance, 0.0,
        )
    }
}

/// Creates a perspective projection matrix mapping view depths between the
/// near and far distance to normalized depths between 0 and 1, with the view
/// depth ending up in the w-component.
///
/// # Errors
/// See [`PerspectiveParameters::new`].
pub fn projection<A: Angle>(
    near_distance: f64,
    far_distance: f64,
    horizontal_field_of_view: A,
    vertical_field_of_view: A,
) -> Result<Matrix4> {
    Ok(PerspectiveParameters::new(
        near_distance,
        far_distance,
        horizontal_field_of_view,
        vertical_field_of_view,
    )?
    .matrix())
}

/// Recovers the horizontal field of view from element `(0, 0)` of a
/// projection matrix.
pub fn horizontal_field_of_view(matrix: &Matrix4) -> Degrees {
    field_of_view_from_scale(matrix.element(0, 0))
}

/// Recovers the vertical field of view from element `(1, 1)` of a projection
/// matrix.
pub fn vertical_field_of_view(matrix: &Matrix4) -> Degrees {
    field_of_view_from_scale(matrix.element(1, 1))
}

/// Finds the near and far distance of a projection matrix, or of a composite
/// matrix ending with a projection.
///
/// The clip-space points at normalized depth 0 and 1 are mapped back through
/// the inverse matrix and forward again, and the resulting w-components are
/// the view depths of the two planes.
///
/// # Errors
/// Returns [`MatrixError::NotInvertible`] if the matrix is singular.
pub fn find_near_and_far_distance(matrix: &Matrix4) -> Result<(f64, f64)> {
    let inverse = matrix.inverted()?;
    let depth_of = |clip_point: HomogeneousPoint| {
        let origin = (clip_point * inverse).normalized();
        (origin * matrix).w()
    };
    Ok((
        depth_of(HomogeneousPoint::new(0.0, 0.0, 0.0, 1.0)),
        depth_of(HomogeneousPoint::new(0.0, 0.0, 1.0, 1.0)),
    ))
}

pub(crate) fn validate_near_and_far_distance(near: f64, far: f64) -> Result<()> {
    if near.is_finite() && far.is_finite() && near > 0.0 && far > near {
        Ok(())
    } else {
        Err(MatrixError::InvalidDistance { near, far })
    }
}

pub(crate) fn depth_scale(near: f64, far: f64) -> f64 {
    far / (far - near)
}

fn validate_field_of_view(field_of_view: Degrees) -> Result<()> {
    let degrees = field_of_view.degrees();
    if degrees.is_finite() && degrees > 0.0 && degrees < 180.0 {
        Ok(())
    } else {
        Err(MatrixError::FieldOfViewOutOfRange { degrees })
    }
}

fn field_of_view_from_scale(scale: f64) -> Degrees {
    Degrees(radians_to_degrees(2.0 * scale.recip().atan()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        angle::Radians,
        strategies::{euclidean_matrix, perspective_parameters},
        transform::{rotate_y, translate},
    };
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use proptest::prelude::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn projection_with_90_degree_fields_of_view_has_unit_scales() {
        let m = projection(1.0, 11.0, Degrees(90.0), Degrees(90.0)).unwrap();
        assert_relative_eq!(
            m,
            Matrix4::from_rows([
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.1, 1.0],
                [0.0, 0.0, -1.1, 0.0],
            ]),
            epsilon = 1e-12
        );
    }

    #[test]
    fn projection_maps_near_and_far_planes_to_unit_depth_range() {
        let m = projection(2.0, 50.0, Degrees(80.0), Degrees(60.0)).unwrap();
        let near = (HomogeneousPoint::new(0.3, -0.2, 2.0, 1.0) * m).normalized();
        let far = (HomogeneousPoint::new(1.0, 4.0, 50.0, 1.0) * m).normalized();
        assert_abs_diff_eq!(near.z(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(far.z(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn projection_puts_view_depth_in_w() {
        let m = projection(0.5, 100.0, Degrees(70.0), Degrees(50.0)).unwrap();
        let clip = HomogeneousPoint::new(1.0, 2.0, 17.0, 1.0) * m;
        assert_eq!(clip.w(), 17.0);
    }

    #[test]
    fn projection_accepts_radians() {
        let from_degrees = projection(1.0, 10.0, Degrees(90.0), Degrees(45.0)).unwrap();
        let from_radians = projection(1.0, 10.0, Radians(FRAC_PI_2), Radians(FRAC_PI_2 / 2.0));
        assert_relative_eq!(from_radians.unwrap(), from_degrees, epsilon = 1e-12);
    }

    #[test]
    fn projection_with_equal_near_and_far_fails() {
        assert_eq!(
            projection(5.0, 5.0, Degrees(90.0), Degrees(60.0)),
            Err(MatrixError::InvalidDistance {
                near: 5.0,
                far: 5.0
            })
        );
    }

    #[test]
    fn projection_with_far_before_near_fails() {
        assert!(matches!(
            projection(10.0, 1.0, Degrees(90.0), Degrees(60.0)),
            Err(MatrixError::InvalidDistance { .. })
        ));
    }

    #[test]
    fn projection_with_non_positive_near_fails() {
        for near in [0.0, -1.0, f64::NAN] {
            assert!(matches!(
                projection(near, 10.0, Degrees(90.0), Degrees(60.0)),
                Err(MatrixError::InvalidDistance { .. })
            ));
        }
    }

    #[test]
    fn projection_with_infinite_far_fails() {
        assert!(projection(1.0, f64::INFINITY, Degrees(90.0), Degrees(60.0)).is_err());
    }

    #[test]
    fn projection_with_straight_angle_field_of_view_fails() {
        assert_eq!(
            projection(1.0, 10.0, Degrees(180.0), Degrees(60.0)),
            Err(MatrixError::FieldOfViewOutOfRange { degrees: 180.0 })
        );
        assert_eq!(
            projection(1.0, 10.0, Degrees(90.0), Degrees(200.0)),
            Err(MatrixError::FieldOfViewOutOfRange { degrees: 200.0 })
        );
    }

    #[test]
    fn projection_with_zero_field_of_view_fails() {
        assert!(matches!(
            projection(1.0, 10.0, Degrees(90.0), Degrees(0.0)),
            Err(MatrixError::FieldOfViewOutOfRange { .. })
        ));
    }

    #[test]
    fn fields_of_view_are_recovered_from_projection() {
        let m = projection(0.1, 1000.0, Degrees(100.0), Degrees(75.0)).unwrap();
        assert_relative_eq!(horizontal_field_of_view(&m), Degrees(100.0), epsilon = 1e-10);
        assert_relative_eq!(vertical_field_of_view(&m), Degrees(75.0), epsilon = 1e-10);
    }

    #[test]
    fn near_and_far_distance_are_recovered_from_projection() {
        let m = projection(0.25, 300.0, Degrees(90.0), Degrees(60.0)).unwrap();
        let (near, far) = find_near_and_far_distance(&m).unwrap();
        assert_relative_eq!(near, 0.25, max_relative = 1e-9);
        assert_relative_eq!(far, 300.0, max_relative = 1e-9);
    }

    #[test]
    fn near_and_far_distance_are_recovered_from_view_projection() {
        let view = rotate_y(Degrees(25.0)) * translate(3.0, -1.0, 8.0);
        let m = view * projection(1.5, 40.0, Degrees(90.0), Degrees(60.0)).unwrap();
        let (near, far) = find_near_and_far_distance(&m).unwrap();
        assert_relative_eq!(near, 1.5, max_relative = 1e-9);
        assert_relative_eq!(far, 40.0, max_relative = 1e-9);
    }

    #[test]
    fn near_and_far_distance_are_recovered_with_distant_camera() {
        let m = translate(0.0, 0.0, 1000.0)
            * projection(0.1, 1000.0, Degrees(90.0), Degrees(60.0)).unwrap();
        let (near, far) = find_near_and_far_distance(&m).unwrap();
        assert_relative_eq!(near, 0.1, max_relative = 1e-6);
        assert_relative_eq!(far, 1000.0, max_relative = 1e-6);
    }

    #[test]
    fn finding_near_and_far_distance_of_singular_matrix_fails() {
        assert!(matches!(
            find_near_and_far_distance(&Matrix4::zeros()),
            Err(MatrixError::NotInvertible { .. })
        ));
    }

    #[test]
    fn coefficients_match_matrix_elements() {
        let parameters =
            PerspectiveParameters::new(2.0, 10.0, Degrees(60.0), Degrees(45.0)).unwrap();
        let coefficients = parameters.coefficients();
        let m = parameters.matrix();
        assert_eq!(coefficients.w, m.element(0, 0));
        assert_eq!(coefficients.h, m.element(1, 1));
        assert_eq!(coefficients.q, 1.25);
        assert_eq!(m.element(3, 2), -2.5);
    }

    proptest! {
        #[test]
        fn fields_of_view_round_trip(parameters in perspective_parameters()) {
            let m = parameters.matrix();
            prop_assert!(approx::relative_eq!(
                horizontal_field_of_view(&m),
                parameters.horizontal_field_of_view(),
                epsilon = 1e-9
            ));
            prop_assert!(approx::relative_eq!(
                vertical_field_of_view(&m),
                parameters.vertical_field_of_view(),
                epsilon = 1e-9
            ));
        }
    }

    proptest! {
        #[test]
        fn near_and_far_distance_round_trip(
            parameters in perspective_parameters(),
            view in euclidean_matrix(10.0),
        ) {
            for m in [parameters.matrix(), view * parameters.matrix()] {
                let (near, far) = find_near_and_far_distance(&m).unwrap();
                prop_assert!(approx::relative_eq!(
                    near,
                    parameters.near_distance(),
                    epsilon = 1e-9,
                    max_relative = 1e-6
                ));
                prop_assert!(approx::relative_eq!(
                    far,
                    parameters.far_distance(),
                    epsilon = 1e-9,
                    max_relative = 1e-6
                ));
            }
        }
    }
}
