//! Proptest strategies for generating matrices.

use crate::{
    angle::Degrees,
    matrix::Matrix4,
    projection::PerspectiveParameters,
    stereo::StereoParameters,
    transform::{rotate_x, rotate_y, rotate_z, scale, translate},
};
use proptest::prelude::*;

prop_compose! {
    /// Diagonally dominant matrices, which are always well-conditioned.
    pub fn general_matrix()(
        elements in prop::array::uniform16(-1.0..1.0),
    ) -> Matrix4 {
        let mut m = Matrix4::identity() * 4.0;
        for (index, element) in elements.into_iter().enumerate() {
            *m.element_mut(index / 4, index % 4) += element;
        }
        m
    }
}

prop_compose! {
    pub fn euclidean_matrix(max_translation: f64)(
        scaling_x in 0.5..2.0,
        scaling_y in 0.5..2.0,
        scaling_z in 0.5..2.0,
        rotation_x in -180.0..180.0,
        rotation_y in -90.0..90.0,
        rotation_z in -180.0..180.0,
        translation_x in -max_translation..max_translation,
        translation_y in -max_translation..max_translation,
        translation_z in -max_translation..max_translation,
    ) -> Matrix4 {
        scale(scaling_x, scaling_y, scaling_z)
            * rotate_x(Degrees(rotation_x))
            * rotate_y(Degrees(rotation_y))
            * rotate_z(Degrees(rotation_z))
            * translate(translation_x, translation_y, translation_z)
    }
}

prop_compose! {
    pub fn perspective_parameters()(
        near_distance in 0.1..10.0,
        depth_range in 1.0..1000.0,
        horizontal_field_of_view in 60.0..110.0,
        vertical_field_of_view in 60.0..90.0,
    ) -> PerspectiveParameters {
        PerspectiveParameters::new(
            near_distance,
            near_distance + depth_range,
            Degrees(horizontal_field_of_view),
            Degrees(vertical_field_of_view),
        )
        .unwrap()
    }
}

prop_compose! {
    pub fn projection_matrix()(parameters in perspective_parameters()) -> Matrix4 {
        parameters.matrix()
    }
}

prop_compose! {
    pub fn model_view_projection(max_translation: f64)(
        model_view in euclidean_matrix(max_translation),
        projection in projection_matrix(),
    ) -> Matrix4 {
        model_view * projection
    }
}

prop_compose! {
    pub fn stereo_parameters()(
        separation in -0.5..0.5,
        convergence in 0.1..50.0,
    ) -> StereoParameters {
        StereoParameters::new(separation, convergence).unwrap()
    }
}
