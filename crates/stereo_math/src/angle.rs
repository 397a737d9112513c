//! Different units for angles.

use approx::{AbsDiffEq, RelativeEq};
use bytemuck::{Pod, Zeroable};
use std::{
    f64::consts::{FRAC_1_PI, PI},
    fmt,
};

/// Represents an angle.
pub trait Angle: Copy {
    /// Returns the angle as degrees.
    fn as_degrees(self) -> Degrees;

    /// Returns the angle as radians.
    fn as_radians(self) -> Radians;

    /// Returns the value of the angle in degrees.
    fn degrees(self) -> f64;

    /// Returns the value of the angle in radians.
    fn radians(self) -> f64;
}

/// An angle in degrees.
#[repr(transparent)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Zeroable, Pod)]
pub struct Degrees(pub f64);

/// An angle in radians.
#[repr(transparent)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Zeroable, Pod)]
pub struct Radians(pub f64);

impl Angle for Degrees {
    fn as_degrees(self) -> Degrees {
        self
    }

    fn as_radians(self) -> Radians {
        Radians::from(self)
    }

    fn degrees(self) -> f64 {
        self.0
    }

    fn radians(self) -> f64 {
        degrees_to_radians(self.0)
    }
}

impl Angle for Radians {
    fn as_degrees(self) -> Degrees {
        Degrees::from(self)
    }

    fn as_radians(self) -> Radians {
        self
    }

    fn degrees(self) -> f64 {
        radians_to_degrees(self.0)
    }

    fn radians(self) -> f64 {
        self.0
    }
}

impl From<Radians> for Degrees {
    fn from(rad: Radians) -> Self {
        Self(radians_to_degrees(rad.0))
    }
}

impl From<Degrees> for Radians {
    fn from(deg: Degrees) -> Self {
        Self(degrees_to_radians(deg.0))
    }
}

impl fmt::Display for Degrees {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}

impl AbsDiffEq for Degrees {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        f64::abs_diff_eq(&self.0, &other.0, epsilon)
    }
}

impl AbsDiffEq for Radians {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        f64::abs_diff_eq(&self.0, &other.0, epsilon)
    }
}

impl RelativeEq for Degrees {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        f64::relative_eq(&self.0, &other.0, epsilon, max_relative)
    }
}

impl RelativeEq for Radians {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        f64::relative_eq(&self.0, &other.0, epsilon, max_relative)
    }
}

pub fn radians_to_degrees(radians: f64) -> f64 {
    radians * (180.0 * FRAC_1_PI)
}

pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees * (PI / 180.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn degrees_to_radians_for_special_angles_work() {
        assert_abs_diff_eq!(Degrees(0.0).radians(), 0.0);
        assert_abs_diff_eq!(Degrees(90.0).radians(), PI / 2.0);
        assert_abs_diff_eq!(Degrees(180.0).radians(), PI);
        assert_abs_diff_eq!(Degrees(270.0).radians(), 3.0 * PI / 2.0);
    }

    #[test]
    fn radians_to_degrees_for_special_angles_work() {
        assert_abs_diff_eq!(Radians(0.0).degrees(), 0.0);
        assert_abs_diff_eq!(Radians(PI / 2.0).degrees(), 90.0);
        assert_abs_diff_eq!(Radians(PI).degrees(), 180.0);
        assert_abs_diff_eq!(Radians(3.0 * PI / 2.0).degrees(), 270.0, epsilon = 1e-12);
    }

    #[test]
    fn converting_between_units_preserves_angle() {
        let deg = Degrees(37.5);
        assert_abs_diff_eq!(deg.as_radians().as_degrees(), deg, epsilon = 1e-12);
        assert_abs_diff_eq!(Radians::from(deg).0, deg.radians());
    }
}
