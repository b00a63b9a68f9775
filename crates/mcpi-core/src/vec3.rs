//! Three-component world coordinates

use crate::error::McpiError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

/// A position in the world.
///
/// Block coordinates are whole numbers; entity positions may be fractional.
/// `Display` renders the comma-separated form used on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Apply `f` to every component
    pub fn map(self, mut f: impl FnMut(f64) -> f64) -> Self {
        Self::new(f(self.x), f(self.y), f(self.z))
    }

    pub fn floor(self) -> Self {
        self.map(f64::floor)
    }

    pub fn ceil(self) -> Self {
        self.map(f64::ceil)
    }

    pub fn round(self) -> Self {
        self.map(f64::round)
    }

    pub fn abs(self) -> Self {
        self.map(f64::abs)
    }

    /// Component-wise minimum
    pub fn min(self, other: impl Into<Vec3>) -> Self {
        let other = other.into();
        Self::new(
            self.x.min(other.x),
            self.y.min(other.y),
            self.z.min(other.z),
        )
    }

    /// Component-wise maximum
    pub fn max(self, other: impl Into<Vec3>) -> Self {
        let other = other.into();
        Self::new(
            self.x.max(other.x),
            self.y.max(other.y),
            self.z.max(other.z),
        )
    }

    /// Offset by another vector
    pub fn translate(self, by: impl Into<Vec3>) -> Self {
        self + by.into()
    }

    pub fn negate(self) -> Self {
        -self
    }

    pub fn scale(self, by: f64) -> Self {
        self * by
    }

    /// Euclidean distance to another point
    pub fn distance(self, other: impl Into<Vec3>) -> f64 {
        let d = other.into() - self;
        (d.x * d.x + d.y * d.y + d.z * d.z).sqrt()
    }

    /// Whether every component is a whole number (a valid block coordinate)
    pub fn is_integral(&self) -> bool {
        self.to_array().iter().all(|c| c.is_finite() && c.fract() == 0.0)
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<[i32; 3]> for Vec3 {
    fn from([x, y, z]: [i32; 3]) -> Self {
        Self::new(x.into(), y.into(), z.into())
    }
}

impl From<(f64, f64, f64)> for Vec3 {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self::new(x, y, z)
    }
}

impl From<(i32, i32, i32)> for Vec3 {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self::new(x.into(), y.into(), z.into())
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;

    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;

    fn mul(self, by: f64) -> Vec3 {
        self.map(|c| c * by)
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.x, self.y, self.z)
    }
}

impl FromStr for Vec3 {
    type Err = McpiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(',').map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|_| McpiError::InvalidResponse(format!("bad coordinate `{}` in `{}`", part, s)))
        });

        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(x), Some(y), Some(z), None) => Ok(Vec3::new(x?, y?, z?)),
            _ => Err(McpiError::InvalidResponse(format!(
                "expected x,y,z but got `{}`",
                s
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_wire_format() {
        assert_eq!(Vec3::new(1.0, -2.0, 3.5).to_string(), "1,-2,3.5");
        assert_eq!(Vec3::from([0, 64, 0]).to_string(), "0,64,0");
    }

    #[test]
    fn test_parse_position_reply() {
        let pos: Vec3 = "12.5,70.0,-3.25".parse().unwrap();
        assert_eq!(pos, Vec3::new(12.5, 70.0, -3.25));
    }

    #[test]
    fn test_parse_rejects_wrong_arity() {
        assert!("1,2".parse::<Vec3>().is_err());
        assert!("1,2,3,4".parse::<Vec3>().is_err());
        assert!("1,two,3".parse::<Vec3>().is_err());
    }

    #[test]
    fn test_arithmetic() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(a.translate((1, 1, 1)), Vec3::new(2.0, 3.0, 4.0));
        assert_eq!(a.negate(), Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(a.scale(2.0), Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(a.min([0.0, 5.0, 3.0]), Vec3::new(0.0, 2.0, 3.0));
        assert_eq!(a.max([0.0, 5.0, 3.0]), Vec3::new(1.0, 5.0, 3.0));
        assert_eq!(Vec3::default().distance((3, 4, 0)), 5.0);
    }

    #[test]
    fn test_rounding_and_integral() {
        let v = Vec3::new(1.5, -1.5, 2.0);
        assert_eq!(v.floor(), Vec3::new(1.0, -2.0, 2.0));
        assert_eq!(v.ceil(), Vec3::new(2.0, -1.0, 2.0));
        assert_eq!(v.abs(), Vec3::new(1.5, 1.5, 2.0));
        assert!(!v.is_integral());
        assert!(v.floor().is_integral());
        assert!(!Vec3::new(f64::NAN, 0.0, 0.0).is_integral());
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_string(&Vec3::new(1.0, 2.0, 3.0)).unwrap();
        assert_eq!(json, r#"{"x":1.0,"y":2.0,"z":3.0}"#);
    }
}
