//! Polar 3D vector.
//!
//! The geographic frame is x = North, y = East, z = Down, so a positive
//! inclination points into the lower hemisphere.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Index, Mul, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

use super::DefGrad;
use crate::precision;
use crate::{FabricError, Result};

/// A 3D vector whose sign matters.
///
/// Used directly for polar directional data (paleomagnetic vectors,
/// movement vectors) and as storage for the axial feature types.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct Vector3 {
    x: f64,
    y: f64,
    z: f64,
}

impl Vector3 {
    /// Creates a vector with given coordinates.
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Zero vector (0, 0, 0).
    #[inline]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// North (1, 0, 0).
    #[inline]
    pub const fn unit_x() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }

    /// East (0, 1, 0).
    #[inline]
    pub const fn unit_y() -> Self {
        Self::new(0.0, 1.0, 0.0)
    }

    /// Down (0, 0, 1).
    #[inline]
    pub const fn unit_z() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }

    /// Unit vector from azimuth and inclination in degrees.
    ///
    /// Any angles are accepted: values outside [0,360) or [-90,90] fold
    /// through the trigonometry, so `geo()` of the result is normalized.
    pub fn from_geo(azimuth: f64, inclination: f64) -> Self {
        let (sa, ca) = azimuth.to_radians().sin_cos();
        let (si, ci) = inclination.to_radians().sin_cos();
        Self::new(ca * ci, sa * ci, si)
    }

    /// Creates from array.
    #[inline]
    pub const fn from_array(arr: [f64; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }

    /// Converts to array.
    #[inline]
    pub const fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    #[inline]
    pub const fn x(&self) -> f64 {
        self.x
    }

    #[inline]
    pub const fn y(&self) -> f64 {
        self.y
    }

    #[inline]
    pub const fn z(&self) -> f64 {
        self.z
    }

    /// Returns all three coordinates as a tuple.
    #[inline]
    pub const fn coords(&self) -> (f64, f64, f64) {
        (self.x, self.y, self.z)
    }

    /// Length of the vector.
    #[inline]
    pub fn magnitude(&self) -> f64 {
        self.square_magnitude().sqrt()
    }

    /// Square of the length.
    #[inline]
    pub const fn square_magnitude(&self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// True if the vector is too short to carry a direction.
    #[inline]
    pub fn is_zero(&self) -> bool {
        precision::is_degenerate_length(self.magnitude())
    }

    /// Unit vector with the same direction.
    pub fn normalized(&self) -> Result<Vector3> {
        let m = self.magnitude();
        if precision::is_degenerate_length(m) {
            return Err(FabricError::DegenerateInput(
                "cannot normalize a zero-length vector".into(),
            ));
        }
        Ok(self.divided(m))
    }

    /// Geographic pair (azimuth, inclination) in degrees.
    ///
    /// Azimuth is in [0,360), inclination in [-90,90]. A zero vector has
    /// no direction and yields a NaN inclination.
    pub fn geo(&self) -> (f64, f64) {
        let m = self.magnitude();
        let azi = self.y.atan2(self.x).to_degrees().rem_euclid(360.0);
        let inc = (self.z / m).clamp(-1.0, 1.0).asin().to_degrees();
        // rem_euclid can round up to exactly 360 for tiny negative inputs
        let azi = if azi >= 360.0 { 0.0 } else { azi };
        (azi, inc)
    }

    /// Dot product.
    #[inline]
    pub const fn dot(&self, other: &Vector3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product. Collinear inputs give the zero vector.
    #[inline]
    pub const fn cross(&self, other: &Vector3) -> Vector3 {
        Vector3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Angle to other vector in degrees, in [0, 180].
    ///
    /// Computed as atan2(|u×v|, u·v), which stays accurate near 0 and 180.
    pub fn angle(&self, other: &Vector3) -> f64 {
        self.cross(other).magnitude().atan2(self.dot(other)).to_degrees()
    }

    /// Rotation about an axis by an angle in degrees (right-hand rule).
    ///
    /// Rodrigues' formula; the axis need not be unit length.
    pub fn rotate(&self, axis: &Vector3, angle: f64) -> Result<Vector3> {
        let k = axis.normalized().map_err(|_| {
            FabricError::DegenerateInput("rotation axis has zero length".into())
        })?;
        let (s, c) = angle.to_radians().sin_cos();
        Ok(self.multiplied(c) + k.cross(self).multiplied(s) + k.multiplied((1.0 - c) * k.dot(self)))
    }

    /// Applies a linear map. The magnitude is left as the map makes it.
    #[inline]
    pub fn transform(&self, f: &DefGrad) -> Vector3 {
        f.apply(self)
    }

    /// Vector projection onto other.
    pub fn proj(&self, other: &Vector3) -> Result<Vector3> {
        let m2 = other.square_magnitude();
        if precision::is_degenerate_length(m2.sqrt()) {
            return Err(FabricError::DegenerateInput(
                "cannot project onto a zero-length vector".into(),
            ));
        }
        Ok(other.multiplied(self.dot(other) / m2))
    }

    /// Component perpendicular to other.
    pub fn reject(&self, other: &Vector3) -> Result<Vector3> {
        Ok(*self - self.proj(other)?)
    }

    /// Reversed vector.
    #[inline]
    pub const fn flip(&self) -> Vector3 {
        Vector3::new(-self.x, -self.y, -self.z)
    }

    /// True if the vector points into the upper hemisphere (z < 0).
    #[inline]
    pub fn is_upper(&self) -> bool {
        self.z < 0.0
    }

    /// The representative lying in the lower hemisphere.
    #[inline]
    pub fn lower(&self) -> Vector3 {
        if self.is_upper() { self.flip() } else { *self }
    }

    /// Sign-fixed representative: the last component whose magnitude
    /// exceeds the confusion tolerance is made positive.
    pub fn canonical(&self) -> Vector3 {
        let scale = self.magnitude().max(1.0);
        let last = [self.z, self.y, self.x]
            .into_iter()
            .find(|c| c.abs() > precision::CONFUSION * scale);
        match last {
            Some(c) if c < 0.0 => self.flip(),
            _ => *self,
        }
    }

    /// Returns this multiplied by scalar.
    #[inline]
    pub const fn multiplied(&self, scalar: f64) -> Vector3 {
        Vector3::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }

    /// Returns this divided by scalar.
    #[inline]
    pub fn divided(&self, scalar: f64) -> Vector3 {
        Vector3::new(self.x / scalar, self.y / scalar, self.z / scalar)
    }

    /// True if the difference of the vectors is shorter than tolerance.
    #[inline]
    pub fn is_equal(&self, other: &Vector3, tolerance: f64) -> bool {
        (*self - *other).magnitude() <= tolerance
    }
}

impl PartialEq for Vector3 {
    fn eq(&self, other: &Self) -> bool {
        self.is_equal(other, precision::CONFUSION)
    }
}

impl Eq for Vector3 {}

impl Hash for Vector3 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        precision::quantize(self.x).hash(state);
        precision::quantize(self.y).hash(state);
        precision::quantize(self.z).hash(state);
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (azi, inc) = self.geo();
        write!(f, "V:{:.0}/{:.0}", azi, inc)
    }
}

impl Add for Vector3 {
    type Output = Vector3;
    #[inline]
    fn add(self, other: Vector3) -> Vector3 {
        Vector3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl AddAssign for Vector3 {
    #[inline]
    fn add_assign(&mut self, other: Vector3) {
        self.x += other.x;
        self.y += other.y;
        self.z += other.z;
    }
}

impl Sub for Vector3 {
    type Output = Vector3;
    #[inline]
    fn sub(self, other: Vector3) -> Vector3 {
        Vector3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl SubAssign for Vector3 {
    #[inline]
    fn sub_assign(&mut self, other: Vector3) {
        self.x -= other.x;
        self.y -= other.y;
        self.z -= other.z;
    }
}

impl Mul<f64> for Vector3 {
    type Output = Vector3;
    #[inline]
    fn mul(self, scalar: f64) -> Vector3 {
        self.multiplied(scalar)
    }
}

impl Mul<Vector3> for f64 {
    type Output = Vector3;
    #[inline]
    fn mul(self, v: Vector3) -> Vector3 {
        v.multiplied(self)
    }
}

impl Div<f64> for Vector3 {
    type Output = Vector3;
    #[inline]
    fn div(self, scalar: f64) -> Vector3 {
        self.divided(scalar)
    }
}

impl Neg for Vector3 {
    type Output = Vector3;
    #[inline]
    fn neg(self) -> Vector3 {
        self.flip()
    }
}

impl Index<usize> for Vector3 {
    type Output = f64;
    /// 0-indexed component access. Panics if index > 2.
    fn index(&self, index: usize) -> &f64 {
        match index {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Vector3::index: index {} out of range [0,2]", index),
        }
    }
}

impl Sum for Vector3 {
    fn sum<I: Iterator<Item = Vector3>>(iter: I) -> Vector3 {
        iter.fold(Vector3::zero(), |acc, v| acc + v)
    }
}

impl From<[f64; 3]> for Vector3 {
    fn from(arr: [f64; 3]) -> Self {
        Vector3::from_array(arr)
    }
}

impl From<Vector3> for nalgebra::Vector3<f64> {
    fn from(v: Vector3) -> Self {
        nalgebra::Vector3::new(v.x, v.y, v.z)
    }
}

impl From<nalgebra::Vector3<f64>> for Vector3 {
    fn from(v: nalgebra::Vector3<f64>) -> Self {
        Vector3::new(v[0], v[1], v[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_geo_of_north() {
        let (azi, inc) = Vector3::new(1.0, 0.0, 0.0).geo();
        assert_eq!(azi, 0.0);
        assert_eq!(inc, 0.0);
    }

    #[test]
    fn test_geo_of_general_vector() {
        let (azi, inc) = Vector3::new(1.0, 2.0, 3.0).geo();
        assert_eq!(format!("{:.0}/{:.0}", azi, inc), "63/53");
        assert_eq!(Vector3::new(1.0, 2.0, 3.0).to_string(), "V:63/53");
    }

    #[test]
    fn test_from_geo_folds_out_of_range() {
        let v = Vector3::from_geo(-30.0, 100.0);
        let (azi, inc) = v.geo();
        assert_relative_eq!(azi, 150.0, epsilon = 1e-9);
        assert_relative_eq!(inc, 80.0, epsilon = 1e-9);
    }

    #[test]
    fn test_magnitude() {
        assert_eq!(Vector3::new(1.0, 2.0, 3.0).magnitude(), 14.0_f64.sqrt());
    }

    #[test]
    fn test_normalized() {
        let v = Vector3::new(1.0, 2.0, 3.0).normalized().unwrap();
        assert_eq!(v, Vector3::new(0.26726124191242442, 0.5345224838248488, 0.8017837257372732));
        assert!(Vector3::zero().normalized().is_err());
    }

    #[test]
    fn test_angle_extremes() {
        let x = Vector3::unit_x();
        assert_eq!(x.angle(&Vector3::new(2.0, 0.0, 0.0)), 0.0);
        assert_relative_eq!(x.angle(&Vector3::new(0.0, 1.0, 1.0)), 90.0);
        assert_relative_eq!(x.angle(&-x), 180.0);
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let v = Vector3::new(1.0, 1.0, 1.0).rotate(&Vector3::unit_z(), 90.0).unwrap();
        assert_eq!(v, Vector3::new(-1.0, 1.0, 1.0));
    }

    #[test]
    fn test_rotate_zero_axis_fails() {
        let r = Vector3::unit_x().rotate(&Vector3::zero(), 30.0);
        assert!(matches!(r, Err(FabricError::DegenerateInput(_))));
    }

    #[test]
    fn test_proj() {
        let p = Vector3::new(1.0, 0.0, 1.0).proj(&Vector3::unit_z()).unwrap();
        assert_eq!(p, Vector3::unit_z());
    }

    #[test]
    fn test_is_upper() {
        assert!(Vector3::new(0.0, 0.0, -1.0).is_upper());
        assert!(!Vector3::new(0.0, 0.0, 1.0).is_upper());
    }

    #[test]
    fn test_canonical_sign() {
        let v = Vector3::new(0.3, -0.2, -0.5);
        assert_eq!(v.canonical(), -v);
        let h = Vector3::new(0.3, -0.2, 0.0);
        assert_eq!(h.canonical(), -h);
        assert_eq!(v.canonical(), v.flip().canonical());
    }

    #[test]
    fn test_hash_matches_for_equal_vectors() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(Vector3::new(1.0, 2.0, 3.0));
        assert!(set.contains(&Vector3::new(1.0, 2.0, 3.0)));
        assert!(!set.contains(&Vector3::new(3.0, 2.0, 1.0)));
    }

    #[test]
    fn test_index_and_ops() {
        let v = Vector3::new(1.0, 2.0, 3.0);
        assert_eq!((v[0], v[1], v[2]), (1.0, 2.0, 3.0));
        assert_eq!(v - Vector3::new(3.0, 1.0, 2.0), Vector3::new(-2.0, 1.0, 1.0));
        assert_eq!(v + v, 2.0 * v);
        assert_relative_eq!((10.0 * Vector3::from_geo(120.0, 50.0)).magnitude(), 10.0);
    }
}
