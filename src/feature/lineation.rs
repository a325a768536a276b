//! Linear feature as an axial unit vector.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Neg;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{axial, record, Feature, FeatureKind, FeatureRecord, Foliation, Orientation};
use crate::gp::{DefGrad, Vector3};
use crate::{FabricError, Result};

/// A line in space: `l` and `-l` are the same lineation.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Lineation {
    v: Vector3,
}

impl Lineation {
    /// Lineation from trend (azimuth) and plunge in degrees.
    pub fn new(azimuth: f64, inclination: f64) -> Self {
        Self { v: Vector3::from_geo(azimuth, inclination) }
    }

    /// Lineation parallel to a vector.
    pub fn from_vector(v: &Vector3) -> Result<Self> {
        Ok(Self { v: v.normalized()? })
    }

    /// Wraps a vector already known to be unit length.
    pub(crate) const fn from_unit(v: Vector3) -> Self {
        Self { v }
    }

    /// Uniformly distributed random lineation.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self { v: axial::random_unit(rng) }
    }

    /// Unit vector as stored (either sign).
    #[inline]
    pub fn vector(&self) -> Vector3 {
        self.v
    }

    /// Trend and plunge of the lower-hemisphere representative.
    pub fn geo(&self) -> (f64, f64) {
        self.v.lower().geo()
    }

    /// Absolute dot product.
    pub fn dot(&self, other: &Lineation) -> f64 {
        self.v.dot(&other.v).abs()
    }

    /// Angle to any other orientation in degrees, folded into [0, 90].
    pub fn angle<O: Orientation>(&self, other: &O) -> f64 {
        axial::angle(&self.v, &other.vector())
    }

    /// Plane containing both lineations.
    pub fn cross(&self, other: &Lineation) -> Result<Foliation> {
        Foliation::from_vector(&self.v.cross(&other.v)).map_err(|_| {
            FabricError::DegenerateInput("parallel lineations define no plane".into())
        })
    }

    /// Rotation about an axis by an angle in degrees.
    pub fn rotate(&self, axis: &Vector3, angle: f64) -> Result<Self> {
        Ok(Self { v: self.v.rotate(axis, angle)? })
    }

    /// Lineation carried by a linear map (renormalized).
    pub fn transform(&self, f: &DefGrad) -> Result<Self> {
        Self::from_vector(&f.apply(&self.v))
    }

    /// Same lineation with the stored vector reversed.
    #[inline]
    pub fn flip(&self) -> Self {
        Self { v: self.v.flip() }
    }

    /// True if the stored vector points up.
    #[inline]
    pub fn is_upper(&self) -> bool {
        self.v.is_upper()
    }
}

impl Default for Lineation {
    fn default() -> Self {
        Self { v: Vector3::unit_x() }
    }
}

impl PartialEq for Lineation {
    fn eq(&self, other: &Self) -> bool {
        axial::coincide(&self.v, &other.v)
    }
}

impl Eq for Lineation {}

impl Hash for Lineation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        axial::hash(&self.v, state);
    }
}

impl Neg for Lineation {
    type Output = Lineation;
    fn neg(self) -> Lineation {
        self.flip()
    }
}

impl fmt::Display for Lineation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (azi, inc) = self.geo();
        write!(f, "L:{:.0}/{:.0}", azi, inc)
    }
}

impl From<Lineation> for Vector3 {
    fn from(l: Lineation) -> Self {
        l.v
    }
}

impl Feature for Lineation {
    const KIND: FeatureKind = FeatureKind::Lineation;

    fn rotate(&self, axis: &Vector3, angle: f64) -> Result<Self> {
        Lineation::rotate(self, axis, angle)
    }

    fn transform(&self, f: &DefGrad) -> Result<Self> {
        Lineation::transform(self, f)
    }

    fn to_record(&self) -> FeatureRecord {
        let (azi, inc) = self.geo();
        FeatureRecord::Lineation { azi, inc }
    }

    fn from_record(rec: &FeatureRecord) -> Result<Self> {
        match rec {
            FeatureRecord::Lineation { azi, inc } => Ok(Lineation::new(*azi, *inc)),
            other => Err(record::mismatch(FeatureKind::Lineation, other.kind())),
        }
    }
}

impl Orientation for Lineation {
    const AXIAL: bool = true;

    fn vector(&self) -> Vector3 {
        self.v
    }

    fn from_vector(v: &Vector3) -> Result<Self> {
        Lineation::from_vector(v)
    }

    fn from_geo(azimuth: f64, inclination: f64) -> Self {
        Lineation::new(azimuth, inclination)
    }

    fn geo(&self) -> (f64, f64) {
        Lineation::geo(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_display() {
        assert_eq!(Lineation::new(0.0, 0.0).to_string(), "L:0/0");
    }

    #[test]
    fn test_equality_for_opposite_direction() {
        let mut rng = StdRng::seed_from_u64(7);
        let l = Lineation::random(&mut rng);
        assert_eq!(l, -l);
        assert_eq!(l.angle(&-l), 0.0);
    }

    #[test]
    fn test_azimuth_wraparound() {
        assert_eq!(Lineation::new(0.0, 20.0), Lineation::new(360.0, 20.0));
    }

    #[test]
    fn test_from_vector_reports_lower_geo() {
        let l = Lineation::from_vector(&Vector3::new(1.0, 1.0, 1.0)).unwrap();
        assert_eq!(l.to_string(), Lineation::new(45.0, 35.0).to_string());
        let up = Lineation::from_vector(&Vector3::new(-1.0, -1.0, -1.0)).unwrap();
        assert_eq!(up, l);
        assert_eq!(up.to_string(), "L:45/35");
    }

    #[test]
    fn test_geo_roundtrip() {
        let l = Lineation::new(120.0, 30.0);
        let (azi, inc) = l.geo();
        assert_eq!(Lineation::new(azi, inc), l);
    }

    #[test]
    fn test_cross_is_perpendicular_plane() {
        let mut rng = StdRng::seed_from_u64(11);
        let l1 = Lineation::random(&mut rng);
        let l2 = Lineation::random(&mut rng);
        let p = l1.cross(&l2).unwrap();
        assert_relative_eq!(p.angle(&l1), 90.0, epsilon = 1e-9);
        assert_relative_eq!(p.angle(&l2), 90.0, epsilon = 1e-9);
        assert!(l1.cross(&-l1).is_err());
    }

    #[test]
    fn test_dot_is_absolute() {
        let l = Lineation::new(10.0, 10.0);
        assert_relative_eq!(l.dot(&-l), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_hash_is_sign_invariant() {
        use std::collections::HashSet;
        let l = Lineation::new(213.0, 41.0);
        let mut set = HashSet::new();
        set.insert(l);
        assert!(set.contains(&-l));
    }
}
