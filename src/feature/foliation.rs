//! Planar feature stored as its axial pole.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Neg;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{axial, record, Feature, FeatureKind, FeatureRecord, Lineation, Orientation};
use crate::gp::{DefGrad, Vector3};
use crate::precision;
use crate::{FabricError, Result};

/// A plane given by dip direction and dip.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Foliation {
    pole: Vector3,
}

impl Foliation {
    /// Foliation from dip direction and dip in degrees.
    pub fn new(azimuth: f64, inclination: f64) -> Self {
        Self { pole: Vector3::from_geo(azimuth + 180.0, 90.0 - inclination) }
    }

    /// Foliation with the given pole.
    pub fn from_vector(pole: &Vector3) -> Result<Self> {
        Ok(Self { pole: pole.normalized()? })
    }

    /// Wraps a vector already known to be unit length.
    pub(crate) const fn from_unit(pole: Vector3) -> Self {
        Self { pole }
    }

    /// Uniformly distributed random foliation.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self { pole: axial::random_unit(rng) }
    }

    /// Unit pole as stored (either sign).
    #[inline]
    pub fn pole(&self) -> Vector3 {
        self.pole
    }

    /// Dip direction and dip.
    pub fn geo(&self) -> (f64, f64) {
        let (azi, inc) = self.pole.lower().geo();
        ((azi + 180.0).rem_euclid(360.0), 90.0 - inc)
    }

    /// Strike and dip by the right-hand rule.
    pub fn rhr(&self) -> (f64, f64) {
        let (azi, inc) = self.geo();
        ((azi - 90.0).rem_euclid(360.0), inc)
    }

    /// Line of maximum dip.
    pub fn dipvec(&self) -> Lineation {
        let (azi, inc) = self.geo();
        Lineation::new(azi, inc)
    }

    /// Absolute dot product of the poles.
    pub fn dot(&self, other: &Foliation) -> f64 {
        self.pole.dot(&other.pole).abs()
    }

    /// Angle between the poles (or to a line's direction) in degrees, in [0, 90].
    pub fn angle<O: Orientation>(&self, other: &O) -> f64 {
        axial::angle(&self.pole, &other.vector())
    }

    /// Intersection line of two planes.
    pub fn cross(&self, other: &Foliation) -> Result<Lineation> {
        Lineation::from_vector(&self.pole.cross(&other.pole)).map_err(|_| {
            FabricError::DegenerateInput("parallel planes have no intersection".into())
        })
    }

    /// True if the lineation lies in the plane.
    pub fn is_containing(&self, lin: &Lineation) -> bool {
        (90.0 - self.angle(lin)).to_radians().abs() < precision::ANGULAR
    }

    /// Rotation about an axis by an angle in degrees.
    pub fn rotate(&self, axis: &Vector3, angle: f64) -> Result<Self> {
        Ok(Self { pole: self.pole.rotate(axis, angle)? })
    }

    /// Plane carried by a linear map; the pole transforms by the inverse transpose.
    pub fn transform(&self, f: &DefGrad) -> Result<Self> {
        let inv_t = f.inverted()?.transposed();
        Self::from_vector(&inv_t.apply(&self.pole))
    }

    /// Same plane with the stored pole reversed.
    #[inline]
    pub fn flip(&self) -> Self {
        Self { pole: self.pole.flip() }
    }

    /// True if the stored pole points up.
    #[inline]
    pub fn is_upper(&self) -> bool {
        self.pole.is_upper()
    }
}

impl Default for Foliation {
    fn default() -> Self {
        Self { pole: Vector3::unit_z() }
    }
}

impl PartialEq for Foliation {
    fn eq(&self, other: &Self) -> bool {
        axial::coincide(&self.pole, &other.pole)
    }
}

impl Eq for Foliation {}

impl Hash for Foliation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        axial::hash(&self.pole, state);
    }
}

impl Neg for Foliation {
    type Output = Foliation;
    fn neg(self) -> Foliation {
        self.flip()
    }
}

impl fmt::Display for Foliation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (azi, inc) = self.geo();
        write!(f, "S:{:.0}/{:.0}", azi, inc)
    }
}

impl Feature for Foliation {
    const KIND: FeatureKind = FeatureKind::Foliation;

    fn rotate(&self, axis: &Vector3, angle: f64) -> Result<Self> {
        Foliation::rotate(self, axis, angle)
    }

    fn transform(&self, f: &DefGrad) -> Result<Self> {
        Foliation::transform(self, f)
    }

    fn to_record(&self) -> FeatureRecord {
        let (azi, inc) = self.geo();
        FeatureRecord::Foliation { azi, inc }
    }

    fn from_record(rec: &FeatureRecord) -> Result<Self> {
        match rec {
            FeatureRecord::Foliation { azi, inc } => Ok(Foliation::new(*azi, *inc)),
            other => Err(record::mismatch(FeatureKind::Foliation, other.kind())),
        }
    }
}

impl Orientation for Foliation {
    const AXIAL: bool = true;

    fn vector(&self) -> Vector3 {
        self.pole
    }

    fn from_vector(v: &Vector3) -> Result<Self> {
        Foliation::from_vector(v)
    }

    fn from_geo(azimuth: f64, inclination: f64) -> Self {
        Foliation::new(azimuth, inclination)
    }

    fn geo(&self) -> (f64, f64) {
        Foliation::geo(self)
    }
}
