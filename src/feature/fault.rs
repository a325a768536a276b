//! Fault: a pair with a sense of slip.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{record, Feature, FeatureKind, FeatureRecord, Foliation, Lineation, Pair};
use crate::gp::{DefGrad, Vector3};
use crate::{FabricError, Result};

/// Fault plane with a slip line and movement sense.
///
/// The sense is not stored as a number. It is carried by the signs of the
/// pole and slip vectors relative to their canonical representatives, so
/// rotations and linear maps carry it along for free.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Fault {
    pair: Pair,
}

impl Fault {
    /// Fault from plane dip direction/dip, slip trend/plunge and sense (+1 or -1).
    pub fn new(fazi: f64, finc: f64, lazi: f64, linc: f64, sense: i8) -> Result<Self> {
        Self::from_pair(&Pair::new(fazi, finc, lazi, linc)?, sense)
    }

    /// Fault from a corrected pair and a sense.
    pub fn from_pair(pair: &Pair, sense: i8) -> Result<Self> {
        let sign = match sense.signum() {
            0 => {
                return Err(FabricError::DegenerateInput("fault sense must be +1 or -1".into()))
            }
            s => f64::from(s),
        };
        let fvec = pair.fvec().canonical();
        let lvec = pair.lvec().canonical() * sign;
        Ok(Self { pair: Pair::from_orthogonal(fvec, lvec, pair.misfit()) })
    }

    /// Fault from a foliation, a lineation and a sense.
    pub fn from_features(fol: &Foliation, lin: &Lineation, sense: i8) -> Result<Self> {
        Self::from_pair(&Pair::from_features(fol, lin)?, sense)
    }

    /// Uniformly oriented random fault with random sense.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let pair = Pair::random(rng);
        Self { pair: Pair::from_orthogonal(pair.fvec(), pair.lvec(), 0.0) }
    }

    /// The underlying pair.
    #[inline]
    pub fn pair(&self) -> &Pair {
        &self.pair
    }

    /// Signed pole vector.
    #[inline]
    pub fn fvec(&self) -> Vector3 {
        self.pair.fvec()
    }

    /// Signed slip vector.
    #[inline]
    pub fn lvec(&self) -> Vector3 {
        self.pair.lvec()
    }

    #[inline]
    pub fn misfit(&self) -> f64 {
        self.pair.misfit()
    }

    pub fn fol(&self) -> Foliation {
        self.pair.fol()
    }

    pub fn lin(&self) -> Lineation {
        self.pair.lin()
    }

    /// Movement sense, +1 or -1.
    pub fn sense(&self) -> i8 {
        let (f, l) = (self.fvec(), self.lvec());
        let stored = f.cross(&l);
        let reference = f.canonical().cross(&l.canonical());
        if stored.dot(&reference) < 0.0 { -1 } else { 1 }
    }

    /// Shortening direction for a given P-T angle in degrees.
    pub fn p_vector(&self, ptangle: f64) -> Vector3 {
        let (s, c) = (ptangle / 2.0).to_radians().sin_cos();
        self.fvec() * c + self.lvec() * s
    }

    /// Extension direction for a given P-T angle in degrees.
    pub fn t_vector(&self, ptangle: f64) -> Vector3 {
        let (s, c) = (ptangle / 2.0).to_radians().sin_cos();
        self.fvec() * c - self.lvec() * s
    }

    /// P axis (shortening) for a 90 degree P-T angle.
    pub fn p(&self) -> Lineation {
        Lineation::from_unit(self.p_vector(90.0))
    }

    /// T axis (extension) for a 90 degree P-T angle.
    pub fn t(&self) -> Lineation {
        Lineation::from_unit(self.t_vector(90.0))
    }

    /// Intermediate (rotation) axis.
    pub fn rax(&self) -> Lineation {
        self.pair.rax()
    }

    /// Movement plane, containing the pole and the slip line.
    pub fn m(&self) -> Foliation {
        Foliation::from_unit(self.rax().vector())
    }

    /// Auxiliary plane normal to the slip line.
    pub fn d(&self) -> Foliation {
        Foliation::from_unit(self.lvec())
    }

    /// Same plane and slip with both stored vectors reversed.
    pub fn flipped(&self) -> Self {
        Self {
            pair: Pair::from_orthogonal(self.fvec().flip(), self.lvec().flip(), self.misfit()),
        }
    }

    /// Rotation about an axis by an angle in degrees.
    pub fn rotate(&self, axis: &Vector3, angle: f64) -> Result<Self> {
        Ok(Self { pair: self.pair.rotate(axis, angle)? })
    }

    /// Fault carried by a linear map.
    pub fn transform(&self, f: &DefGrad) -> Result<Self> {
        Ok(Self { pair: self.pair.transform(f)? })
    }

    /// Plane dip direction/dip and slip trend/plunge.
    pub fn geo(&self) -> (f64, f64, f64, f64) {
        self.pair.geo()
    }
}

impl PartialEq for Fault {
    fn eq(&self, other: &Self) -> bool {
        self.pair == other.pair && self.sense() == other.sense()
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (fazi, finc, lazi, linc) = self.geo();
        let sign = if self.sense() > 0 { '+' } else { '-' };
        write!(f, "F:{:.0}/{:.0}-{:.0}/{:.0} {}", fazi, finc, lazi, linc, sign)
    }
}

impl Feature for Fault {
    const KIND: FeatureKind = FeatureKind::Fault;

    fn rotate(&self, axis: &Vector3, angle: f64) -> Result<Self> {
        Fault::rotate(self, axis, angle)
    }

    fn transform(&self, f: &DefGrad) -> Result<Self> {
        Fault::transform(self, f)
    }

    fn to_record(&self) -> FeatureRecord {
        let (fazi, finc, lazi, linc) = self.geo();
        FeatureRecord::Fault { fazi, finc, lazi, linc, sense: self.sense() }
    }

    fn from_record(rec: &FeatureRecord) -> Result<Self> {
        match rec {
            FeatureRecord::Fault { fazi, finc, lazi, linc, sense } => {
                Fault::new(*fazi, *finc, *lazi, *linc, *sense)
            }
            other => Err(record::mismatch(FeatureKind::Fault, other.kind())),
        }
    }
}
