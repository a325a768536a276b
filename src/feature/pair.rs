//! Foliation with a lineation lying in it.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{axial, record, Feature, FeatureKind, FeatureRecord, Foliation, Lineation};
use crate::gp::{DefGrad, Vector3};
use crate::{FabricError, Result};

/// A plane and a line measured on it, corrected to be exactly orthogonal.
///
/// Field measurements rarely put the line exactly in the plane. On
/// construction both the pole and the line are rotated by half the
/// residual about their common perpendicular, and the residual is kept
/// as `misfit`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Pair {
    fvec: Vector3,
    lvec: Vector3,
    misfit: f64,
}

impl Pair {
    /// Pair from plane dip direction/dip and line trend/plunge in degrees.
    pub fn new(fazi: f64, finc: f64, lazi: f64, linc: f64) -> Result<Self> {
        Self::from_features(&Foliation::new(fazi, finc), &Lineation::new(lazi, linc))
    }

    /// Pair from a foliation and a lineation.
    pub fn from_features(fol: &Foliation, lin: &Lineation) -> Result<Self> {
        Self::from_vectors(&fol.pole(), &lin.vector())
    }

    /// Pair from a pole vector and a line vector, keeping their signs.
    pub(crate) fn from_vectors(f: &Vector3, l: &Vector3) -> Result<Self> {
        let f = f.normalized()?;
        let l = l.normalized()?;
        let misfit = 90.0 - axial::angle(&f, &l);
        let ax = f.cross(&l);
        if ax.is_zero() {
            return Err(FabricError::DegenerateInput(
                "lineation is parallel to the foliation pole".into(),
            ));
        }
        let ang = (l.angle(&f) - 90.0) / 2.0;
        Ok(Self {
            fvec: f.rotate(&ax, ang)?,
            lvec: l.rotate(&ax, -ang)?,
            misfit,
        })
    }

    /// Already orthogonal unit vectors; no correction applied.
    pub(crate) fn from_orthogonal(fvec: Vector3, lvec: Vector3, misfit: f64) -> Self {
        Self { fvec, lvec, misfit }
    }

    /// Uniformly oriented random pair.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let f = axial::random_unit(rng);
        let lvec = perpendicular_at(&f, 360.0 * rng.random::<f64>());
        Self { fvec: f, lvec, misfit: 0.0 }
    }

    /// Corrected pole vector.
    #[inline]
    pub fn fvec(&self) -> Vector3 {
        self.fvec
    }

    /// Corrected line vector.
    #[inline]
    pub fn lvec(&self) -> Vector3 {
        self.lvec
    }

    /// Angle in degrees the raw line lay off the plane.
    #[inline]
    pub fn misfit(&self) -> f64 {
        self.misfit
    }

    /// The plane.
    pub fn fol(&self) -> Foliation {
        Foliation::from_unit(self.fvec)
    }

    /// The line.
    pub fn lin(&self) -> Lineation {
        Lineation::from_unit(self.lvec)
    }

    /// Axis perpendicular to both, lvec × fvec.
    pub fn rax(&self) -> Lineation {
        Lineation::from_unit(self.lvec.cross(&self.fvec))
    }

    /// Plane dip direction/dip and line trend/plunge.
    pub fn geo(&self) -> (f64, f64, f64, f64) {
        let (fazi, finc) = self.fol().geo();
        let (lazi, linc) = self.lin().geo();
        (fazi, finc, lazi, linc)
    }

    /// Rotation about an axis by an angle in degrees.
    pub fn rotate(&self, axis: &Vector3, angle: f64) -> Result<Self> {
        Ok(Self {
            fvec: self.fvec.rotate(axis, angle)?,
            lvec: self.lvec.rotate(axis, angle)?,
            misfit: self.misfit,
        })
    }

    /// Pair carried by a linear map. Orthogonality survives because the
    /// pole goes through the inverse transpose.
    pub fn transform(&self, f: &DefGrad) -> Result<Self> {
        let inv_t = f.inverted()?.transposed();
        Ok(Self {
            fvec: inv_t.apply(&self.fvec).normalized()?,
            lvec: f.apply(&self.lvec).normalized()?,
            misfit: self.misfit,
        })
    }
}

/// Unit vector perpendicular to unit `f`, `angle` degrees about it from a
/// fixed reference.
pub(crate) fn perpendicular_at(f: &Vector3, angle: f64) -> Vector3 {
    let helper = if f.x().abs() < 0.9 { Vector3::unit_x() } else { Vector3::unit_y() };
    let c = f.cross(&helper);
    let base = c / c.magnitude();
    let (s, co) = angle.to_radians().sin_cos();
    base * co + f.cross(&base) * s
}

impl PartialEq for Pair {
    fn eq(&self, other: &Self) -> bool {
        axial::coincide(&self.fvec, &other.fvec) && axial::coincide(&self.lvec, &other.lvec)
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (fazi, finc, lazi, linc) = self.geo();
        write!(f, "P:{:.0}/{:.0}-{:.0}/{:.0}", fazi, finc, lazi, linc)
    }
}

impl Feature for Pair {
    const KIND: FeatureKind = FeatureKind::Pair;

    fn rotate(&self, axis: &Vector3, angle: f64) -> Result<Self> {
        Pair::rotate(self, axis, angle)
    }

    fn transform(&self, f: &DefGrad) -> Result<Self> {
        Pair::transform(self, f)
    }

    fn to_record(&self) -> FeatureRecord {
        let (fazi, finc, lazi, linc) = self.geo();
        FeatureRecord::Pair { fazi, finc, lazi, linc }
    }

    fn from_record(rec: &FeatureRecord) -> Result<Self> {
        match rec {
            FeatureRecord::Pair { fazi, finc, lazi, linc } => Pair::new(*fazi, *finc, *lazi, *linc),
            other => Err(record::mismatch(FeatureKind::Pair, other.kind())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_pair_has_no_misfit() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let p = Pair::random(&mut rng);
            assert_relative_eq!(p.misfit(), 0.0);
            assert_relative_eq!(p.fvec().angle(&p.lvec()), 90.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_correction_is_symmetric() {
        let p = Pair::new(90.0, 30.0, 110.0, 40.0).unwrap();
        let raw_f = Foliation::new(90.0, 30.0).pole();
        let raw_l = Lineation::new(110.0, 40.0).vector();
        assert_relative_eq!(p.fvec().angle(&p.lvec()), 90.0, epsilon = 1e-9);
        assert_relative_eq!(raw_f.angle(&p.fvec()), raw_l.angle(&p.lvec()), epsilon = 1e-9);
        assert_relative_eq!(2.0 * raw_f.angle(&p.fvec()), p.misfit().abs(), epsilon = 1e-9);
    }

    #[test]
    fn test_rotation_keeps_orthogonality() {
        let mut rng = StdRng::seed_from_u64(5);
        let p = Pair::random(&mut rng);
        let pr = p.rotate(&Lineation::new(45.0, 45.0).vector(), 120.0).unwrap();
        assert_relative_eq!(pr.fvec().angle(&pr.lvec()), 90.0, epsilon = 1e-9);
    }

    #[test]
    fn test_parallel_inputs_fail() {
        let s = Foliation::new(0.0, 0.0);
        let l = Lineation::new(0.0, 90.0);
        assert!(matches!(Pair::from_features(&s, &l), Err(FabricError::DegenerateInput(_))));
    }

    #[test]
    fn test_display_and_rax() {
        let p = Pair::new(120.0, 40.0, 120.0, 40.0).unwrap();
        assert_eq!(p.to_string(), "P:120/40-120/40");
        assert_relative_eq!(p.rax().angle(&p.fol()), 90.0, epsilon = 1e-9);
        assert_relative_eq!(p.rax().angle(&p.lin()), 90.0, epsilon = 1e-9);
        assert!(p.fol().is_containing(&p.lin()));
    }
}
