//! Ordered homogeneous collections of features.

use std::fmt;
use std::ops::Index;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{axial, Fault, Feature, Foliation, Lineation, Orientation, Pair, SetRecord};
use crate::density::{self, GridKind};
use crate::gp::{DefGrad, Vector3};
use crate::stats::{self, FisherStats};
use crate::tensor::OrientationTensor;
use crate::{FabricError, Result};

/// A named ordered collection of features of one type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet<T> {
    name: String,
    items: Vec<T>,
}

impl<T> Default for FeatureSet<T> {
    fn default() -> Self {
        Self { name: String::new(), items: Vec::new() }
    }
}

impl<T: Feature> FeatureSet<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { name: String::new(), items }
    }

    /// Sets the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Every member rotated about an axis by an angle in degrees.
    pub fn rotate(&self, axis: &Vector3, angle: f64) -> Result<Self> {
        self.map_members(|f| f.rotate(axis, angle))
    }

    /// Every member carried by a linear map.
    pub fn transform(&self, f: &DefGrad) -> Result<Self> {
        self.map_members(|item| item.transform(f))
    }

    fn map_members<F>(&self, op: F) -> Result<Self>
    where
        F: Fn(&T) -> Result<T>,
    {
        let items = self.items.iter().map(op).collect::<Result<Vec<_>>>()?;
        Ok(Self { name: self.name.clone(), items })
    }

    /// Builds a set from records; the set type must match `T`.
    pub fn from_records(record: &SetRecord) -> Result<Self> {
        if record.datatype != T::KIND {
            return Err(FabricError::TypeMismatch(format!(
                "expected a set of {}, found a set of {}",
                T::KIND,
                record.datatype
            )));
        }
        let items = record.collection.iter().map(T::from_record).collect::<Result<Vec<_>>>()?;
        Ok(Self { name: record.name.clone(), items })
    }

    pub fn to_record(&self) -> SetRecord {
        SetRecord {
            datatype: T::KIND,
            name: self.name.clone(),
            collection: self.items.iter().map(Feature::to_record).collect(),
        }
    }
}

impl<T: Orientation> FeatureSet<T> {
    /// Set from parallel arrays of azimuths and inclinations.
    pub fn from_geo(azimuths: &[f64], inclinations: &[f64]) -> Result<Self> {
        if azimuths.len() != inclinations.len() {
            return Err(FabricError::TypeMismatch(format!(
                "{} azimuths but {} inclinations",
                azimuths.len(),
                inclinations.len()
            )));
        }
        let items = azimuths
            .iter()
            .zip(inclinations)
            .map(|(&a, &i)| T::from_geo(a, i))
            .collect();
        Ok(Self::new(items))
    }

    /// Defining vectors of all members.
    pub fn vectors(&self) -> Vec<Vector3> {
        self.items.iter().map(Orientation::vector).collect()
    }

    /// Vector sum of the unit directions.
    ///
    /// Axial members are first flipped into the half-space of the
    /// principal orientation-tensor axis, so opposite signs do not cancel.
    pub fn resultant(&self) -> Vector3 {
        let units: Vec<Vector3> =
            self.vectors().iter().filter_map(|v| v.normalized().ok()).collect();
        if !T::AXIAL {
            return units.into_iter().sum();
        }
        let Ok(ot) = OrientationTensor::from_vectors(&units) else {
            return Vector3::zero();
        };
        let reference = ot.eigenvectors()[0];
        units
            .into_iter()
            .map(|u| if u.dot(&reference) < 0.0 { -u } else { u })
            .sum()
    }

    /// Mean orientation, the direction of the resultant.
    pub fn mean(&self) -> Result<T> {
        T::from_vector(&self.resultant())
    }

    /// Degree of preferred orientation, 100 (2|R| - n) / n.
    ///
    /// Like [`var`](Self::var) and [`delta`](Self::delta), NaN for an empty set.
    pub fn rdegree(&self) -> f64 {
        let n = self.len() as f64;
        100.0 * (2.0 * self.resultant().magnitude() - n) / n
    }

    /// Spherical variance, 1 - |R| / n.
    pub fn var(&self) -> f64 {
        1.0 - self.resultant().magnitude() / self.len() as f64
    }

    /// Cone angle containing about 63% of the data, acos(|R| / n), degrees.
    pub fn delta(&self) -> f64 {
        (self.resultant().magnitude() / self.len() as f64).clamp(-1.0, 1.0).acos().to_degrees()
    }

    pub fn fisher_statistics(&self) -> Result<FisherStats> {
        FisherStats::from_resultant(self.len(), self.resultant().magnitude())
    }

    pub fn ortensor(&self) -> Result<OrientationTensor> {
        OrientationTensor::from_set(self)
    }

    /// Angles in degrees between each member and `other`.
    pub fn angle<O: Orientation>(&self, other: &O) -> Vec<f64> {
        let o = other.vector();
        self.items
            .iter()
            .map(|item| {
                let v = item.vector();
                if T::AXIAL || O::AXIAL { axial::angle(&v, &o) } else { v.angle(&o) }
            })
            .collect()
    }

    /// Set rotated so the orientation-tensor axes E1, E2, E3 lie on x, y, z.
    ///
    /// For polar sets E1 is taken on the side of the resultant, so it lands on +x.
    pub fn centered(&self) -> Result<Self> {
        let [e1, e2, e3] = self.ortensor()?.eigenvectors();
        let e1 = if !T::AXIAL && e1.dot(&self.resultant()) < 0.0 { -e1 } else { e1 };
        let e3 = if e1.cross(&e2).dot(&e3) < 0.0 { -e3 } else { e3 };
        let rot = DefGrad::from_rows([e1.to_array(), e2.to_array(), e3.to_array()]);
        self.transform(&rot)
    }

    /// Sample of `n` members from a Fisher distribution about `mean`.
    pub fn random_fisher<R: Rng + ?Sized>(
        rng: &mut R,
        mean: &T,
        kappa: f64,
        n: usize,
    ) -> Result<Self> {
        let items = stats::fisher_sample(rng, &mean.vector(), kappa, n)?
            .iter()
            .map(T::from_vector)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(items))
    }

    /// `n` members spread evenly by the generalized spiral.
    ///
    /// Axial sets cover the lower hemisphere, polar sets the whole sphere.
    pub fn uniform_gss(n: usize) -> Result<Self> {
        Self::from_points(density::uniform_points(GridKind::Gss, n, T::AXIAL))
    }

    /// `n` members spread evenly by the spherical Fibonacci lattice.
    pub fn uniform_sfs(n: usize) -> Result<Self> {
        Self::from_points(density::uniform_points(GridKind::Sfs, n, T::AXIAL))
    }

    fn from_points(points: Vec<Vector3>) -> Result<Self> {
        let items = points.iter().map(T::from_vector).collect::<Result<Vec<_>>>()?;
        Ok(Self::new(items))
    }
}

impl FeatureSet<Pair> {
    pub fn fol(&self) -> FeatureSet<Foliation> {
        self.derive(Pair::fol)
    }

    pub fn lin(&self) -> FeatureSet<Lineation> {
        self.derive(Pair::lin)
    }

    pub fn rax(&self) -> FeatureSet<Lineation> {
        self.derive(Pair::rax)
    }

    /// Misfit angle of every pair.
    pub fn misfit(&self) -> Vec<f64> {
        self.items.iter().map(Pair::misfit).collect()
    }
}

impl FeatureSet<Fault> {
    pub fn fol(&self) -> FeatureSet<Foliation> {
        self.derive(Fault::fol)
    }

    pub fn lin(&self) -> FeatureSet<Lineation> {
        self.derive(Fault::lin)
    }

    /// P axes.
    pub fn p(&self) -> FeatureSet<Lineation> {
        self.derive(Fault::p)
    }

    /// T axes.
    pub fn t(&self) -> FeatureSet<Lineation> {
        self.derive(Fault::t)
    }

    pub fn rax(&self) -> FeatureSet<Lineation> {
        self.derive(Fault::rax)
    }

    pub fn sense(&self) -> Vec<i8> {
        self.items.iter().map(Fault::sense).collect()
    }
}

impl<T> FeatureSet<T> {
    fn derive<U, F: Fn(&T) -> U>(&self, f: F) -> FeatureSet<U> {
        FeatureSet { name: self.name.clone(), items: self.items.iter().map(f).collect() }
    }
}

impl<T> Index<usize> for FeatureSet<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<'a, T> IntoIterator for &'a FeatureSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> IntoIterator for FeatureSet<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<T> FromIterator<T> for FeatureSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self { name: String::new(), items: iter.into_iter().collect() }
    }
}

impl<T: fmt::Display> fmt::Display for FeatureSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = if self.name.is_empty() { "Default" } else { &self.name };
        write!(f, "{} ({} items)", label, self.items.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_polar_resultant() {
        let g: FeatureSet<Vector3> =
            FeatureSet::from_geo(&[45.0, 135.0, 225.0, 315.0], &[45.0; 4]).unwrap();
        assert_eq!(g.mean().unwrap().normalized().unwrap(), Vector3::from_geo(0.0, 90.0));
        assert_relative_eq!(g.resultant().magnitude(), 8f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!((g.rdegree() / 100.0 + 1.0).powi(2), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_axial_resultant_ignores_sign() {
        let g: FeatureSet<Lineation> =
            FeatureSet::from_geo(&[45.0, 135.0, 225.0, 315.0], &[45.0; 4]).unwrap();
        let flipped: FeatureSet<Lineation> = g.iter().map(|l| l.flip()).collect();
        assert_relative_eq!(g.resultant().magnitude(), 8f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(flipped.resultant().magnitude(), 8f64.sqrt(), epsilon = 1e-12);
        assert_eq!(g.mean().unwrap(), Lineation::new(0.0, 90.0));
    }

    #[test]
    fn test_geo_length_mismatch() {
        let r = FeatureSet::<Lineation>::from_geo(&[1.0, 2.0], &[3.0]);
        assert!(matches!(r, Err(FabricError::TypeMismatch(_))));
    }

    #[test]
    fn test_record_type_mismatch() {
        let set = FeatureSet::new(vec![Foliation::new(10.0, 10.0)]);
        let rec = set.to_record();
        assert!(matches!(
            FeatureSet::<Lineation>::from_records(&rec),
            Err(FabricError::TypeMismatch(_))
        ));
        assert_eq!(FeatureSet::<Foliation>::from_records(&rec).unwrap(), set);
    }

    #[test]
    fn test_fault_set_axes() {
        let set = FeatureSet::new(vec![
            Fault::new(150.0, 60.0, 150.0, 60.0, 1).unwrap(),
            Fault::new(150.0, 30.0, 150.0, 30.0, -1).unwrap(),
        ])
        .with_name("faults");
        assert_eq!(set.t()[0], Lineation::new(150.0, 15.0));
        assert_eq!(set.p()[1], Lineation::new(330.0, 15.0));
        assert_eq!(set.sense(), vec![1, -1]);
        assert_eq!(set.p().name(), "faults");
    }

    #[test]
    fn test_dispersion_of_parallel_set() {
        let g = FeatureSet::new(vec![Lineation::new(10.0, 10.0); 4]);
        assert_relative_eq!(g.var(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(g.delta(), 0.0, epsilon = 1e-5);
        assert_relative_eq!(g.rdegree(), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_fisher_sample_size() {
        let mut rng = StdRng::seed_from_u64(1);
        let g = FeatureSet::random_fisher(&mut rng, &Lineation::new(40.0, 50.0), 20.0, 100)
            .unwrap();
        assert_eq!(g.len(), 100);
        let st = g.fisher_statistics().unwrap();
        assert!(st.k > 5.0);
    }
}
