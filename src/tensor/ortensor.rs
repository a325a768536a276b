//! Orientation tensor of a set of directions.

use std::fmt;

use nalgebra::{Matrix3, SymmetricEigen};
use serde::{Deserialize, Serialize};

use super::EllipsoidShape;
use crate::feature::{FeatureSet, Foliation, Lineation, Orientation};
use crate::gp::Vector3;
use crate::precision;
use crate::{FabricError, Result};

/// Fabric class from point (L) to girdle (S).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FabricKind {
    L,
    LLS,
    LS,
    LSS,
    S,
}

impl fmt::Display for FabricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FabricKind::L => "L",
            FabricKind::LLS => "LLS",
            FabricKind::LS => "LS",
            FabricKind::LSS => "LSS",
            FabricKind::S => "S",
        };
        f.write_str(name)
    }
}

/// Normalized sum of outer products of unit vectors.
///
/// Eigenvalues are sorted descending and sum to one; values below
/// [`precision::LOG_EPSILON`] are reported as exactly zero. Eigenvectors
/// are returned in the same order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrientationTensor {
    matrix: [[f64; 3]; 3],
    eigenvalues: [f64; 3],
    eigenvectors: [Vector3; 3],
    n: usize,
}

impl OrientationTensor {
    /// Tensor of the given vectors; each is normalized first.
    pub fn from_vectors(vectors: &[Vector3]) -> Result<Self> {
        if vectors.is_empty() {
            return Err(FabricError::DegenerateInput(
                "orientation tensor of an empty set".into(),
            ));
        }
        let mut m = Matrix3::<f64>::zeros();
        for v in vectors {
            let u: nalgebra::Vector3<f64> = v.normalized()?.into();
            m += u * u.transpose();
        }
        m /= vectors.len() as f64;

        let eigen = SymmetricEigen::new(m);
        let mut pairs: Vec<(f64, Vector3)> = eigen
            .eigenvalues
            .iter()
            .enumerate()
            .map(|(i, &val)| {
                // solver noise around zero
                let val = if val < precision::LOG_EPSILON { 0.0 } else { val };
                (val, eigen.eigenvectors.column(i).into_owned().into())
            })
            .collect();
        pairs.sort_by(|a, b| b.0.total_cmp(&a.0));

        let mut matrix = [[0.0; 3]; 3];
        for (i, row) in matrix.iter_mut().enumerate() {
            for (j, value) in row.iter_mut().enumerate() {
                *value = m[(i, j)];
            }
        }

        Ok(Self {
            matrix,
            eigenvalues: [pairs[0].0, pairs[1].0, pairs[2].0],
            eigenvectors: [pairs[0].1, pairs[1].1, pairs[2].1],
            n: vectors.len(),
        })
    }

    /// Tensor of a feature set.
    pub fn from_set<T: Orientation>(set: &FeatureSet<T>) -> Result<Self> {
        Self::from_vectors(&set.vectors())
    }

    /// The symmetric matrix, row-major.
    pub fn matrix(&self) -> &[[f64; 3]; 3] {
        &self.matrix
    }

    /// Number of vectors summed.
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// λ1 >= λ2 >= λ3.
    pub fn eigenvalues(&self) -> [f64; 3] {
        self.eigenvalues
    }

    /// Unit eigenvectors matching `eigenvalues`.
    pub fn eigenvectors(&self) -> [Vector3; 3] {
        self.eigenvectors
    }

    pub fn eigenlins(&self) -> [Lineation; 3] {
        self.eigenvectors.map(Lineation::from_unit)
    }

    /// Planes normal to the eigenvectors.
    pub fn eigenfols(&self) -> [Foliation; 3] {
        self.eigenvectors.map(Foliation::from_unit)
    }

    /// Vollmer point index, λ1 - λ2.
    pub fn p(&self) -> f64 {
        self.eigenvalues[0] - self.eigenvalues[1]
    }

    /// Vollmer girdle index, 2(λ2 - λ3).
    pub fn g(&self) -> f64 {
        2.0 * (self.eigenvalues[1] - self.eigenvalues[2])
    }

    /// Vollmer random index, 3λ3.
    pub fn r(&self) -> f64 {
        3.0 * self.eigenvalues[2]
    }

    /// Vollmer cylindricity, P + G.
    pub fn b(&self) -> f64 {
        self.p() + self.g()
    }

    /// Lisle intensity, 7.5 Σ(λi - 1/3)².
    pub fn intensity(&self) -> f64 {
        7.5 * self.eigenvalues.iter().map(|l| (l - 1.0 / 3.0).powi(2)).sum::<f64>()
    }

    /// Mean angular deviation of a cluster about E1, degrees.
    pub fn mad_l(&self) -> f64 {
        let [l1, l2, l3] = self.eigenvalues;
        ((l2 + l3) / l1).sqrt().atan().to_degrees()
    }

    /// Mean angular deviation of a girdle from the plane normal to E3, degrees.
    pub fn mad_p(&self) -> f64 {
        let [l1, l2, l3] = self.eigenvalues;
        (l3 / (l1 + l2)).sqrt().atan().to_degrees()
    }

    /// `mad_l` for clusters and `mad_p` for girdles.
    pub fn mad(&self) -> f64 {
        if self.shape().shape() > 1.0 { self.mad_l() } else { self.mad_p() }
    }

    /// Shape indices of the ellipsoid with semi-axes sqrt(λi).
    pub fn shape(&self) -> EllipsoidShape {
        EllipsoidShape::from_stretches(self.eigenvalues.map(f64::sqrt))
    }

    /// Fabric class from the Woodcock shape parameter K.
    ///
    /// Class limits K = 7, 23/17, 17/23 and 1/7 correspond to Lode values
    /// of -0.75, -0.15, 0.15 and 0.75. An isotropic tensor has no defined
    /// K and is classed `LS`.
    pub fn kind(&self) -> FabricKind {
        let shape = self.shape();
        let k = shape.shape();
        if k.is_nan() || shape.strength() < precision::CONFUSION {
            FabricKind::LS
        } else if k > 7.0 {
            FabricKind::L
        } else if k > 23.0 / 17.0 {
            FabricKind::LLS
        } else if k > 17.0 / 23.0 {
            FabricKind::LS
        } else if k > 1.0 / 7.0 {
            FabricKind::LSS
        } else {
            FabricKind::S
        }
    }
}
