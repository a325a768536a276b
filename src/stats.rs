//! Fisher distribution: summary statistics and sampling.

use std::f64::consts::TAU;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::gp::{DefGrad, Vector3};
use crate::{FabricError, Result};

/// Fisher statistics of a set of unit vectors.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FisherStats {
    /// Precision parameter estimate, (n - 1) / (n - |R|).
    pub k: f64,
    /// Angular standard deviation in degrees, 81 / sqrt(k).
    pub csd: f64,
    /// Radius of the 95% confidence cone in degrees.
    pub a95: f64,
}

impl FisherStats {
    /// Statistics from sample count and resultant length.
    ///
    /// Fails for fewer than two samples. A perfectly parallel set gives an
    /// infinite `k` and zero `csd` and `a95`.
    pub fn from_resultant(n: usize, r: f64) -> Result<Self> {
        if n < 2 {
            return Err(FabricError::DegenerateInput(format!(
                "Fisher statistics need at least 2 samples, got {}",
                n
            )));
        }
        let nf = n as f64;
        let k = (nf - 1.0) / (nf - r);
        let csd = 81.0 / k.sqrt();
        let x = (nf - r) / r * (20f64.powf(1.0 / (nf - 1.0)) - 1.0);
        let a95 = (1.0 - x).clamp(-1.0, 1.0).acos().to_degrees();
        Ok(Self { k, csd, a95 })
    }
}

/// Cosine of a deviation angle drawn from a Fisher density of concentration
/// `kappa` about the pole.
fn fisher_cos<R: Rng + ?Sized>(rng: &mut R, kappa: f64) -> f64 {
    let u = 1.0 - rng.random::<f64>();
    if kappa < 1e-12 {
        return 2.0 * u - 1.0;
    }
    let w = 1.0 + (u + (1.0 - u) * (-2.0 * kappa).exp()).ln() / kappa;
    w.clamp(-1.0, 1.0)
}

/// Draws `n` unit vectors from a Fisher distribution about `mean`.
///
/// `kappa` of zero gives a uniform distribution on the sphere.
pub fn fisher_sample<R: Rng + ?Sized>(
    rng: &mut R,
    mean: &Vector3,
    kappa: f64,
    n: usize,
) -> Result<Vec<Vector3>> {
    if !(kappa >= 0.0) || !kappa.is_finite() {
        return Err(FabricError::DegenerateInput(format!(
            "Fisher concentration must be finite and non-negative, got {}",
            kappa
        )));
    }
    let rot = DefGrad::from_two_vectors(&Vector3::unit_z(), mean)?;
    let samples = (0..n)
        .map(|_| {
            let w = fisher_cos(rng, kappa);
            let s = (1.0 - w * w).max(0.0).sqrt();
            let phi = TAU * rng.random::<f64>();
            rot.apply(&Vector3::new(s * phi.cos(), s * phi.sin(), w))
        })
        .collect();
    Ok(samples)
}
