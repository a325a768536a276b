//! Shape and strength of an ellipsoid given by its principal stretches.

use serde::{Deserialize, Serialize};

use crate::precision;

/// Shape indices computed from principal stretches S1 >= S2 >= S3.
///
/// Zero stretches are clamped to [`precision::LOG_EPSILON`] before any
/// logarithm is taken; `degenerate` records that this happened.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EllipsoidShape {
    /// Principal stretches after clamping, descending.
    pub stretches: [f64; 3],
    /// True if any stretch had to be clamped.
    pub degenerate: bool,
}

impl EllipsoidShape {
    /// Sorts the stretches descending and clamps them away from zero.
    pub fn from_stretches(stretches: [f64; 3]) -> Self {
        let mut s = stretches;
        s.sort_by(|a, b| b.total_cmp(a));
        let mut degenerate = false;
        for v in s.iter_mut() {
            if !(*v >= precision::LOG_EPSILON) {
                *v = precision::LOG_EPSILON;
                degenerate = true;
            }
        }
        if degenerate {
            log::warn!(
                "Ellipsoid stretches {:?} clamped to {:e} for log-ratio indices",
                stretches,
                precision::LOG_EPSILON
            );
        }
        Self { stretches: s, degenerate }
    }

    fn logs(&self) -> [f64; 3] {
        [self.stretches[0].ln(), self.stretches[1].ln(), self.stretches[2].ln()]
    }

    /// Flinn ratio S1/S2.
    pub fn rxy(&self) -> f64 {
        self.stretches[0] / self.stretches[1]
    }

    /// Flinn ratio S2/S3.
    pub fn ryz(&self) -> f64 {
        self.stretches[1] / self.stretches[2]
    }

    /// Flinn's k = (Rxy - 1) / (Ryz - 1).
    pub fn k(&self) -> f64 {
        (self.rxy() - 1.0) / (self.ryz() - 1.0)
    }

    /// Flinn's d, distance from the origin of the Flinn plot.
    pub fn d(&self) -> f64 {
        (self.rxy() - 1.0).hypot(self.ryz() - 1.0)
    }

    /// Ramsay's K = ln Rxy / ln Ryz.
    pub fn big_k(&self) -> f64 {
        self.rxy().ln() / self.ryz().ln()
    }

    /// Ramsay's D = sqrt(ln² Rxy + ln² Ryz).
    pub fn big_d(&self) -> f64 {
        self.rxy().ln().hypot(self.ryz().ln())
    }

    /// Woodcock shape ln(λ1/λ2) / ln(λ2/λ3) with λ = S².
    pub fn shape(&self) -> f64 {
        let [e1, e2, e3] = self.logs();
        (e1 - e2) / (e2 - e3)
    }

    /// Woodcock strength ln(λ1/λ3) with λ = S².
    pub fn strength(&self) -> f64 {
        let [e1, _, e3] = self.logs();
        2.0 * (e1 - e3)
    }

    /// Jelinek's corrected degree of anisotropy.
    pub fn pj(&self) -> f64 {
        let e = self.logs();
        let em = e.iter().sum::<f64>() / 3.0;
        let ss: f64 = e.iter().map(|x| (x - em).powi(2)).sum();
        (2.0 * ss).sqrt().exp()
    }

    /// Jelinek's shape parameter, -1 prolate to +1 oblate.
    pub fn tj(&self) -> f64 {
        let [e1, e2, e3] = self.logs();
        (2.0 * e2 - e1 - e3) / (e1 - e3)
    }

    /// Natural octahedral shear strain.
    pub fn goct(&self) -> f64 {
        let [e1, e2, e3] = self.logs();
        2.0 * ((e1 - e2).powi(2) + (e2 - e3).powi(2) + (e1 - e3).powi(2)).sqrt() / 3.0
    }

    /// Natural octahedral unit shear.
    pub fn eoct(&self) -> f64 {
        3f64.sqrt() * self.goct() / 2.0
    }

    /// Lode's parameter, -1 for constriction and +1 for flattening.
    pub fn lode(&self) -> f64 {
        self.tj()
    }
}
