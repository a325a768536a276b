//! Counting kernels for spherical density estimates.
//!
//! Every kernel takes the cosine of the angle between a grid node and a
//! datum and returns that datum's contribution to the node count. Counts
//! are expressed in standard deviations above a uniform distribution.

use super::DensityMethod;

/// Area fraction of the Schmidt counting circle.
const SCHMIDT_AREA: f64 = 0.01;

/// A kernel prepared for `n` data at a given bandwidth.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Kernel {
    method: DensityMethod,
    n: f64,
    /// Cosine of the counting radius (Kamb family).
    radius: f64,
    /// Weight scale (exponential concentration, or linear/square factor).
    factor: f64,
    /// Expected standard deviation of a node count.
    units: f64,
}

impl Kernel {
    /// `sigma` is the bandwidth in standard deviations, `c` the exponential
    /// concentration constant.
    pub(crate) fn new(method: DensityMethod, n: usize, sigma: f64, c: f64) -> Self {
        let n = n as f64;
        let s2 = sigma * sigma;
        let radius = 1.0 - s2 / (n + s2);
        let kamb_units = (n * radius * (1.0 - radius)).sqrt();
        let (factor, units) = match method {
            DensityMethod::ExpKamb => {
                let f = c * (1.0 + n / s2);
                (f, (n * (f / 2.0 - 1.0) / (f * f)).sqrt())
            }
            DensityMethod::LinearKamb => (2.0 / (1.0 - radius), kamb_units),
            DensityMethod::SquareKamb => (3.0 / (1.0 - radius).powi(2), kamb_units),
            DensityMethod::Kamb => (1.0, kamb_units),
            DensityMethod::Schmidt => (1.0, n * SCHMIDT_AREA),
        };
        Self { method, n, radius, factor, units }
    }

    /// Contribution of one datum at cosine distance `cos`.
    pub(crate) fn weight(&self, cos: f64) -> f64 {
        match self.method {
            DensityMethod::ExpKamb => (self.factor * (cos - 1.0)).exp(),
            DensityMethod::LinearKamb if cos >= self.radius => self.factor * (cos - self.radius),
            DensityMethod::SquareKamb if cos >= self.radius => {
                self.factor * (cos - self.radius).powi(2)
            }
            DensityMethod::Kamb if cos >= self.radius => 1.0,
            DensityMethod::Schmidt => {
                let hit = if 1.0 - cos <= SCHMIDT_AREA { 1.0 } else { 0.0 };
                hit + 0.5 / self.n
            }
            _ => 0.0,
        }
    }

    /// Turns a raw node count into standard deviations.
    pub(crate) fn normalize(&self, count: f64) -> f64 {
        if self.units > 0.0 {
            (count - 0.5) / self.units
        } else {
            0.0
        }
    }
}
