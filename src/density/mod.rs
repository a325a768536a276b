//! Density fields on one hemisphere.
//!
//! A [`DensityGrid`] owns a fixed set of near-uniform nodes and one value per
//! node. Values are recomputed from a feature set by Kamb-style counting;
//! the projected nodes and values are what a contouring routine consumes.

use serde::{Deserialize, Serialize};

use crate::config::DensityConfig;
use crate::feature::{FeatureSet, Orientation};
use crate::gp::Vector3;
use crate::projection::{Antipodal, Hemisphere, Projection};
use crate::{FabricError, Result};

mod grid;
mod kernel;

pub use grid::uniform_points;

use kernel::Kernel;

/// Node generation scheme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridKind {
    /// Generalized spiral set
    #[default]
    Gss,
    /// Spherical Fibonacci set
    Sfs,
}

/// Counting kernel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DensityMethod {
    /// Exponential smoothing (Vollmer 1995)
    #[default]
    ExpKamb,
    LinearKamb,
    SquareKamb,
    /// Plain Kamb counting circle
    Kamb,
    /// One percent counting circle
    Schmidt,
}

/// Projected nodes with their values, ready for contouring.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ContourData {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub values: Vec<f64>,
}

/// Sampling grid over one hemisphere with one value per node.
#[derive(Clone, Debug)]
pub struct DensityGrid {
    config: DensityConfig,
    grid: Vec<Vector3>,
    values: Vec<f64>,
    trimmed: bool,
    // values are symmetric under v -> -v
    axial: bool,
}

impl DensityGrid {
    pub fn new(config: &DensityConfig) -> Result<Self> {
        if config.npoints == 0 {
            return Err(FabricError::Config("npoints must be positive".into()));
        }
        let mut grid = uniform_points(config.grid, config.npoints, true);
        if config.hemisphere == Hemisphere::Upper {
            grid.iter_mut().for_each(|v| *v = v.flip());
        }
        log::debug!(
            "Density grid: {} nodes ({:?}, {:?} hemisphere)",
            grid.len(),
            config.grid,
            config.hemisphere
        );
        Ok(Self {
            config: config.clone(),
            values: vec![0.0; grid.len()],
            grid,
            trimmed: false,
            axial: false,
        })
    }

    pub fn config(&self) -> &DensityConfig {
        &self.config
    }

    pub fn kind(&self) -> GridKind {
        self.config.grid
    }

    /// Node directions, all in the configured hemisphere.
    pub fn grid(&self) -> &[Vector3] {
        &self.grid
    }

    /// One value per node, parallel to [`grid`](Self::grid).
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.grid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }

    /// Recomputes the values from `set`, in standard deviations above a
    /// uniform distribution.
    ///
    /// `sigma` defaults to the configured bandwidth. With `trim` negative
    /// values are clamped to zero.
    pub fn calculate_density<T: Orientation>(
        &mut self,
        set: &FeatureSet<T>,
        sigma: Option<f64>,
        trim: bool,
    ) -> Result<()> {
        if set.is_empty() {
            return Err(FabricError::DegenerateInput("density of an empty set".into()));
        }
        let sigma = sigma.unwrap_or(self.config.sigma);
        if !(sigma > 0.0) {
            return Err(FabricError::DegenerateInput(format!("bandwidth {} must be positive", sigma)));
        }
        let data = set
            .iter()
            .map(|o| o.vector().normalized())
            .collect::<Result<Vec<_>>>()?;
        let kernel = Kernel::new(self.config.method, data.len(), sigma, self.config.concentration_factor);

        for (value, node) in self.values.iter_mut().zip(&self.grid) {
            let count: f64 = data
                .iter()
                .map(|d| {
                    let cos = node.dot(d);
                    kernel.weight(if T::AXIAL { cos.abs() } else { cos })
                })
                .sum();
            let v = kernel.normalize(count);
            *value = if trim { v.max(0.0) } else { v };
        }
        self.trimmed = trim;
        self.axial = T::AXIAL;
        log::debug!(
            "Density of {} items: {:?}, sigma {}, max {:.3}",
            data.len(),
            self.config.method,
            sigma,
            self.values.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
        );
        Ok(())
    }

    /// Fills the values from a function of the node direction.
    ///
    /// The values are treated as polar when contoured.
    pub fn apply_func<F: Fn(&Vector3) -> f64>(&mut self, func: F) {
        for (value, node) in self.values.iter_mut().zip(&self.grid) {
            *value = func(node);
        }
        self.trimmed = false;
        self.axial = false;
    }

    /// Node and value of the maximum.
    pub fn max_at(&self) -> Option<(Vector3, f64)> {
        self.extreme(|a, b| a > b)
    }

    /// Node and value of the minimum.
    pub fn min_at(&self) -> Option<(Vector3, f64)> {
        self.extreme(|a, b| a < b)
    }

    fn extreme(&self, better: impl Fn(f64, f64) -> bool) -> Option<(Vector3, f64)> {
        self.grid
            .iter()
            .zip(&self.values)
            .filter(|(_, v)| !v.is_nan())
            .fold(None, |best, (node, &v)| match best {
                Some((_, b)) if !better(v, b) => best,
                _ => Some((*node, v)),
            })
    }

    /// Projected nodes with their values.
    ///
    /// Axial values may be folded onto either hemisphere. Polar values are
    /// only drawn where they were computed: the projection must plot the
    /// grid's hemisphere, and nodes a rotated net carries out of it are
    /// left out. After a trimmed calculation, nodes that fall outside the
    /// primitive are left out as well.
    pub fn contour_data(&self, proj: &Projection) -> Result<ContourData> {
        if !self.axial && proj.hemisphere() != self.config.hemisphere {
            return Err(FabricError::Config(format!(
                "density grid covers the {:?} hemisphere, projection plots the {:?}",
                self.config.hemisphere,
                proj.hemisphere()
            )));
        }
        let mut out = ContourData::default();
        for (node, &v) in self.grid.iter().zip(&self.values) {
            let p = match proj.project_antipodal(node)? {
                Antipodal { lower: Some(p), .. } => p,
                Antipodal { upper: Some(p), .. } if self.axial => p,
                _ => continue,
            };
            if self.trimmed && p.radius() > 1.0 {
                continue;
            }
            out.x.push(p.x);
            out.y.push(p.y);
            out.values.push(v);
        }
        Ok(out)
    }
}
