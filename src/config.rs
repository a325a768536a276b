//! Explicit configuration values for projections and density grids.
//!
//! Nothing here is global: a config value is built (or parsed from TOML)
//! by the caller and handed to [`Projection::new`](crate::Projection::new)
//! or [`DensityGrid::new`](crate::DensityGrid::new).

use serde::{Deserialize, Serialize};

use crate::density::{DensityMethod, GridKind};
use crate::projection::{Hemisphere, ProjectionKind};
use crate::{FabricError, Result};

mod defaults {
    pub fn clip_pole() -> f64 {
        20.0
    }

    pub fn gridstep() -> f64 {
        15.0
    }

    pub fn resolution() -> usize {
        361
    }

    pub fn npoints() -> usize {
        2000
    }

    pub fn sigma() -> f64 {
        3.0
    }

    pub fn concentration_factor() -> f64 {
        2.0
    }
}

/// Stereonet projection settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Equal-area or equal-angle
    #[serde(default)]
    pub kind: ProjectionKind,

    /// Hemisphere plotted
    #[serde(default)]
    pub hemisphere: Hemisphere,

    /// Rotate data into the net frame instead of rotating the net
    #[serde(default)]
    pub rotate_data: bool,

    /// Net orientation as a pair: plane dip direction/dip, line trend/plunge
    #[serde(default)]
    pub grid_position: [f64; 4],

    /// Radius of the hole around the net poles (degrees)
    #[serde(default = "defaults::clip_pole")]
    pub clip_pole: f64,

    /// Spacing of net circles (degrees)
    #[serde(default = "defaults::gridstep")]
    pub gridstep: f64,

    /// Samples per full circle
    #[serde(default = "defaults::resolution")]
    pub resolution: usize,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            kind: ProjectionKind::default(),
            hemisphere: Hemisphere::default(),
            rotate_data: false,
            grid_position: [0.0; 4],
            clip_pole: defaults::clip_pole(),
            gridstep: defaults::gridstep(),
            resolution: defaults::resolution(),
        }
    }
}

/// Density grid settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DensityConfig {
    /// Number of grid nodes on the hemisphere
    #[serde(default = "defaults::npoints")]
    pub npoints: usize,

    /// Node generation scheme
    #[serde(default)]
    pub grid: GridKind,

    /// Hemisphere the nodes cover; must match the projection for polar data
    #[serde(default)]
    pub hemisphere: Hemisphere,

    /// Smoothing kernel
    #[serde(default)]
    pub method: DensityMethod,

    /// Default kernel bandwidth in standard deviations
    #[serde(default = "defaults::sigma")]
    pub sigma: f64,

    /// Constant c in the exponential kernel concentration c (1 + n / sigma²)
    #[serde(default = "defaults::concentration_factor")]
    pub concentration_factor: f64,
}

impl Default for DensityConfig {
    fn default() -> Self {
        Self {
            npoints: defaults::npoints(),
            grid: GridKind::default(),
            hemisphere: Hemisphere::default(),
            method: DensityMethod::default(),
            sigma: defaults::sigma(),
            concentration_factor: defaults::concentration_factor(),
        }
    }
}

/// All settings, as loaded from a TOML document with optional
/// `[projection]` and `[density]` tables.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StereoConfig {
    #[serde(default)]
    pub projection: ProjectionConfig,

    #[serde(default)]
    pub density: DensityConfig,
}

impl StereoConfig {
    /// Parse from TOML text.
    ///
    /// An unknown projection name is reported as
    /// [`FabricError::InvalidProjectionKind`].
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let table: toml::Table = text.parse()?;
        let kind = table.get("projection").and_then(|p| p.get("kind")).and_then(toml::Value::as_str);
        if let Some(name) = kind {
            name.parse::<ProjectionKind>()?;
        }
        let config: StereoConfig = toml::Value::Table(table).try_into()?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML text.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| FabricError::Config(e.to_string()))
    }

    /// Rejects values no projection or grid can be built from.
    pub fn validate(&self) -> Result<()> {
        let p = &self.projection;
        if !(p.clip_pole >= 0.0 && p.clip_pole < 90.0) {
            return Err(FabricError::Config(format!("clip_pole {} not in [0, 90)", p.clip_pole)));
        }
        if !(p.gridstep > 0.0 && p.gridstep <= 90.0) {
            return Err(FabricError::Config(format!("gridstep {} not in (0, 90]", p.gridstep)));
        }
        if p.resolution < 2 {
            return Err(FabricError::Config("resolution must be at least 2".into()));
        }
        let d = &self.density;
        if d.npoints == 0 {
            return Err(FabricError::Config("npoints must be positive".into()));
        }
        if !(d.sigma > 0.0) {
            return Err(FabricError::Config(format!("sigma {} must be positive", d.sigma)));
        }
        if !(d.concentration_factor > 0.0) {
            return Err(FabricError::Config(format!(
                "concentration_factor {} must be positive",
                d.concentration_factor
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = StereoConfig::default();
        assert_eq!(c.projection.kind, ProjectionKind::EqualArea);
        assert_eq!(c.projection.hemisphere, Hemisphere::Lower);
        assert_eq!(c.projection.clip_pole, 20.0);
        assert_eq!(c.projection.gridstep, 15.0);
        assert_eq!(c.projection.resolution, 361);
        assert_eq!(c.density.npoints, 2000);
        assert_eq!(c.density.sigma, 3.0);
        assert_eq!(c.density.method, DensityMethod::ExpKamb);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let c = StereoConfig::from_toml_str(
            r#"
            [projection]
            kind = "wulff"
            hemisphere = "upper"
            grid_position = [90, 30, 0, 0]

            [density]
            npoints = 500
            grid = "sfs"
            method = "kamb"
            "#,
        )
        .unwrap();
        assert_eq!(c.projection.kind, ProjectionKind::EqualAngle);
        assert_eq!(c.projection.hemisphere, Hemisphere::Upper);
        assert_eq!(c.projection.grid_position, [90.0, 30.0, 0.0, 0.0]);
        assert_eq!(c.projection.clip_pole, 20.0);
        assert_eq!(c.density.npoints, 500);
        assert_eq!(c.density.grid, GridKind::Sfs);
        assert_eq!(c.density.method, DensityMethod::Kamb);
        assert_eq!(c.density.sigma, 3.0);
    }

    #[test]
    fn test_kind_names_are_case_insensitive() {
        let c = StereoConfig::from_toml_str("[projection]\nkind = \"Schmidt\"").unwrap();
        assert_eq!(c.projection.kind, ProjectionKind::EqualArea);
        let c = StereoConfig::from_toml_str("[projection]\nkind = \"equal-angle\"").unwrap();
        assert_eq!(c.projection.kind, ProjectionKind::EqualAngle);
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(StereoConfig::from_toml_str("").unwrap(), StereoConfig::default());
    }

    #[test]
    fn test_bad_toml() {
        let err = StereoConfig::from_toml_str("[projection]\nkind = \"mercator\"").unwrap_err();
        assert!(matches!(err, FabricError::InvalidProjectionKind(ref name) if name == "mercator"));
        let err = StereoConfig::from_toml_str("[projection]\nkind = 3").unwrap_err();
        assert!(matches!(err, FabricError::Config(_)));
        let err = StereoConfig::from_toml_str("[density]\nsigma = -1.0").unwrap_err();
        assert!(matches!(err, FabricError::Config(_)));
    }

    #[test]
    fn test_toml_roundtrip() {
        let c = StereoConfig::default();
        let text = c.to_toml_string().unwrap();
        assert_eq!(StereoConfig::from_toml_str(&text).unwrap(), c);
    }
}
