//! Stereographic projections of directions onto the unit disc.
//!
//! The disc is oriented with North up (+Y) and East right (+X); the unit
//! circle is the primitive. A projection never fails for a non-zero vector:
//! the vector is first resolved into the declared hemisphere.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize};

use crate::config::ProjectionConfig;
use crate::feature::{FeatureSet, Orientation, Pair};
use crate::gp::{DefGrad, Vector3};
use crate::{FabricError, Result};

mod overlay;

pub use overlay::{Curve, GridOverlay};

/// Disc mapping.
///
/// Deserialized through [`FromStr`], so every accepted name works in
/// config files too.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectionKind {
    /// Lambert azimuthal equal-area (Schmidt net)
    #[default]
    EqualArea,
    /// Stereographic equal-angle (Wulff net)
    EqualAngle,
}

impl ProjectionKind {
    /// Maps a unit vector with z >= 0 onto the disc.
    fn map(&self, x: f64, y: f64, z: f64) -> Point2 {
        let d = match self {
            ProjectionKind::EqualArea => (1.0 + z).sqrt(),
            ProjectionKind::EqualAngle => 1.0 + z,
        };
        Point2::new(y / d, x / d)
    }
}

impl FromStr for ProjectionKind {
    type Err = FabricError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "equal-area" | "schmidt" | "earea" => Ok(ProjectionKind::EqualArea),
            "equal-angle" | "wulff" | "eangle" => Ok(ProjectionKind::EqualAngle),
            _ => Err(FabricError::InvalidProjectionKind(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for ProjectionKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(de::Error::custom)
    }
}

impl fmt::Display for ProjectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectionKind::EqualArea => f.write_str("equal-area"),
            ProjectionKind::EqualAngle => f.write_str("equal-angle"),
        }
    }
}

/// Hemisphere plotted on the disc.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hemisphere {
    #[default]
    Lower,
    Upper,
}

impl Hemisphere {
    /// Signed depth of a vector, positive inside this hemisphere.
    #[inline]
    fn depth(&self, v: &Vector3) -> f64 {
        match self {
            Hemisphere::Lower => v.z(),
            Hemisphere::Upper => -v.z(),
        }
    }
}

/// A point on the projection plane.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Distance from the disc center.
    pub fn radius(&self) -> f64 {
        self.x.hypot(self.y)
    }
}

/// Projection of a polar vector split by the side it points to.
///
/// Exactly one field is set: `lower` when the vector points into the
/// declared hemisphere, `upper` (its antipode's position) otherwise.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Antipodal {
    pub lower: Option<Point2>,
    pub upper: Option<Point2>,
}

// Slack for points on the primitive that land just outside after rounding.
const DISC_SLACK: f64 = 1e-9;

/// Configured stereonet projection.
#[derive(Clone, Debug)]
pub struct Projection {
    kind: ProjectionKind,
    hemisphere: Hemisphere,
    rotate_data: bool,
    clip_pole: f64,
    gridstep: f64,
    resolution: usize,
    frame: DefGrad,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            kind: ProjectionKind::default(),
            hemisphere: Hemisphere::default(),
            rotate_data: false,
            clip_pole: 20.0,
            gridstep: 15.0,
            resolution: 361,
            frame: DefGrad::identity(),
        }
    }
}

impl Projection {
    /// Builds a projection; the net frame comes from `grid_position`.
    pub fn new(config: &ProjectionConfig) -> Result<Self> {
        let [fazi, finc, lazi, linc] = config.grid_position;
        let pair = Pair::new(fazi, finc, lazi, linc)?;
        if config.resolution < 2 {
            return Err(FabricError::Config("resolution must be at least 2".into()));
        }
        Ok(Self {
            kind: config.kind,
            hemisphere: config.hemisphere,
            rotate_data: config.rotate_data,
            clip_pole: config.clip_pole,
            gridstep: config.gridstep,
            resolution: config.resolution,
            frame: DefGrad::from_pair(&pair),
        })
    }

    /// Default settings with the named projection kind.
    pub fn with_kind(name: &str) -> Result<Self> {
        Ok(Self { kind: name.parse()?, ..Self::default() })
    }

    pub fn kind(&self) -> ProjectionKind {
        self.kind
    }

    pub fn hemisphere(&self) -> Hemisphere {
        self.hemisphere
    }

    /// Rotation taking the canonical net onto the configured net.
    pub fn frame(&self) -> &DefGrad {
        &self.frame
    }

    /// Data vector expressed in the frame the disc is drawn in.
    fn to_view(&self, v: &Vector3) -> Vector3 {
        if self.rotate_data {
            self.frame.transposed().apply(v)
        } else {
            *v
        }
    }

    /// True if a view-frame vector lies in the declared hemisphere.
    fn is_visible(&self, v: &Vector3) -> bool {
        self.hemisphere.depth(v) >= -DISC_SLACK
    }

    /// Projects a view-frame unit vector, resolving it into the hemisphere.
    ///
    /// Only vectors that fail [`is_visible`](Self::is_visible) are flipped;
    /// a vector on the primitive stays on its own side of the disc.
    fn project_view(&self, v: &Vector3) -> Point2 {
        let v = if self.is_visible(v) { *v } else { v.flip() };
        self.kind.map(v.x(), v.y(), self.hemisphere.depth(&v).max(0.0))
    }

    /// Disc coordinates of a direction.
    pub fn project(&self, v: &Vector3) -> Result<Point2> {
        Ok(self.project_view(&self.to_view(&v.normalized()?)))
    }

    /// Disc coordinates of any orientation (planes plot as poles).
    pub fn project_feature<O: Orientation>(&self, o: &O) -> Result<Point2> {
        self.project(&o.vector())
    }

    /// Projects a vector, reporting whether it or its antipode was plotted.
    pub fn project_antipodal(&self, v: &Vector3) -> Result<Antipodal> {
        let u = self.to_view(&v.normalized()?);
        let p = self.project_view(&u);
        if self.is_visible(&u) {
            Ok(Antipodal { lower: Some(p), upper: None })
        } else {
            Ok(Antipodal { lower: None, upper: Some(p) })
        }
    }

    /// Projects every member; points are pulled back onto the disc if
    /// rounding puts them just outside.
    pub fn project_set<T: Orientation>(&self, set: &FeatureSet<T>) -> Result<Vec<Point2>> {
        set.iter()
            .map(|o| {
                let p = self.project_feature(o)?;
                let r = p.radius();
                Ok(if r > 1.0 { Point2::new(p.x / r, p.y / r) } else { p })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::Lineation;
    use approx::assert_relative_eq;

    #[test]
    fn test_kind_parsing() {
        assert_eq!("Schmidt".parse::<ProjectionKind>().unwrap(), ProjectionKind::EqualArea);
        assert_eq!("eangle".parse::<ProjectionKind>().unwrap(), ProjectionKind::EqualAngle);
        assert!(matches!(
            "mercator".parse::<ProjectionKind>(),
            Err(FabricError::InvalidProjectionKind(_))
        ));
        assert!(Projection::with_kind("polar").is_err());
    }

    #[test]
    fn test_north_on_primitive() {
        let proj = Projection::default();
        let p = proj.project(&Vector3::unit_x()).unwrap();
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 2f64.sqrt() * 45f64.to_radians().sin(), epsilon = 1e-12);
    }

    #[test]
    fn test_vertical_at_center() {
        for kind in ["equal-area", "equal-angle"] {
            let proj = Projection::with_kind(kind).unwrap();
            let p = proj.project(&Vector3::unit_z()).unwrap();
            assert_relative_eq!(p.radius(), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_equal_angle_radius() {
        let proj = Projection::with_kind("wulff").unwrap();
        let p = proj.project_feature(&Lineation::new(90.0, 30.0)).unwrap();
        assert_relative_eq!(p.radius(), 30f64.to_radians().tan(), epsilon = 1e-12);
        assert!(p.x > 0.0);
    }

    #[test]
    fn test_upper_hemisphere_mirrors() {
        let cfg = ProjectionConfig { hemisphere: Hemisphere::Upper, ..Default::default() };
        let proj = Projection::new(&cfg).unwrap();
        let down = proj.project(&Vector3::from_geo(0.0, 30.0)).unwrap();
        let up = proj.project(&Vector3::from_geo(180.0, -30.0)).unwrap();
        assert_relative_eq!(down.x, up.x, epsilon = 1e-12);
        assert_relative_eq!(down.y, up.y, epsilon = 1e-12);
        assert!(up.y < 0.0);
    }

    #[test]
    fn test_antipodal_split() {
        let proj = Projection::default();
        let v = Vector3::from_geo(30.0, 40.0);
        let a = proj.project_antipodal(&v).unwrap();
        assert!(a.lower.is_some() && a.upper.is_none());
        let b = proj.project_antipodal(&-v).unwrap();
        assert!(b.lower.is_none());
        assert_eq!(b.upper, a.lower);
    }

    #[test]
    fn test_zero_vector_fails() {
        assert!(Projection::default().project(&Vector3::zero()).is_err());
    }
}
