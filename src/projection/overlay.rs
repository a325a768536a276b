//! Net overlays and curve generators.

use serde::{Deserialize, Serialize};

use super::{Point2, Projection};
use crate::feature::{perpendicular_at, Foliation, Orientation};
use crate::gp::{DefGrad, Vector3};
use crate::Result;

/// Polyline in disc coordinates. A NaN pair separates pieces.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl Curve {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn push(&mut self, p: Point2) {
        self.x.push(p.x);
        self.y.push(p.y);
    }

    /// Ends the current piece. Repeated breaks collapse into one.
    pub fn push_break(&mut self) {
        if self.x.last().is_some_and(|x| !x.is_nan()) {
            self.x.push(f64::NAN);
            self.y.push(f64::NAN);
        }
    }

    /// Appends another curve as a separate piece.
    pub fn append(&mut self, other: &Curve) {
        if other.is_empty() {
            return;
        }
        self.push_break();
        self.x.extend_from_slice(&other.x);
        self.y.extend_from_slice(&other.y);
    }

    /// Continuous pieces without the breaks.
    pub fn segments(&self) -> Vec<Vec<Point2>> {
        let mut out = Vec::new();
        let mut current = Vec::new();
        for (&x, &y) in self.x.iter().zip(&self.y) {
            if x.is_nan() {
                if !current.is_empty() {
                    out.push(std::mem::take(&mut current));
                }
            } else {
                current.push(Point2::new(x, y));
            }
        }
        if !current.is_empty() {
            out.push(current);
        }
        out
    }

    fn trim_break(&mut self) {
        if self.x.last().is_some_and(|x| x.is_nan()) {
            self.x.pop();
            self.y.pop();
        }
    }
}

/// Background net curves, one polyline per family.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GridOverlay {
    /// Great circles through the net poles dipping east.
    pub lat_e: Curve,
    /// Great circles through the net poles dipping west.
    pub lat_w: Curve,
    /// Small circles about the north net pole.
    pub lon_n: Curve,
    /// Small circles about the south net pole.
    pub lon_s: Curve,
    pub polehole_n: Curve,
    pub polehole_s: Curve,
    pub main_ns: Curve,
    pub main_ew: Curve,
    /// The primitive.
    pub main_h: Curve,
}

impl GridOverlay {
    /// All families with their names.
    pub fn families(&self) -> [(&'static str, &Curve); 9] {
        [
            ("lat_e", &self.lat_e),
            ("lat_w", &self.lat_w),
            ("lon_n", &self.lon_n),
            ("lon_s", &self.lon_s),
            ("polehole_n", &self.polehole_n),
            ("polehole_s", &self.polehole_s),
            ("main_ns", &self.main_ns),
            ("main_ew", &self.main_ew),
            ("main_h", &self.main_h),
        ]
    }
}

/// Points on the circle at `angle` degrees from unit `axis`, closed.
fn circle(axis: &Vector3, angle: f64, resolution: usize) -> Vec<Vector3> {
    let (sa, ca) = angle.to_radians().sin_cos();
    let last = resolution.saturating_sub(1).max(1) as f64;
    (0..resolution)
        .map(|i| {
            let u = perpendicular_at(axis, 360.0 * i as f64 / last);
            *axis * ca + u * sa
        })
        .collect()
}

/// Multiples of `step` strictly between 0 and 90.
fn steps(step: f64) -> impl Iterator<Item = f64> {
    let step = if step > 0.0 { step } else { 90.0 };
    (1..)
        .map(move |k| k as f64 * step)
        .take_while(|a| *a < 90.0 - 1e-9)
}

impl Projection {
    /// Net overlay with the configured spacing and resolution.
    pub fn get_grid_overlay(&self) -> GridOverlay {
        self.grid_overlay_with(self.gridstep, self.resolution)
    }

    /// Net overlay with explicit circle spacing (degrees) and samples per circle.
    ///
    /// The net is drawn in the configured frame unless data are rotated
    /// into the canonical one.
    pub fn grid_overlay_with(&self, gridstep: f64, resolution: usize) -> GridOverlay {
        let net = if self.rotate_data { DefGrad::identity() } else { self.frame };
        let north = Vector3::unit_x();
        let south = -north;
        let hole = self.clip_pole;
        let outside_hole = |v: &Vector3| v.angle(&north) >= hole && v.angle(&south) >= hole;

        let trace = |axis: &Vector3, angle: f64, clip: bool| -> Curve {
            let mut c = Curve::default();
            for v in circle(axis, angle, resolution) {
                let w = net.apply(&v);
                if self.is_visible(&w) && (!clip || outside_hole(&v)) {
                    c.push(self.project_view(&w));
                } else {
                    c.push_break();
                }
            }
            c.trim_break();
            c
        };

        let family = |curves: Vec<Curve>| -> Curve {
            let mut out = Curve::default();
            for c in &curves {
                out.append(c);
            }
            out
        };

        let dipping = |azimuth: f64| {
            steps(gridstep)
                .map(|d| trace(&Foliation::new(azimuth, d).pole(), 90.0, true))
                .collect::<Vec<_>>()
        };
        let around = |pole: &Vector3| {
            steps(gridstep).map(|a| trace(pole, a, true)).collect::<Vec<_>>()
        };

        let overlay = GridOverlay {
            lat_e: family(dipping(90.0)),
            lat_w: family(dipping(270.0)),
            lon_n: family(around(&north)),
            lon_s: family(around(&south)),
            polehole_n: trace(&north, hole, false),
            polehole_s: trace(&south, hole, false),
            main_ns: trace(&Vector3::unit_y(), 90.0, false),
            main_ew: trace(&north, 90.0, false),
            main_h: trace(&Vector3::unit_z(), 90.0, false),
        };
        log::debug!(
            "Grid overlay: step {} deg, {} samples per circle, pole hole {} deg",
            gridstep,
            resolution,
            hole
        );
        overlay
    }

    /// Trace of a plane, broken where it leaves the hemisphere.
    pub fn great_circle(&self, fol: &Foliation) -> Curve {
        let mut c = Curve::default();
        for v in circle(&fol.pole(), 90.0, self.resolution) {
            let w = self.to_view(&v);
            if self.is_visible(&w) {
                c.push(self.project_view(&w));
            } else {
                c.push_break();
            }
        }
        c.trim_break();
        c
    }

    /// Small circle at `angle` degrees about an axis.
    ///
    /// For axial orientations the part in the other hemisphere is plotted
    /// through its antipode; for polar vectors it is left out.
    pub fn cone<O: Orientation>(&self, axis: &O, angle: f64) -> Result<Curve> {
        let a = axis.vector().normalized()?;
        let mut c = Curve::default();
        let mut side = None;
        for v in circle(&a, angle, self.resolution) {
            let w = self.to_view(&v);
            let visible = self.is_visible(&w);
            if O::AXIAL {
                if side.is_some_and(|s| s != visible) {
                    c.push_break();
                }
                side = Some(visible);
                c.push(self.project_view(&w));
            } else if visible {
                c.push(self.project_view(&w));
            } else {
                c.push_break();
            }
        }
        c.trim_break();
        Ok(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectionConfig;
    use crate::feature::Lineation;

    fn finite(c: &Curve) -> impl Iterator<Item = Point2> + '_ {
        c.x.iter().zip(&c.y).filter(|(x, _)| !x.is_nan()).map(|(&x, &y)| Point2::new(x, y))
    }

    #[test]
    fn test_primitive_is_unit_circle() {
        let ov = Projection::default().get_grid_overlay();
        assert!(!ov.main_h.is_empty());
        assert!(finite(&ov.main_h).all(|p| (p.radius() - 1.0).abs() < 1e-9));
    }

    #[test]
    fn test_main_lines() {
        let ov = Projection::default().get_grid_overlay();
        assert!(finite(&ov.main_ns).all(|p| p.x.abs() < 1e-9));
        assert!(finite(&ov.main_ew).all(|p| p.y.abs() < 1e-9));
    }

    #[test]
    fn test_lat_families_sides() {
        let ov = Projection::default().get_grid_overlay();
        assert!(finite(&ov.lat_e).all(|p| p.x > -1e-9));
        assert!(finite(&ov.lat_w).all(|p| p.x < 1e-9));
        assert!(ov.lat_e.x.iter().any(|x| x.is_nan()));
        // five circles; sampling starts mid-arc, so each arc comes in two pieces
        assert_eq!(ov.lat_e.segments().len(), 10);
    }

    #[test]
    fn test_pole_hole_is_empty() {
        let proj = Projection::default();
        let ov = proj.get_grid_overlay();
        let n = proj.project(&Vector3::unit_x()).unwrap();
        let r_hole = proj.project(&Vector3::from_geo(20.0, 0.0)).unwrap();
        let hole = ((r_hole.x - n.x).powi(2) + (r_hole.y - n.y).powi(2)).sqrt();
        for family in [&ov.lat_e, &ov.lat_w, &ov.lon_n] {
            for p in finite(family) {
                let d = ((p.x - n.x).powi(2) + (p.y - n.y).powi(2)).sqrt();
                assert!(d > 0.4 * hole);
            }
        }
    }

    #[test]
    fn test_family_names() {
        let ov = Projection::default().get_grid_overlay();
        let names: Vec<_> = ov.families().iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            ["lat_e", "lat_w", "lon_n", "lon_s", "polehole_n", "polehole_s", "main_ns", "main_ew", "main_h"]
        );
    }

    #[test]
    fn test_rotated_data_share_net_frame() {
        let mut cfg = ProjectionConfig { grid_position: [180.0, 40.0, 90.0, 0.0], ..Default::default() };
        cfg.rotate_data = true;
        let proj = Projection::new(&cfg).unwrap();
        // the pair lineation lands on the canonical net north
        let p = proj.project(&Vector3::unit_y()).unwrap();
        assert!(p.x.abs() < 1e-9 && (p.y.abs() - 1.0).abs() < 1e-9);

        cfg.rotate_data = false;
        let proj = Projection::new(&cfg).unwrap();
        let ov = proj.get_grid_overlay();
        let q = proj.project(&Vector3::unit_y()).unwrap();
        let near = finite(&ov.main_ns).any(|m| (m.x - q.x).hypot(m.y - q.y) < 0.03);
        assert!(near);
    }

    #[test]
    fn test_great_circle_of_vertical_plane() {
        let proj = Projection::default();
        let c = proj.great_circle(&Foliation::new(90.0, 90.0));
        assert!(!c.is_empty());
        assert!(finite(&c).all(|p| p.x.abs() < 1e-9));
    }

    #[test]
    fn test_primitive_is_one_piece() {
        let proj = Projection::default();
        let ov = proj.get_grid_overlay();
        assert_eq!(ov.main_h.segments().len(), 1);
        let flat = proj.great_circle(&Foliation::new(0.0, 0.0));
        let pieces = flat.segments();
        assert_eq!(pieces.len(), 1);
        for w in pieces[0].windows(2) {
            assert!((w[0].x - w[1].x).hypot(w[0].y - w[1].y) < 0.05);
        }
    }

    #[test]
    fn test_axial_cone_is_folded() {
        let proj = Projection::default();
        let c = proj.cone(&Lineation::new(0.0, 0.0), 10.0).unwrap();
        assert!(finite(&c).all(|p| p.radius() <= 1.0 + 1e-9));
        assert_eq!(c.segments().iter().map(Vec::len).sum::<usize>(), 361);
        let polar = proj.cone(&Vector3::unit_x(), 10.0).unwrap();
        assert!(polar.segments().iter().map(Vec::len).sum::<usize>() < 361);
    }
}
