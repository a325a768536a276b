//! Near-uniform point sets on the sphere.

use std::f64::consts::{PI, TAU};

use super::GridKind;
use crate::gp::Vector3;

/// Generalized spiral set of Saff and Kuijlaars, `n` points pole to pole.
fn gss(n: usize) -> Vec<Vector3> {
    if n < 2 {
        return vec![Vector3::unit_z(); n];
    }
    let nf = n as f64;
    let mut phi = 0.0;
    (0..n)
        .map(|k| {
            let h = -1.0 + 2.0 * k as f64 / (nf - 1.0);
            let s = (1.0 - h * h).max(0.0).sqrt();
            phi = if k == 0 || k == n - 1 { 0.0 } else { (phi + 3.6 / nf.sqrt() / s) % TAU };
            Vector3::new(s * phi.cos(), s * phi.sin(), h)
        })
        .collect()
}

/// Spherical Fibonacci set, `n` points.
fn sfs(n: usize) -> Vec<Vector3> {
    let nf = n as f64;
    let golden = (1.0 + 5f64.sqrt()) / 2.0;
    (0..n)
        .map(|i| {
            let i2 = (2 * i) as f64 - nf + 1.0;
            let theta = 2.0 * PI * i2 / golden;
            let c = ((nf + i2) * (nf - i2)).max(0.0).sqrt() / nf;
            Vector3::new(c * theta.sin(), c * theta.cos(), i2 / nf)
        })
        .collect()
}

/// `n` evenly spread unit vectors.
///
/// With `hemisphere` set, `2n` points are generated on the sphere and the
/// `n` with z >= 0 kept; otherwise the whole sphere is covered.
pub fn uniform_points(kind: GridKind, n: usize, hemisphere: bool) -> Vec<Vector3> {
    let generate = match kind {
        GridKind::Gss => gss,
        GridKind::Sfs => sfs,
    };
    if hemisphere {
        generate(2 * n).into_iter().filter(|v| v.z() >= 0.0).collect()
    } else {
        generate(n)
    }
}
