//! Sign-free comparisons shared by the axial feature types.

use std::hash::{Hash, Hasher};

use rand::Rng;

use crate::gp::Vector3;
use crate::precision;

/// Angle between two axes in degrees, folded into [0, 90].
pub(crate) fn angle(a: &Vector3, b: &Vector3) -> f64 {
    a.cross(b).magnitude().atan2(a.dot(b).abs()).to_degrees()
}

/// True if the axes coincide within the angular tolerance.
pub(crate) fn coincide(a: &Vector3, b: &Vector3) -> bool {
    angle(a, b).to_radians() < precision::ANGULAR
}

/// Hash of the canonical representative.
pub(crate) fn hash<H: Hasher>(v: &Vector3, state: &mut H) {
    v.canonical().hash(state);
}

/// Uniformly distributed unit vector.
pub(crate) fn random_unit<R: Rng + ?Sized>(rng: &mut R) -> Vector3 {
    let z: f64 = 2.0 * rng.random::<f64>() - 1.0;
    let phi = std::f64::consts::TAU * rng.random::<f64>();
    let r = (1.0 - z * z).max(0.0).sqrt();
    Vector3::new(r * phi.cos(), r * phi.sin(), z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_angle_is_folded() {
        let a = Vector3::unit_x();
        let b = Vector3::from_geo(150.0, 0.0);
        assert!((angle(&a, &b) - 30.0).abs() < 1e-9);
        assert_eq!(angle(&a, &-a), 0.0);
    }

    #[test]
    fn test_coincide_for_antipodes() {
        let a = Vector3::from_geo(37.0, 12.0);
        assert!(coincide(&a, &-a));
        assert!(!coincide(&a, &Vector3::from_geo(37.0, 13.0)));
    }
}
