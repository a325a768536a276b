//! 3x3 linear map: rotation or deformation gradient.
//!
//! Storage is row-major, `rows[row][col]`, and maps column vectors:
//! `v' = F · v`.

use std::fmt;
use std::ops::Mul;

use nalgebra::{Matrix3, SymmetricEigen};
use serde::{Deserialize, Serialize};

use super::Vector3;
use crate::feature::Pair;
use crate::precision;
use crate::tensor::EllipsoidShape;
use crate::{FabricError, Result};

/// Tolerance used when deciding whether a matrix is a proper rotation.
const ORTHOGONALITY_TOLERANCE: f64 = 1.0e-8;

/// A linear map of 3D space.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct DefGrad {
    rows: [[f64; 3]; 3],
}

impl Default for DefGrad {
    fn default() -> Self {
        Self::identity()
    }
}

impl DefGrad {
    /// Identity map.
    pub const fn identity() -> Self {
        Self {
            rows: [
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, 0.0, 1.0],
            ],
        }
    }

    /// Creates from rows.
    pub const fn from_rows(rows: [[f64; 3]; 3]) -> Self {
        Self { rows }
    }

    /// Creates from three column vectors.
    pub fn from_cols(c0: &Vector3, c1: &Vector3, c2: &Vector3) -> Self {
        Self {
            rows: [
                [c0.x(), c1.x(), c2.x()],
                [c0.y(), c1.y(), c2.y()],
                [c0.z(), c1.z(), c2.z()],
            ],
        }
    }

    /// Diagonal (coaxial) stretch.
    pub const fn from_comp(xx: f64, yy: f64, zz: f64) -> Self {
        Self {
            rows: [
                [xx, 0.0, 0.0],
                [0.0, yy, 0.0],
                [0.0, 0.0, zz],
            ],
        }
    }

    /// Rotation about an axis by an angle in degrees (right-hand rule).
    pub fn from_axis_angle(axis: &Vector3, angle: f64) -> Result<Self> {
        let d = axis.normalized().map_err(|_| {
            FabricError::DegenerateInput("rotation axis has zero length".into())
        })?;
        let (s, c) = angle.to_radians().sin_cos();
        let t = 1.0 - c;
        let (x, y, z) = d.coords();

        // Rodrigues' rotation formula
        Ok(Self {
            rows: [
                [t * x * x + c, t * x * y - s * z, t * x * z + s * y],
                [t * x * y + s * z, t * y * y + c, t * y * z - s * x],
                [t * x * z - s * y, t * y * z + s * x, t * z * z + c],
            ],
        })
    }

    /// Minimal rotation carrying direction `u` onto direction `v`.
    ///
    /// The axis is u×v and the angle their mutual angle. Antiparallel
    /// inputs rotate half a turn about an arbitrary perpendicular axis.
    pub fn from_two_vectors(u: &Vector3, v: &Vector3) -> Result<Self> {
        let a = u.normalized()?;
        let b = v.normalized()?;
        let axis = a.cross(&b);
        if axis.magnitude() > precision::ANGULAR {
            return Self::from_axis_angle(&axis, a.angle(&b));
        }
        if a.dot(&b) > 0.0 {
            return Ok(Self::identity());
        }
        let helper = if a.x().abs() < 0.9 { Vector3::unit_x() } else { Vector3::unit_y() };
        Self::from_axis_angle(&a.cross(&helper), 180.0)
    }

    /// Rotation carrying the canonical frame onto a pair frame.
    ///
    /// Columns are the lineation, the pair rotation axis (pole × lineation)
    /// and the foliation pole, so x, y, z map onto them.
    pub fn from_pair(pair: &Pair) -> Self {
        let l = pair.lvec();
        let f = pair.fvec();
        Self::from_cols(&l, &f.cross(&l), &f)
    }

    /// Rotation from proper z-x-z Euler angles in degrees.
    pub fn from_euler(phi: f64, theta: f64, psi: f64) -> Self {
        let z = Vector3::unit_z();
        let x = Vector3::unit_x();
        // Axes are constant unit vectors, construction cannot fail.
        let rz1 = Self::rotation_about_unit(&z, phi);
        let rx = Self::rotation_about_unit(&x, theta);
        let rz2 = Self::rotation_about_unit(&z, psi);
        rz1 * rx * rz2
    }

    fn rotation_about_unit(axis: &Vector3, angle: f64) -> Self {
        Self::from_axis_angle(axis, angle).unwrap_or_default()
    }

    /// Gets value at (row, col), 0-indexed.
    #[inline]
    pub fn value(&self, row: usize, col: usize) -> f64 {
        self.rows[row][col]
    }

    /// Rows as arrays.
    #[inline]
    pub const fn rows(&self) -> &[[f64; 3]; 3] {
        &self.rows
    }

    /// Row as vector.
    pub fn row(&self, index: usize) -> Vector3 {
        Vector3::from_array(self.rows[index])
    }

    /// Column as vector.
    pub fn col(&self, index: usize) -> Vector3 {
        Vector3::new(self.rows[0][index], self.rows[1][index], self.rows[2][index])
    }

    /// Applies the map to a column vector.
    pub fn apply(&self, v: &Vector3) -> Vector3 {
        let m = &self.rows;
        Vector3::new(
            m[0][0] * v.x() + m[0][1] * v.y() + m[0][2] * v.z(),
            m[1][0] * v.x() + m[1][1] * v.y() + m[1][2] * v.z(),
            m[2][0] * v.x() + m[2][1] * v.y() + m[2][2] * v.z(),
        )
    }

    /// Computes determinant.
    pub fn determinant(&self) -> f64 {
        let m = &self.rows;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Returns transposed matrix.
    pub fn transposed(&self) -> DefGrad {
        let m = &self.rows;
        DefGrad {
            rows: [
                [m[0][0], m[1][0], m[2][0]],
                [m[0][1], m[1][1], m[2][1]],
                [m[0][2], m[1][2], m[2][2]],
            ],
        }
    }

    /// Returns inverse matrix.
    pub fn inverted(&self) -> Result<DefGrad> {
        let det = self.determinant();
        if det.abs() < precision::RESOLUTION {
            return Err(FabricError::DegenerateInput("matrix is singular".into()));
        }
        let m = &self.rows;
        let cof = |r0: usize, r1: usize, c0: usize, c1: usize| {
            m[r0][c0] * m[r1][c1] - m[r0][c1] * m[r1][c0]
        };
        let inv_det = 1.0 / det;
        Ok(DefGrad {
            rows: [
                [cof(1, 2, 1, 2) * inv_det, -cof(0, 2, 1, 2) * inv_det, cof(0, 1, 1, 2) * inv_det],
                [-cof(1, 2, 0, 2) * inv_det, cof(0, 2, 0, 2) * inv_det, -cof(0, 1, 0, 2) * inv_det],
                [cof(1, 2, 0, 1) * inv_det, -cof(0, 2, 0, 1) * inv_det, cof(0, 1, 0, 1) * inv_det],
            ],
        })
    }

    /// Matrix multiplication (self applied after other).
    pub fn multiplied(&self, other: &DefGrad) -> DefGrad {
        let mut rows = [[0.0; 3]; 3];
        for (i, row) in rows.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..3).map(|k| self.rows[i][k] * other.rows[k][j]).sum();
            }
        }
        DefGrad { rows }
    }

    /// True if orthogonal with determinant +1.
    pub fn is_rotation(&self) -> bool {
        let should_be_identity = self.multiplied(&self.transposed());
        should_be_identity.is_equal(&DefGrad::identity(), ORTHOGONALITY_TOLERANCE)
            && (self.determinant() - 1.0).abs() < ORTHOGONALITY_TOLERANCE
    }

    /// Axis and angle (degrees, in [0,180]) of a proper rotation.
    ///
    /// The identity reports the z axis with a zero angle.
    pub fn axis_angle(&self) -> Result<(Vector3, f64)> {
        if !self.is_rotation() {
            return Err(FabricError::DegenerateInput(
                "matrix is not a proper rotation".into(),
            ));
        }
        let m = &self.rows;
        let trace = m[0][0] + m[1][1] + m[2][2];
        let skew = Vector3::new(m[2][1] - m[1][2], m[0][2] - m[2][0], m[1][0] - m[0][1]);
        // |skew| = 2 sin(angle), trace - 1 = 2 cos(angle)
        let angle = skew.magnitude().atan2(trace - 1.0).to_degrees();

        if angle < 1.0e-7 {
            return Ok((Vector3::unit_z(), 0.0));
        }
        if 180.0 - angle > 1.0e-4 {
            return Ok((skew.normalized()?, angle));
        }

        // Near a half turn the skew part vanishes; (R + I) / 2 = a aᵀ.
        let diag = [m[0][0], m[1][1], m[2][2]];
        let k = (0..3)
            .max_by(|&a, &b| diag[a].total_cmp(&diag[b]))
            .unwrap_or(0);
        let mut col = [0.0; 3];
        for (i, c) in col.iter_mut().enumerate() {
            let identity = if i == k { 1.0 } else { 0.0 };
            *c = (m[i][k] + identity) / 2.0;
        }
        let mut axis = Vector3::from_array(col).normalized()?;
        // Keep the sign that agrees with whatever skew part remains.
        if axis.dot(&skew) < 0.0 {
            axis = axis.flip();
        }
        Ok((axis, angle))
    }

    /// True if all entries differ by at most tolerance.
    pub fn is_equal(&self, other: &DefGrad, tolerance: f64) -> bool {
        self.rows
            .iter()
            .flatten()
            .zip(other.rows.iter().flatten())
            .all(|(a, b)| (a - b).abs() <= tolerance)
    }

    /// Principal stretches S1 ≥ S2 ≥ S3 and their axes in the deformed state.
    ///
    /// Eigen-decomposition of the left Cauchy-Green tensor B = F·Fᵀ;
    /// stretches are the square roots of its eigenvalues.
    pub fn principal_stretches(&self) -> ([f64; 3], [Vector3; 3]) {
        let f: Matrix3<f64> = (*self).into();
        let b = f * f.transpose();
        let eigen = SymmetricEigen::new(b);

        let mut pairs: Vec<(f64, Vector3)> = eigen
            .eigenvalues
            .iter()
            .enumerate()
            .map(|(i, &val)| (val.max(0.0).sqrt(), eigen.eigenvectors.column(i).into_owned().into()))
            .collect();
        pairs.sort_by(|a, b| b.0.total_cmp(&a.0));

        (
            [pairs[0].0, pairs[1].0, pairs[2].0],
            [pairs[0].1, pairs[1].1, pairs[2].1],
        )
    }

    /// Shape indices of the strain ellipsoid.
    pub fn shape(&self) -> EllipsoidShape {
        let (stretches, _) = self.principal_stretches();
        EllipsoidShape::from_stretches(stretches)
    }
}

impl PartialEq for DefGrad {
    fn eq(&self, other: &Self) -> bool {
        self.is_equal(other, precision::CONFUSION)
    }
}

impl Mul for DefGrad {
    type Output = DefGrad;
    fn mul(self, other: DefGrad) -> DefGrad {
        self.multiplied(&other)
    }
}

impl Mul<Vector3> for DefGrad {
    type Output = Vector3;
    fn mul(self, v: Vector3) -> Vector3 {
        self.apply(&v)
    }
}

impl fmt::Display for DefGrad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            writeln!(f, "[{:>10.6} {:>10.6} {:>10.6}]", row[0], row[1], row[2])?;
        }
        Ok(())
    }
}

impl From<DefGrad> for Matrix3<f64> {
    fn from(f: DefGrad) -> Self {
        let m = f.rows;
        Matrix3::new(
            m[0][0], m[0][1], m[0][2],
            m[1][0], m[1][1], m[1][2],
            m[2][0], m[2][1], m[2][2],
        )
    }
}

impl From<Matrix3<f64>> for DefGrad {
    fn from(m: Matrix3<f64>) -> Self {
        DefGrad {
            rows: [
                [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
                [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
                [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity() {
        let m = DefGrad::identity();
        assert_eq!(m.value(0, 0), 1.0);
        assert_eq!(m.value(0, 1), 0.0);
        assert_relative_eq!(m.determinant(), 1.0);
    }

    #[test]
    fn test_axis_angle_maps_x_to_y() {
        let r = DefGrad::from_axis_angle(&Vector3::unit_z(), 90.0).unwrap();
        assert_eq!(Vector3::unit_x().transform(&r), Vector3::unit_y());
    }

    #[test]
    fn test_two_vectors_equals_axis_angle() {
        let current = DefGrad::from_two_vectors(&Vector3::unit_x(), &Vector3::unit_y()).unwrap();
        let expects = DefGrad::from_axis_angle(&Vector3::unit_z(), 90.0).unwrap();
        assert_eq!(current, expects);
    }

    #[test]
    fn test_two_vectors_antiparallel() {
        let u = Vector3::new(0.0, 0.0, 1.0);
        let r = DefGrad::from_two_vectors(&u, &-u).unwrap();
        assert_eq!(r.apply(&u), -u);
        assert!(r.is_rotation());
    }

    #[test]
    fn test_inverse_roundtrip() {
        let f = DefGrad::from_rows([[2.0, 0.5, 0.0], [0.0, 1.0, 0.3], [0.1, 0.0, 0.5]]);
        let fi = f.inverted().unwrap();
        assert!((f * fi).is_equal(&DefGrad::identity(), 1e-12));
        assert!(DefGrad::from_comp(1.0, 0.0, 1.0).inverted().is_err());
    }

    #[test]
    fn test_axis_angle_decomposition() {
        let axis = Vector3::from_geo(45.0, 45.0);
        let r = DefGrad::from_axis_angle(&axis, 60.0).unwrap();
        let (a, angle) = r.axis_angle().unwrap();
        assert_relative_eq!(angle, 60.0, epsilon = 1e-9);
        assert!(a.is_equal(&axis, 1e-9));
    }

    #[test]
    fn test_axis_angle_half_turn() {
        let axis = Vector3::from_geo(120.0, 30.0);
        let r = DefGrad::from_axis_angle(&axis, 180.0).unwrap();
        let (a, angle) = r.axis_angle().unwrap();
        assert_relative_eq!(angle, 180.0, epsilon = 1e-6);
        assert!(a.is_equal(&axis, 1e-6) || a.is_equal(&-axis, 1e-6));
    }

    #[test]
    fn test_axis_angle_rejects_shear() {
        let f = DefGrad::from_rows([[1.0, 0.5, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
        assert!(f.axis_angle().is_err());
    }

    #[test]
    fn test_euler_is_rotation() {
        let r = DefGrad::from_euler(30.0, 40.0, 50.0);
        assert!(r.is_rotation());
        let (_, angle) = DefGrad::from_euler(0.0, 0.0, 25.0).axis_angle().unwrap();
        assert_relative_eq!(angle, 25.0, epsilon = 1e-9);
    }

    #[test]
    fn test_principal_stretches_of_pure_shear() {
        let f = DefGrad::from_comp(2.0, 1.0, 0.5);
        let (s, axes) = f.principal_stretches();
        assert_relative_eq!(s[0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(s[1], 1.0, epsilon = 1e-12);
        assert_relative_eq!(s[2], 0.5, epsilon = 1e-12);
        assert_relative_eq!(axes[0].x().abs(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_nalgebra_roundtrip() {
        let f = DefGrad::from_rows([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 10.0]]);
        let m: Matrix3<f64> = f.into();
        assert_eq!(DefGrad::from(m), f);
        assert_eq!(m[(1, 2)], 6.0);
    }
}
