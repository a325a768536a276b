//! Geological features built on directions.
//!
//! - `Lineation` - axial line
//! - `Foliation` - plane, stored as its axial pole
//! - `Pair` - foliation with a lineation lying in it
//! - `Fault` - pair with a sense of movement
//! - `FeatureSet` - ordered homogeneous collection
//!
//! Statistics code is generic over the `Orientation` capability rather than
//! inspecting feature types at run time.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::gp::{DefGrad, Vector3};
use crate::Result;

mod axial;
mod lineation;
mod foliation;
mod pair;
mod fault;
mod set;
mod record;

pub use lineation::Lineation;
pub use foliation::Foliation;
pub use pair::Pair;
pub use fault::Fault;
pub use set::FeatureSet;
pub use record::{FeatureRecord, SetRecord};

pub(crate) use pair::perpendicular_at;

/// Type tag of a feature, used by records and error messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureKind {
    Vector3,
    Lineation,
    Foliation,
    Pair,
    Fault,
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FeatureKind::Vector3 => "Vector3",
            FeatureKind::Lineation => "Lineation",
            FeatureKind::Foliation => "Foliation",
            FeatureKind::Pair => "Pair",
            FeatureKind::Fault => "Fault",
        };
        f.write_str(name)
    }
}

/// Anything that can live in a `FeatureSet`.
pub trait Feature: Clone + fmt::Debug + PartialEq {
    const KIND: FeatureKind;

    /// Rotation about an axis by an angle in degrees.
    fn rotate(&self, axis: &Vector3, angle: f64) -> Result<Self>;

    /// Applies a linear map.
    fn transform(&self, f: &DefGrad) -> Result<Self>;

    /// Plain record holding the defining parameters.
    fn to_record(&self) -> FeatureRecord;

    /// Rebuilds from a record; a record of another type is a TypeMismatch.
    fn from_record(record: &FeatureRecord) -> Result<Self>;
}

/// Features defined by a single direction.
pub trait Orientation: Feature + Copy {
    /// True if `v` and `-v` denote the same feature.
    const AXIAL: bool;

    /// The defining vector (unit length for axial types).
    fn vector(&self) -> Vector3;

    /// Builds the feature from any non-zero vector.
    fn from_vector(v: &Vector3) -> Result<Self>;

    /// Builds the feature from its geographic pair in degrees.
    fn from_geo(azimuth: f64, inclination: f64) -> Self;

    /// Geographic pair in degrees.
    fn geo(&self) -> (f64, f64);
}

impl Feature for Vector3 {
    const KIND: FeatureKind = FeatureKind::Vector3;

    fn rotate(&self, axis: &Vector3, angle: f64) -> Result<Self> {
        Vector3::rotate(self, axis, angle)
    }

    fn transform(&self, f: &DefGrad) -> Result<Self> {
        Ok(f.apply(self))
    }

    fn to_record(&self) -> FeatureRecord {
        FeatureRecord::Vector3 { x: self.x(), y: self.y(), z: self.z() }
    }

    fn from_record(record: &FeatureRecord) -> Result<Self> {
        match record {
            FeatureRecord::Vector3 { x, y, z } => Ok(Vector3::new(*x, *y, *z)),
            other => Err(record::mismatch(FeatureKind::Vector3, other.kind())),
        }
    }
}

impl Orientation for Vector3 {
    const AXIAL: bool = false;

    fn vector(&self) -> Vector3 {
        *self
    }

    fn from_vector(v: &Vector3) -> Result<Self> {
        if v.is_zero() {
            return Err(crate::FabricError::DegenerateInput("zero-length vector".into()));
        }
        Ok(*v)
    }

    fn from_geo(azimuth: f64, inclination: f64) -> Self {
        Vector3::from_geo(azimuth, inclination)
    }

    fn geo(&self) -> (f64, f64) {
        Vector3::geo(self)
    }
}
