//! Plain serializable forms of features and sets.

use serde::{Deserialize, Serialize};

use super::FeatureKind;
use crate::FabricError;

/// Defining parameters of a single feature, tagged by type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "datatype")]
pub enum FeatureRecord {
    Vector3 { x: f64, y: f64, z: f64 },
    Lineation { azi: f64, inc: f64 },
    Foliation { azi: f64, inc: f64 },
    Pair { fazi: f64, finc: f64, lazi: f64, linc: f64 },
    Fault { fazi: f64, finc: f64, lazi: f64, linc: f64, sense: i8 },
}

impl FeatureRecord {
    /// Type tag of the record.
    pub fn kind(&self) -> FeatureKind {
        match self {
            FeatureRecord::Vector3 { .. } => FeatureKind::Vector3,
            FeatureRecord::Lineation { .. } => FeatureKind::Lineation,
            FeatureRecord::Foliation { .. } => FeatureKind::Foliation,
            FeatureRecord::Pair { .. } => FeatureKind::Pair,
            FeatureRecord::Fault { .. } => FeatureKind::Fault,
        }
    }
}

/// A named homogeneous collection of records.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SetRecord {
    pub datatype: FeatureKind,
    #[serde(default)]
    pub name: String,
    pub collection: Vec<FeatureRecord>,
}

pub(crate) fn mismatch(expected: FeatureKind, found: FeatureKind) -> FabricError {
    FabricError::TypeMismatch(format!("expected {} record, found {}", expected, found))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_json() {
        let rec = FeatureRecord::Lineation { azi: 120.0, inc: 30.0 };
        let json = serde_json::to_string(&rec).unwrap();
        assert_eq!(json, r#"{"datatype":"Lineation","azi":120.0,"inc":30.0}"#);
        let back: FeatureRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rec);
        assert_eq!(back.kind(), FeatureKind::Lineation);
    }

    #[test]
    fn test_mismatch_message() {
        let err = mismatch(FeatureKind::Fault, FeatureKind::Pair);
        assert!(matches!(err, FabricError::TypeMismatch(_)));
        assert!(err.to_string().contains("Fault"));
    }
}
