//! fabric: orientation geometry and spherical statistics for structural geology.
//!
//! Directional data (lines, planes, fault kinematics), their aggregate
//! statistics and the stereographic machinery that turns them into plottable
//! disc coordinates and contourable density fields. Nothing here draws.

pub mod precision;
pub mod gp;
pub mod feature;
pub mod tensor;
pub mod stats;
pub mod projection;
pub mod density;
pub mod config;

// Re-exports for convenience
pub use gp::{Vector3, DefGrad};
pub use feature::{
    Lineation, Foliation, Pair, Fault, FeatureSet, Feature, Orientation, FeatureKind,
    FeatureRecord, SetRecord,
};
pub use tensor::{OrientationTensor, EllipsoidShape, FabricKind};
pub use stats::FisherStats;
pub use projection::{Projection, ProjectionKind, Hemisphere, Point2, Antipodal, Curve, GridOverlay};
pub use density::{DensityGrid, GridKind, DensityMethod, ContourData};
pub use config::{ProjectionConfig, DensityConfig, StereoConfig};

/// Result type for fabric operations
pub type Result<T> = std::result::Result<T, FabricError>;

#[derive(Debug, thiserror::Error)]
pub enum FabricError {
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Invalid projection kind: {0}")]
    InvalidProjectionKind(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for FabricError {
    fn from(e: toml::de::Error) -> Self {
        FabricError::Config(e.to_string())
    }
}
