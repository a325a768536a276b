//! Second-rank orientation tensors and ellipsoid shape indices.

mod ortensor;
mod shape;

pub use ortensor::{FabricKind, OrientationTensor};
pub use shape::EllipsoidShape;
