//! Geometric primitives.
//!
//! Everything else in the crate is built on these two value types: the
//! polar `Vector3` and the linear map `DefGrad`.

mod vec3;
mod defgrad;

pub use vec3::Vector3;
pub use defgrad::DefGrad;
