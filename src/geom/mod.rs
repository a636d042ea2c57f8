//! Geometry codec.
//!
//! Pure conversions between host payloads ([`MeshData`](crate::scene::MeshData),
//! [`CurveData`](crate::scene::CurveData)) and the stage attribute layout of
//! the `Mesh` and `NurbsCurves` schemas. Nothing here knows about hierarchy.

mod curves;
mod mesh;
mod primvar;

pub use curves::*;
pub use mesh::*;
pub use primvar::*;
