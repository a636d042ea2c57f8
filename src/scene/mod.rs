//! Source scene graph.
//!
//! [`SceneHost`] is the query/creation surface the traversals use;
//! [`SceneGraph`] is an in-memory host for scripted scenes and tests.

mod host;
mod node_type;
mod graph;

pub use host::{SceneHost, NodeId, Space, MeshData, UvSet, CurveData, CurveForm};
pub use node_type::{
    resolve_type_tag, PrimTypeOverride, VARIANT_SET_TAG,
    TRANSFORM, MESH, NURBS_CURVE, CAMERA,
};
pub use graph::{SceneGraph, NODE_SEPARATOR, DEFAULT_CAMERA_NAMES};
