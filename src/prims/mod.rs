//! Handler registry.
//!
//! Every supported prim kind is a [`PrimKind`] variant with an export and an
//! import. The [`Registry`] maps both tag spaces onto these kinds: host node
//! type tags (`transform`, `mesh`, ...) and stage prim type names (`Xform`,
//! `Mesh`, ...). A prim exported under kind K is imported by kind K.

pub mod mesh;
pub mod nurbs_curves;
pub mod scope;
pub mod xform;

use std::collections::HashMap;
use std::fmt;

use crate::geom::{MESH_TYPE, NURBS_CURVES_TYPE};
use crate::scene::{NodeId, SceneHost, MESH, NURBS_CURVE, TRANSFORM};
use crate::stage::{Prim, PrimPath, Stage};
use crate::util::{transform_points, Error, Mat4, Result, Vec3};

pub use scope::SCOPE_TYPE;
pub use xform::XFORM_TYPE;

/// Supported prim kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimKind {
    Xform,
    Scope,
    Mesh,
    NurbsCurves,
}

impl PrimKind {
    pub const ALL: [PrimKind; 4] = [Self::Xform, Self::Scope, Self::Mesh, Self::NurbsCurves];

    /// Stage prim type name written for this kind.
    pub fn prim_type(self) -> &'static str {
        match self {
            Self::Xform => XFORM_TYPE,
            Self::Scope => SCOPE_TYPE,
            Self::Mesh => MESH_TYPE,
            Self::NurbsCurves => NURBS_CURVES_TYPE,
        }
    }

    /// Check if export recurses into the node's children.
    pub fn is_container(self) -> bool {
        matches!(self, Self::Xform | Self::Scope)
    }

    /// Define the prim for `node` at `target` and author its attributes.
    pub fn export<H: SceneHost + ?Sized>(
        self,
        stage: &mut Stage,
        host: &H,
        node: NodeId,
        target: &PrimPath,
    ) -> Result<()> {
        match self {
            Self::Xform => xform::export(stage, host, node, target),
            Self::Scope => scope::export(stage, host, node, target),
            Self::Mesh => mesh::export(stage, host, node, target),
            Self::NurbsCurves => nurbs_curves::export(stage, host, node, target),
        }
    }

    /// Create the host node for `prim` under `parent`.
    pub fn import<H: SceneHost + ?Sized>(
        self,
        prim: &Prim<'_>,
        host: &mut H,
        parent: Option<NodeId>,
    ) -> Result<NodeId> {
        match self {
            Self::Xform => xform::import(prim, host, parent),
            Self::Scope => scope::import(prim, host, parent),
            Self::Mesh => mesh::import(prim, host, parent),
            Self::NurbsCurves => nurbs_curves::import(prim, host, parent),
        }
    }
}

impl fmt::Display for PrimKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prim_type())
    }
}

/// Tag tables for both directions.
#[derive(Clone, Debug)]
pub struct Registry {
    node_types: HashMap<String, PrimKind>,
    prim_types: HashMap<String, PrimKind>,
}

impl Default for Registry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry
            .alias_node_type(TRANSFORM, PrimKind::Xform)
            .alias_node_type(XFORM_TYPE, PrimKind::Xform)
            .alias_node_type(SCOPE_TYPE, PrimKind::Scope)
            .alias_node_type(MESH, PrimKind::Mesh)
            .alias_node_type(NURBS_CURVE, PrimKind::NurbsCurves);
        for kind in PrimKind::ALL {
            registry.alias_prim_type(kind.prim_type(), kind);
        }
        registry
    }
}

impl Registry {
    /// Registry with the built-in tags.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry that resolves nothing.
    pub fn empty() -> Self {
        Self { node_types: HashMap::new(), prim_types: HashMap::new() }
    }

    /// Map a host node type tag onto a kind.
    pub fn alias_node_type(&mut self, tag: impl Into<String>, kind: PrimKind) -> &mut Self {
        self.node_types.insert(tag.into(), kind);
        self
    }

    /// Map a stage prim type name onto a kind.
    pub fn alias_prim_type(&mut self, tag: impl Into<String>, kind: PrimKind) -> &mut Self {
        self.prim_types.insert(tag.into(), kind);
        self
    }

    /// Kind for a host node type tag.
    pub fn resolve_node_type(&self, tag: &str) -> Result<PrimKind> {
        self.node_types
            .get(tag)
            .copied()
            .ok_or_else(|| Error::UnresolvedType(tag.to_string()))
    }

    /// Kind for a stage prim type name.
    pub fn resolve_prim_type(&self, tag: &str) -> Result<PrimKind> {
        self.prim_types
            .get(tag)
            .copied()
            .ok_or_else(|| Error::UnresolvedType(tag.to_string()))
    }
}

/// Create the host transform for a prim, named after it.
pub(crate) fn create_group<H: SceneHost + ?Sized>(
    prim: &Prim<'_>,
    host: &mut H,
    parent: Option<NodeId>,
) -> Result<NodeId> {
    host.create_transform(prim.name(), parent)
}

/// Fold a non-identity local matrix on `transform` into its shapes' points
/// and reset it to identity. Each entry pairs a shape with its current points.
pub(crate) fn bake_local_matrix<H: SceneHost + ?Sized>(
    host: &mut H,
    transform: NodeId,
    shapes: Vec<(NodeId, Vec<Vec3>)>,
) -> Result<()> {
    let local = host.local_matrix(transform).unwrap_or(Mat4::IDENTITY);
    if local == Mat4::IDENTITY {
        return Ok(());
    }
    for (shape, mut points) in shapes {
        transform_points(&local, &mut points);
        host.set_points(shape, points)?;
    }
    host.set_local_matrix(transform, Mat4::IDENTITY)
}
