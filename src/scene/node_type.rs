//! Node type tags.
//!
//! A node's tag is its own type, except for a transform: a transform takes
//! the type of its first shape, or failing that its integer type override.

use super::host::{NodeId, SceneHost};

pub const TRANSFORM: &str = "transform";
pub const MESH: &str = "mesh";
pub const NURBS_CURVE: &str = "nurbsCurve";
pub const CAMERA: &str = "camera";

/// Integer-backed prim type stored on a plain transform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum PrimTypeOverride {
    Xform = 0,
    Scope = 1,
    Variant = 2,
    VariantSet = 3,
}

impl PrimTypeOverride {
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Xform),
            1 => Some(Self::Scope),
            2 => Some(Self::Variant),
            3 => Some(Self::VariantSet),
            _ => None,
        }
    }

    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Type tag the override resolves to.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Xform => "Xform",
            Self::Scope => "Scope",
            Self::Variant => "Variant",
            Self::VariantSet => "VariantSet",
        }
    }
}

/// Tag of a node that expands into a variant set on export.
pub const VARIANT_SET_TAG: &str = "VariantSet";

/// Resolve the type tag of a node.
pub fn resolve_type_tag<H: SceneHost + ?Sized>(host: &H, node: NodeId) -> Option<String> {
    let own = host.node_type(node)?;
    if own != TRANSFORM {
        return Some(own);
    }
    if let Some(&shape) = host.shapes(node).first() {
        return host.node_type(shape);
    }
    if let Some(tag) = host.type_override(node).and_then(PrimTypeOverride::from_i32) {
        return Some(tag.tag().to_string());
    }
    Some(own)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{MeshData, SceneGraph};
    use glam::Vec3;

    #[test]
    fn test_override_roundtrip() {
        for v in 0..4 {
            assert_eq!(PrimTypeOverride::from_i32(v).unwrap().as_i32(), v);
        }
        assert!(PrimTypeOverride::from_i32(7).is_none());
    }

    #[test]
    fn test_resolve_type_tag() {
        let mut scene = SceneGraph::new();
        let group = scene.add_transform("group", None);
        assert_eq!(resolve_type_tag(&scene, group).as_deref(), Some("transform"));

        let scope = scene.add_transform("scope", None);
        scene.set_override(scope, PrimTypeOverride::Scope);
        assert_eq!(resolve_type_tag(&scene, scope).as_deref(), Some("Scope"));

        let mesh = MeshData::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![vec![0, 1, 2]]);
        let tri = scene.add_mesh("tri", Some(group), mesh);
        // Shape type beats the override.
        scene.set_override(tri, PrimTypeOverride::Scope);
        assert_eq!(resolve_type_tag(&scene, tri).as_deref(), Some("mesh"));

        let shape = scene.shapes(tri)[0];
        assert_eq!(resolve_type_tag(&scene, shape).as_deref(), Some("mesh"));
    }
}
