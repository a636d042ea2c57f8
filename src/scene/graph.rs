//! In-memory scene graph implementing [`SceneHost`].
//!
//! Nodes live in an arena and are never removed. Sibling names are kept
//! unique by bumping a trailing number, the way DCC hosts rename on clash.

use glam::{Mat4, Vec3};

use super::host::{CurveData, MeshData, NodeId, SceneHost, Space};
use super::node_type::{PrimTypeOverride, CAMERA, MESH, NURBS_CURVE, TRANSFORM};
use crate::stage::{LinearUnit, UpAxis};
use crate::util::{transform_points, Error, Result};

/// Path separator for scene node paths.
pub const NODE_SEPARATOR: char = '|';

/// Cameras every fresh host scene starts with.
pub const DEFAULT_CAMERA_NAMES: [&str; 4] = ["persp", "top", "front", "side"];

#[derive(Clone, Debug)]
enum Payload {
    Transform,
    Mesh(MeshData),
    Curve(CurveData),
    Camera,
    Other(String),
}

impl Payload {
    fn type_name(&self) -> &str {
        match self {
            Payload::Transform => TRANSFORM,
            Payload::Mesh(_) => MESH,
            Payload::Curve(_) => NURBS_CURVE,
            Payload::Camera => CAMERA,
            Payload::Other(name) => name,
        }
    }
}

#[derive(Clone, Debug)]
struct Node {
    name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    payload: Payload,
    local: Mat4,
    type_override: Option<i32>,
}

/// Arena-backed scene graph.
#[derive(Clone, Debug)]
pub struct SceneGraph {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
    linear_unit: LinearUnit,
    up_axis: UpAxis,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Empty scene in centimeters, Y up.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            roots: Vec::new(),
            linear_unit: LinearUnit::Centimeter,
            up_axis: UpAxis::Y,
        }
    }

    /// Scene holding the default persp/top/front/side cameras.
    pub fn with_default_cameras() -> Self {
        let mut scene = Self::new();
        for name in DEFAULT_CAMERA_NAMES {
            scene.add_camera(name, None);
        }
        scene
    }

    /// Set the scene's unit and up axis.
    pub fn with_units(mut self, unit: LinearUnit, up_axis: UpAxis) -> Self {
        self.linear_unit = unit;
        self.up_axis = up_axis;
        self
    }

    /// Number of nodes, shapes included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(id.0 as usize)
            .ok_or_else(|| Error::NodeNotFound(id.to_string()))
    }

    /// First free sibling name derived from `name`.
    fn unique_name(&self, parent: Option<NodeId>, name: &str) -> String {
        let siblings = match parent {
            Some(p) => self.node(p).map(|n| n.children.as_slice()).unwrap_or(&[]),
            None => self.roots.as_slice(),
        };
        let taken = |candidate: &str| {
            siblings
                .iter()
                .any(|&s| self.node(s).is_some_and(|n| n.name == candidate))
        };
        if !taken(name) {
            return name.to_string();
        }
        let base = name.trim_end_matches(|c: char| c.is_ascii_digit());
        (1..)
            .map(|n| format!("{base}{n}"))
            .find(|candidate| !taken(candidate))
            .unwrap_or_else(|| name.to_string())
    }

    fn insert(&mut self, name: &str, parent: Option<NodeId>, payload: Payload) -> Result<NodeId> {
        if let Some(p) = parent {
            if self.node(p).is_none() {
                return Err(Error::NodeNotFound(p.to_string()));
            }
        }
        let id = NodeId(self.nodes.len() as u32);
        let name = self.unique_name(parent, name);
        self.nodes.push(Node {
            name,
            parent,
            children: Vec::new(),
            payload,
            local: Mat4::IDENTITY,
            type_override: None,
        });
        match parent {
            Some(p) => self.node_mut(p)?.children.push(id),
            None => self.roots.push(id),
        }
        Ok(id)
    }

    /// Insert a shape under a transform, named `<transform>Shape`.
    fn insert_shape(&mut self, transform: NodeId, payload: Payload) -> Result<NodeId> {
        let owner = self
            .node(transform)
            .ok_or_else(|| Error::NodeNotFound(transform.to_string()))?;
        if !matches!(owner.payload, Payload::Transform) {
            return Err(Error::other(format!("{} is not a transform", owner.name)));
        }
        let name = format!("{}Shape", owner.name);
        self.insert(&name, Some(transform), payload)
    }

    /// World matrix of a node: its local matrix under every ancestor's.
    pub fn world_matrix(&self, node: NodeId) -> Mat4 {
        let mut matrix = Mat4::IDENTITY;
        let mut current = Some(node);
        while let Some(id) = current {
            let Some(n) = self.node(id) else { break };
            matrix = n.local * matrix;
            current = n.parent;
        }
        matrix
    }

    // ========================================================================
    // Infallible builders for scripted scenes
    // ========================================================================

    /// Add a group. Panics if `parent` is not a node of this scene.
    pub fn add_transform(&mut self, name: &str, parent: Option<NodeId>) -> NodeId {
        self.insert(name, parent, Payload::Transform)
            .unwrap_or_else(|e| panic!("add_transform({name}): {e}"))
    }

    /// Add a transform with a mesh shape; returns the transform.
    pub fn add_mesh(&mut self, name: &str, parent: Option<NodeId>, mesh: MeshData) -> NodeId {
        let transform = self.add_transform(name, parent);
        self.insert_shape(transform, Payload::Mesh(mesh))
            .unwrap_or_else(|e| panic!("add_mesh({name}): {e}"));
        transform
    }

    /// Add a transform with one curve shape per entry; returns the transform.
    pub fn add_curves(&mut self, name: &str, parent: Option<NodeId>, curves: Vec<CurveData>) -> NodeId {
        let transform = self.add_transform(name, parent);
        for curve in curves {
            self.insert_shape(transform, Payload::Curve(curve))
                .unwrap_or_else(|e| panic!("add_curves({name}): {e}"));
        }
        transform
    }

    /// Add a transform with a camera shape; returns the transform.
    pub fn add_camera(&mut self, name: &str, parent: Option<NodeId>) -> NodeId {
        let transform = self.add_transform(name, parent);
        self.insert_shape(transform, Payload::Camera)
            .unwrap_or_else(|e| panic!("add_camera({name}): {e}"));
        transform
    }

    /// Add a transform with a shape of an arbitrary host type; returns the transform.
    pub fn add_custom(&mut self, name: &str, parent: Option<NodeId>, node_type: &str) -> NodeId {
        let transform = self.add_transform(name, parent);
        self.insert_shape(transform, Payload::Other(node_type.to_string()))
            .unwrap_or_else(|e| panic!("add_custom({name}): {e}"));
        transform
    }

    /// Store a prim type override on a node. Panics on a foreign handle.
    pub fn set_override(&mut self, node: NodeId, value: PrimTypeOverride) {
        self.set_type_override(node, value.as_i32())
            .unwrap_or_else(|e| panic!("set_override: {e}"));
    }

    /// Set a node's local translation. Panics on a foreign handle.
    pub fn set_translation(&mut self, node: NodeId, translation: Vec3) {
        self.set_local_matrix(node, Mat4::from_translation(translation))
            .unwrap_or_else(|e| panic!("set_translation: {e}"));
    }
}

impl SceneHost for SceneGraph {
    fn top_level_nodes(&self) -> Vec<NodeId> {
        self.roots.clone()
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.node(node).map(|n| n.children.clone()).unwrap_or_default()
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node)?.parent
    }

    fn name(&self, node: NodeId) -> Option<String> {
        self.node(node).map(|n| n.name.clone())
    }

    fn full_path(&self, node: NodeId) -> Option<String> {
        let mut names = Vec::new();
        let mut current = Some(node);
        while let Some(id) = current {
            let n = self.node(id)?;
            names.push(n.name.as_str());
            current = n.parent;
        }
        let mut path = String::new();
        for name in names.iter().rev() {
            path.push(NODE_SEPARATOR);
            path.push_str(name);
        }
        Some(path)
    }

    fn node_type(&self, node: NodeId) -> Option<String> {
        self.node(node).map(|n| n.payload.type_name().to_string())
    }

    fn is_shape(&self, node: NodeId) -> bool {
        self.node(node).is_some_and(|n| !matches!(n.payload, Payload::Transform))
    }

    fn type_override(&self, node: NodeId) -> Option<i32> {
        self.node(node)?.type_override
    }

    fn set_type_override(&mut self, node: NodeId, value: i32) -> Result<()> {
        self.node_mut(node)?.type_override = Some(value);
        Ok(())
    }

    fn mesh(&self, shape: NodeId, space: Space) -> Option<MeshData> {
        let Payload::Mesh(mesh) = &self.node(shape)?.payload else {
            return None;
        };
        let mut mesh = mesh.clone();
        if space == Space::World {
            transform_points(&self.world_matrix(shape), &mut mesh.points);
        }
        Some(mesh)
    }

    fn curve(&self, shape: NodeId, space: Space) -> Option<CurveData> {
        let Payload::Curve(curve) = &self.node(shape)?.payload else {
            return None;
        };
        let mut curve = curve.clone();
        if space == Space::World {
            transform_points(&self.world_matrix(shape), &mut curve.cvs);
        }
        Some(curve)
    }

    fn local_matrix(&self, node: NodeId) -> Option<Mat4> {
        self.node(node).map(|n| n.local)
    }

    fn set_local_matrix(&mut self, node: NodeId, matrix: Mat4) -> Result<()> {
        self.node_mut(node)?.local = matrix;
        Ok(())
    }

    fn create_transform(&mut self, name: &str, parent: Option<NodeId>) -> Result<NodeId> {
        self.insert(name, parent, Payload::Transform)
    }

    fn create_mesh(&mut self, transform: NodeId, mesh: MeshData) -> Result<NodeId> {
        self.insert_shape(transform, Payload::Mesh(mesh))
    }

    fn create_curve(&mut self, transform: NodeId, curve: CurveData) -> Result<NodeId> {
        self.insert_shape(transform, Payload::Curve(curve))
    }

    fn set_points(&mut self, shape: NodeId, points: Vec<Vec3>) -> Result<()> {
        match &mut self.node_mut(shape)?.payload {
            Payload::Mesh(mesh) => mesh.points = points,
            Payload::Curve(curve) => curve.cvs = points,
            other => return Err(Error::other(format!("{} shape has no points", other.type_name()))),
        }
        Ok(())
    }

    fn linear_unit(&self) -> LinearUnit {
        self.linear_unit
    }

    fn up_axis(&self) -> UpAxis {
        self.up_axis
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> MeshData {
        MeshData::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![vec![0, 1, 2]])
    }

    #[test]
    fn test_paths_and_hierarchy() {
        let mut scene = SceneGraph::new();
        let group = scene.add_transform("group1", None);
        let mesh = scene.add_mesh("pCube1", Some(group), triangle());

        assert_eq!(scene.full_path(mesh).as_deref(), Some("|group1|pCube1"));
        assert_eq!(scene.top_level_nodes(), vec![group]);
        assert_eq!(scene.children(group), vec![mesh]);
        let shape = scene.shapes(mesh)[0];
        assert_eq!(scene.name(shape).as_deref(), Some("pCube1Shape"));
        assert_eq!(scene.find("|group1|pCube1"), Some(mesh));
        assert_eq!(scene.find("|group1|nothing"), None);
    }

    #[test]
    fn test_unique_sibling_names() {
        let mut scene = SceneGraph::new();
        let a = scene.add_transform("group1", None);
        let b = scene.add_transform("group1", None);
        let c = scene.add_transform("group1", None);
        assert_eq!(scene.name(a).as_deref(), Some("group1"));
        assert_eq!(scene.name(b).as_deref(), Some("group2"));
        assert_eq!(scene.name(c).as_deref(), Some("group3"));

        // Same name under different parents is fine.
        let d = scene.add_transform("child", Some(a));
        let e = scene.add_transform("child", Some(b));
        assert_eq!(scene.name(d), scene.name(e));
    }

    #[test]
    fn test_world_space_mesh() {
        let mut scene = SceneGraph::new();
        let group = scene.add_transform("group1", None);
        scene.set_translation(group, Vec3::new(0.0, 10.0, 0.0));
        let mesh = scene.add_mesh("tri", Some(group), triangle());
        let shape = scene.shapes(mesh)[0];

        let local = scene.mesh(shape, Space::Local).unwrap();
        let world = scene.mesh(shape, Space::World).unwrap();
        assert_eq!(local.points[1], Vec3::X);
        assert_eq!(world.points[1], Vec3::new(1.0, 10.0, 0.0));
    }

    #[test]
    fn test_default_cameras() {
        let scene = SceneGraph::with_default_cameras();
        let paths: Vec<String> = scene
            .top_level_nodes()
            .into_iter()
            .filter_map(|n| scene.full_path(n))
            .collect();
        assert_eq!(paths, vec!["|persp", "|top", "|front", "|side"]);
    }

    #[test]
    fn test_create_errors() {
        let mut scene = SceneGraph::new();
        assert!(matches!(scene.create_transform("x", Some(NodeId(99))), Err(Error::NodeNotFound(_))));
        let mesh = scene.add_mesh("tri", None, triangle());
        let shape = scene.shapes(mesh)[0];
        assert!(scene.create_mesh(shape, triangle()).is_err());
    }
}
