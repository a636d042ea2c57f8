//! The scene host seam.
//!
//! Traversals only talk to the live scene graph through [`SceneHost`]. The
//! payload types here are the host-side view of geometry: per-face polygon
//! lists, per-vertex colors, span-convention curve knots.

use glam::{Mat4, Vec2, Vec3};

use crate::stage::{LinearUnit, UpAxis};
use crate::util::Result;

/// Opaque handle to a node owned by a scene host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Coordinate space for geometry queries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Space {
    /// Shape-local coordinates.
    #[default]
    Local,
    /// Coordinates with every ancestor transform applied.
    World,
}

/// A UV set: shared values plus one index per face-vertex.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UvSet {
    pub values: Vec<Vec2>,
    pub indices: Vec<u32>,
}

impl UvSet {
    /// One UV per face-vertex, resolved through the index array.
    pub fn expand(&self) -> Option<Vec<Vec2>> {
        self.indices
            .iter()
            .map(|&i| self.values.get(i as usize).copied())
            .collect()
    }
}

/// Polygon mesh as the host stores it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    /// Vertex positions.
    pub points: Vec<Vec3>,
    /// Vertex indices of each polygon, in winding order.
    pub polygons: Vec<Vec<u32>>,
    /// Optional UV set, indexed per face-vertex.
    pub uvs: Option<UvSet>,
    /// Optional color set, one color per vertex.
    pub colors: Option<Vec<Vec3>>,
}

impl MeshData {
    /// Mesh with points and polygons only.
    pub fn new(points: Vec<Vec3>, polygons: Vec<Vec<u32>>) -> Self {
        Self { points, polygons, uvs: None, colors: None }
    }

    pub fn with_uvs(mut self, uvs: UvSet) -> Self {
        self.uvs = Some(uvs);
        self
    }

    pub fn with_colors(mut self, colors: Vec<Vec3>) -> Self {
        self.colors = Some(colors);
        self
    }

    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    pub fn num_faces(&self) -> usize {
        self.polygons.len()
    }

    /// Total number of face-vertices over all polygons.
    pub fn num_face_vertices(&self) -> usize {
        self.polygons.iter().map(Vec::len).sum()
    }
}

/// Curve form. Only open curves are written to the stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CurveForm {
    #[default]
    Open,
    Closed,
    Periodic,
}

/// NURBS curve as the host stores it.
///
/// Knots use the span convention: `cvs.len() + degree - 1` values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CurveData {
    pub cvs: Vec<Vec3>,
    pub knots: Vec<f64>,
    pub degree: u32,
    pub form: CurveForm,
}

impl CurveData {
    /// Open curve from control vertices, span knots and degree.
    pub fn new(cvs: Vec<Vec3>, knots: Vec<f64>, degree: u32) -> Self {
        Self { cvs, knots, degree, form: CurveForm::Open }
    }

    /// Knot count this curve should carry.
    pub fn expected_knots(&self) -> usize {
        (self.cvs.len() + self.degree as usize).saturating_sub(1)
    }
}

/// Query and creation surface of a live scene graph.
pub trait SceneHost {
    /// Unparented nodes, in creation order.
    fn top_level_nodes(&self) -> Vec<NodeId>;

    /// Direct children (transforms and shapes), in creation order.
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Short name of a node.
    fn name(&self, node: NodeId) -> Option<String>;

    /// Absolute path of a node, e.g. `|group1|pCube1`.
    fn full_path(&self, node: NodeId) -> Option<String>;

    /// The node's own type (`transform`, `mesh`, `nurbsCurve`, `camera`, ...).
    fn node_type(&self, node: NodeId) -> Option<String>;

    /// Check if a node is a shape (holds a payload, draws under a transform).
    fn is_shape(&self, node: NodeId) -> bool;

    /// Shape children of a node.
    fn shapes(&self, node: NodeId) -> Vec<NodeId> {
        self.children(node).into_iter().filter(|&c| self.is_shape(c)).collect()
    }

    /// Integer-backed prim type override stored on a node.
    fn type_override(&self, node: NodeId) -> Option<i32>;

    fn set_type_override(&mut self, node: NodeId, value: i32) -> Result<()>;

    /// Mesh payload of a shape.
    fn mesh(&self, shape: NodeId, space: Space) -> Option<MeshData>;

    /// Curve payload of a shape.
    fn curve(&self, shape: NodeId, space: Space) -> Option<CurveData>;

    /// Local transform of a node.
    fn local_matrix(&self, node: NodeId) -> Option<Mat4>;

    fn set_local_matrix(&mut self, node: NodeId, matrix: Mat4) -> Result<()>;

    /// Create an empty transform (group).
    fn create_transform(&mut self, name: &str, parent: Option<NodeId>) -> Result<NodeId>;

    /// Create a mesh shape under a transform.
    fn create_mesh(&mut self, transform: NodeId, mesh: MeshData) -> Result<NodeId>;

    /// Create a curve shape under a transform.
    fn create_curve(&mut self, transform: NodeId, curve: CurveData) -> Result<NodeId>;

    /// Replace the local-space points of a mesh or curve shape.
    fn set_points(&mut self, shape: NodeId, points: Vec<Vec3>) -> Result<()>;

    /// Current linear unit.
    fn linear_unit(&self) -> LinearUnit;

    /// Current up axis.
    fn up_axis(&self) -> UpAxis;

    /// Look up a node by absolute path.
    fn find(&self, path: &str) -> Option<NodeId> {
        let mut stack = self.top_level_nodes();
        while let Some(node) = stack.pop() {
            let full = self.full_path(node)?;
            if full == path {
                return Some(node);
            }
            if path.starts_with(&full) {
                stack.extend(self.children(node));
            }
        }
        None
    }
}
